//! Git operations used by fetchers and revision discovery.
//!
//! All helpers shell out to `git` through a [`CommandRunner`], capturing
//! output so failures carry git's own stderr.

use crate::error::{BuilderError, Result};
use crate::shell::{run_checked, CommandRunner, CommandSpec};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static REPO_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^/:]+?)(?:\.git)?/*$").unwrap());

/// Derive a repository name from a clone URL.
///
/// `https://github.com/org/lib.git`, `git@github.com:org/lib.git` and
/// `ssh://git@host/org/lib` all yield `lib`.
pub fn repo_name(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let name = REPO_NAME.captures(url)?.get(1)?.as_str();
    if name.is_empty() || name == ".git" || name.contains('@') {
        return None;
    }

    Some(name.to_string())
}

fn git(dir: &Path) -> CommandSpec {
    CommandSpec::new("git").cwd(dir).capture()
}

/// `git clone [extra_args] <url> <name>` inside `work_dir`.
pub fn clone(
    runner: &dyn CommandRunner,
    work_dir: &Path,
    url: &str,
    name: &str,
    extra_args: &[String],
) -> Result<()> {
    let spec = git(work_dir)
        .arg("clone")
        .args(extra_args.iter().cloned())
        .args([url, name]);
    run_checked(runner, &spec)?;
    Ok(())
}

/// `git checkout <revision>` inside `dir`.
pub fn checkout(runner: &dyn CommandRunner, dir: &Path, revision: &str) -> Result<()> {
    run_checked(runner, &git(dir).args(["checkout", revision]))?;
    Ok(())
}

/// `git pull [extra_args]` inside `dir`.
pub fn pull(runner: &dyn CommandRunner, dir: &Path, extra_args: &[String]) -> Result<()> {
    let spec = git(dir).arg("pull").args(extra_args.iter().cloned());
    run_checked(runner, &spec)?;
    Ok(())
}

/// Whether HEAD is detached (not on a branch).
///
/// `git symbolic-ref -q HEAD` exits 0 on a branch and 1 when detached; any
/// other outcome is an error.
pub fn is_detached(runner: &dyn CommandRunner, dir: &Path) -> Result<bool> {
    let spec = git(dir).args(["symbolic-ref", "-q", "HEAD"]);
    let result = runner.run(&spec)?;

    match (result.success, result.exit_code) {
        (true, _) => Ok(false),
        (false, Some(1)) => Ok(true),
        (false, code) => Err(BuilderError::CommandFailed {
            command: spec.to_string(),
            code,
            stderr: result.stderr,
        }),
    }
}

/// Full commit id of HEAD.
pub fn commit_sha(runner: &dyn CommandRunner, dir: &Path) -> Result<String> {
    let result = run_checked(runner, &git(dir).args(["rev-parse", "HEAD"]))?;
    let sha = result.stdout.trim().to_string();

    if sha.is_empty() {
        return Err(BuilderError::Other(anyhow::anyhow!(
            "git rev-parse HEAD printed nothing in {}",
            dir.display()
        )));
    }

    Ok(sha)
}

/// Branch name of HEAD, or the tag pointing at it when detached.
pub fn branch_or_tag(runner: &dyn CommandRunner, dir: &Path) -> Result<String> {
    let branch = runner.run(&git(dir).args(["symbolic-ref", "--short", "-q", "HEAD"]))?;
    if branch.success {
        let name = branch.stdout.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }

    let tag = run_checked(
        runner,
        &git(dir).args(["describe", "--tags", "--exact-match", "HEAD"]),
    )?;
    Ok(tag.stdout.trim().to_string())
}
