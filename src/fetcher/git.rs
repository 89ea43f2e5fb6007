//! Git fetch strategy.
//!
//! Clones a repository straight into the workspace at
//! `<first GOPATH root>/src/<dir>/<repo-name>`, where `dir` comes from the
//! repo config and the repo name from the URL. Repo config keys:
//!
//! - `dir` (required): import-path prefix the repository lives under
//! - `args.clone`: extra `git clone` arguments
//! - `args.pull`: extra `git pull` arguments

use crate::config::Config;
use crate::error::{BuilderError, Result};
use crate::toolchain::Toolchain;
use crate::workspace::SearchPath;
use std::sync::Arc;

use super::{sync_checkout, FetchOutcome, FetchRequest, Fetcher, FetcherRegistry};

/// Strategy name.
pub const NAME: &str = "git";

/// Add the git strategy to `registry`.
pub fn register(registry: &mut FetcherRegistry) {
    registry.register(NAME, |config, toolchain| {
        Ok(Box::new(GitFetcher::new(config, toolchain)) as Box<dyn Fetcher>)
    });
}

/// Fetches repositories with `git clone`.
#[derive(Debug)]
pub struct GitFetcher {
    toolchain: Arc<Toolchain>,
}

impl GitFetcher {
    /// Create a git fetcher. The strategy takes no options of its own.
    pub fn new(_config: &Config, toolchain: Arc<Toolchain>) -> Self {
        Self { toolchain }
    }
}

impl Fetcher for GitFetcher {
    fn name(&self) -> &str {
        NAME
    }

    fn fetch(&self, request: &FetchRequest<'_>) -> Result<FetchOutcome> {
        let repo_name = crate::git::repo_name(request.url).ok_or_else(|| {
            BuilderError::InvalidRepoUrl {
                url: request.url.to_string(),
            }
        })?;

        let dir = request.config.get_string("dir");
        if dir.is_empty() {
            return Err(BuilderError::missing(
                "dir",
                format!("repo {}", request.url),
            ));
        }

        let workspace = self.toolchain.workspace();
        let root = workspace.primary_root()?;
        let runner = self.toolchain.runner();

        let package = format!("{}/{}", dir.trim_end_matches('/'), repo_name);
        let mut outcome = FetchOutcome::default();

        let package_dir = match workspace.find(&package) {
            Some(location) => location.dir,
            None => {
                let work_dir = SearchPath::package_dir(root, &dir);
                std::fs::create_dir_all(&work_dir)?;

                crate::git::clone(
                    runner,
                    &work_dir,
                    request.url,
                    &repo_name,
                    &request.config.get_string_list("args.clone"),
                )?;
                outcome.fetched = true;
                tracing::info!(
                    fetcher = NAME,
                    url = request.url,
                    revision = request.revision.unwrap_or_default(),
                    "Fetched"
                );

                work_dir.join(&repo_name)
            }
        };

        sync_checkout(
            runner,
            NAME,
            &package_dir,
            request,
            &request.config.get_string_list("args.pull"),
            outcome,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::mock::{fail, ok};
    use crate::shell::{RecordingRunner, SystemRunner};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Serialize git-process tests to avoid flaky failures under parallel execution
    static GIT_LOCK: Mutex<()> = Mutex::new(());

    fn fetcher(runner: Arc<RecordingRunner>, roots: &[&Path]) -> GitFetcher {
        let toolchain = Toolchain::new(runner, SearchPath::from_roots(roots.iter().copied()));
        GitFetcher::new(&Config::default(), Arc::new(toolchain))
    }

    fn repo_config(yaml: &str) -> Config {
        Config::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn missing_package_is_cloned_into_first_root() {
        let gopath = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let config = repo_config("dir: github.com/org\nargs:\n  clone: [--depth, '1']\n");

        let outcome = fetcher(runner.clone(), &[gopath.path()])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: None,
                update: true,
                config: &config,
            })
            .unwrap();

        assert!(outcome.fetched);
        assert!(!outcome.updated);
        assert!(gopath.path().join("src/github.com/org").is_dir());

        let calls = runner.calls();
        assert_eq!(calls.len(), 1, "clone subsumes update: {:?}", calls);
        assert_eq!(
            calls[0].arg_strs(),
            vec!["clone", "--depth", "1", "https://github.com/org/lib.git", "lib"]
        );
        assert_eq!(
            calls[0].options.cwd,
            Some(gopath.path().join("src/github.com/org"))
        );
    }

    #[test]
    fn existing_package_is_not_cloned() {
        let gopath = TempDir::new().unwrap();
        fs::create_dir_all(gopath.path().join("src/github.com/org/lib")).unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let config = repo_config("dir: github.com/org");

        let outcome = fetcher(runner.clone(), &[gopath.path()])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: None,
                update: false,
                config: &config,
            })
            .unwrap();

        assert!(!outcome.fetched);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn existing_package_in_later_root_is_used() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::create_dir_all(second.path().join("src/github.com/org/lib")).unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let config = repo_config("dir: github.com/org");

        fetcher(runner.clone(), &[first.path(), second.path()])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: Some("v2.0.0"),
                update: false,
                config: &config,
            })
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arg_strs(), vec!["checkout", "v2.0.0"]);
        assert_eq!(
            calls[0].options.cwd,
            Some(second.path().join("src/github.com/org/lib"))
        );
    }

    #[test]
    fn revision_is_checked_out_after_clone() {
        let gopath = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let config = repo_config("dir: github.com/org");

        let outcome = fetcher(runner.clone(), &[gopath.path()])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: Some("v1.2.3"),
                update: false,
                config: &config,
            })
            .unwrap();

        assert!(outcome.fetched);
        assert!(outcome.checked_out);
        let checkout = &runner.calls_to("git", "checkout")[0];
        assert_eq!(
            checkout.options.cwd,
            Some(gopath.path().join("src/github.com/org/lib"))
        );
    }

    #[test]
    fn update_pulls_attached_checkout_with_pull_args() {
        let gopath = TempDir::new().unwrap();
        fs::create_dir_all(gopath.path().join("src/github.com/org/lib")).unwrap();
        let runner = Arc::new(RecordingRunner::new().respond_with(|_| ok("refs/heads/main")));
        let config = repo_config("dir: github.com/org\nargs:\n  pull: [--rebase]\n");

        let outcome = fetcher(runner.clone(), &[gopath.path()])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: None,
                update: true,
                config: &config,
            })
            .unwrap();

        assert!(outcome.updated);
        assert_eq!(runner.calls_to("git", "pull")[0].arg_strs(), vec!["pull", "--rebase"]);
    }

    #[test]
    fn update_is_skipped_on_detached_checkout() {
        let gopath = TempDir::new().unwrap();
        fs::create_dir_all(gopath.path().join("src/github.com/org/lib")).unwrap();
        let runner = Arc::new(RecordingRunner::new().respond_with(|spec| {
            if spec.args[0] == "symbolic-ref" {
                fail(1, "")
            } else {
                ok("")
            }
        }));
        let config = repo_config("dir: github.com/org");

        let outcome = fetcher(runner.clone(), &[gopath.path()])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: None,
                update: true,
                config: &config,
            })
            .unwrap();

        assert!(outcome.update_skipped);
        assert!(runner.calls_to("git", "pull").is_empty());
    }

    #[test]
    fn missing_dir_is_an_error() {
        let gopath = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::new());

        let err = fetcher(runner.clone(), &[gopath.path()])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: None,
                update: false,
                config: &Config::default(),
            })
            .unwrap_err();

        assert!(matches!(err, BuilderError::MissingField { field, .. } if field == "dir"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn empty_workspace_is_an_error() {
        let runner = Arc::new(RecordingRunner::new());
        let config = repo_config("dir: github.com/org");

        let err = fetcher(runner.clone(), &[])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: None,
                update: false,
                config: &config,
            })
            .unwrap_err();

        assert!(matches!(err, BuilderError::WorkspaceNotConfigured));
    }

    #[test]
    fn unparseable_url_is_an_error() {
        let gopath = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let config = repo_config("dir: github.com/org");

        let err = fetcher(runner, &[gopath.path()])
            .fetch(&FetchRequest {
                url: "",
                revision: None,
                update: false,
                config: &config,
            })
            .unwrap_err();

        assert!(matches!(err, BuilderError::InvalidRepoUrl { .. }));
    }

    #[test]
    fn clone_failure_propagates() {
        let gopath = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner::new().respond_with(|_| fail(128, "repository not found")));
        let config = repo_config("dir: github.com/org");

        let err = fetcher(runner.clone(), &[gopath.path()])
            .fetch(&FetchRequest {
                url: "https://github.com/org/lib.git",
                revision: Some("v1"),
                update: false,
                config: &config,
            })
            .unwrap_err();

        assert!(matches!(err, BuilderError::CommandFailed { .. }));
        assert_eq!(runner.calls().len(), 1);
    }

    // --- Local repository git tests ---

    fn git(dir: &Path, args: &[&str]) {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Create a non-bare repo with one commit on `main`. Returns its path.
    fn create_origin(parent: &Path) -> PathBuf {
        let origin = parent.join("origin/lib");
        fs::create_dir_all(&origin).unwrap();
        git(&origin, &["init", "--initial-branch=main"]);
        git(&origin, &["config", "user.name", "Test"]);
        git(&origin, &["config", "user.email", "test@test.com"]);
        fs::write(origin.join("lib.go"), "package lib\n").unwrap();
        git(&origin, &["add", "."]);
        git(&origin, &["commit", "-m", "Initial commit"]);
        git(&origin, &["tag", "v1.0.0"]);
        origin
    }

    fn system_fetcher(gopath: &Path) -> GitFetcher {
        let toolchain = Toolchain::new(Arc::new(SystemRunner), SearchPath::from_roots([gopath]));
        GitFetcher::new(&Config::default(), Arc::new(toolchain))
    }

    #[test]
    fn clones_and_pins_local_repository() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let origin = create_origin(temp.path());
        let gopath = temp.path().join("gopath");
        let config = repo_config("dir: example.com/org");
        let url = origin.to_string_lossy().to_string();

        let outcome = system_fetcher(&gopath)
            .fetch(&FetchRequest {
                url: &url,
                revision: Some("v1.0.0"),
                update: false,
                config: &config,
            })
            .unwrap();

        let package_dir = gopath.join("src/example.com/org/lib");
        assert!(outcome.fetched);
        assert!(outcome.checked_out);
        assert!(package_dir.join("lib.go").exists());
        assert!(crate::git::is_detached(&SystemRunner, &package_dir).unwrap());

        // A second fetch with update leaves the pinned checkout alone.
        let again = system_fetcher(&gopath)
            .fetch(&FetchRequest {
                url: &url,
                revision: None,
                update: true,
                config: &config,
            })
            .unwrap();

        assert!(!again.fetched);
        assert!(again.update_skipped);
    }

    #[test]
    fn updates_branch_checkout_from_origin() {
        let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let origin = create_origin(temp.path());
        let gopath = temp.path().join("gopath");
        let config = repo_config("dir: example.com/org");
        let url = origin.to_string_lossy().to_string();

        system_fetcher(&gopath)
            .fetch(&FetchRequest {
                url: &url,
                revision: None,
                update: false,
                config: &config,
            })
            .unwrap();

        fs::write(origin.join("new.go"), "package lib\n").unwrap();
        git(&origin, &["add", "."]);
        git(&origin, &["commit", "-m", "Second commit"]);

        let outcome = system_fetcher(&gopath)
            .fetch(&FetchRequest {
                url: &url,
                revision: None,
                update: true,
                config: &config,
            })
            .unwrap();

        assert!(outcome.updated);
        assert!(gopath.join("src/example.com/org/lib/new.go").exists());
    }
}
