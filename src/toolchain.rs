//! The Go toolchain as gobuilder drives it.
//!
//! [`Toolchain`] bundles the command runner, the `go` executable and the
//! workspace search path so fetchers and project builds share one view of
//! where packages live.

use crate::error::Result;
use crate::shell::{run_checked, CommandRunner, CommandSpec};
use crate::workspace::SearchPath;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Format passed to `go list` to print one transitive dependency per line.
pub const DEPS_FORMAT: &str = r#"{{join .Deps "\n"}}"#;

/// Shared handle on the go toolchain and workspace.
#[derive(Clone)]
pub struct Toolchain {
    runner: Arc<dyn CommandRunner>,
    go: String,
    workspace: SearchPath,
    goroot: Option<PathBuf>,
    gopath_mode: bool,
}

impl fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolchain")
            .field("go", &self.go)
            .field("workspace", &self.workspace)
            .field("goroot", &self.goroot)
            .field("gopath_mode", &self.gopath_mode)
            .finish_non_exhaustive()
    }
}

impl Toolchain {
    /// Create a toolchain over an explicit workspace.
    pub fn new(runner: Arc<dyn CommandRunner>, workspace: SearchPath) -> Self {
        Self {
            runner,
            go: "go".to_string(),
            workspace,
            goroot: None,
            gopath_mode: true,
        }
    }

    /// Create a toolchain from `GOPATH`/`GOROOT`, asking `go env` for
    /// whichever is unset.
    pub fn discover(runner: Arc<dyn CommandRunner>) -> Self {
        let mut toolchain = Self::new(runner, SearchPath::from_env());

        if toolchain.workspace.is_empty() {
            if let Some(gopath) = toolchain.go_env("GOPATH") {
                toolchain.workspace = SearchPath::parse(&gopath);
            }
        }

        toolchain.goroot = std::env::var("GOROOT")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| toolchain.go_env("GOROOT"))
            .map(PathBuf::from);

        tracing::debug!(
            workspace = ?toolchain.workspace.roots(),
            goroot = ?toolchain.goroot,
            "Discovered go toolchain"
        );

        toolchain
    }

    /// Set the toolchain root searched during revision discovery.
    pub fn with_goroot(mut self, goroot: impl Into<PathBuf>) -> Self {
        self.goroot = Some(goroot.into());
        self
    }

    /// Toggle `GO111MODULE=off` on every go invocation (on by default).
    pub fn with_gopath_mode(mut self, enabled: bool) -> Self {
        self.gopath_mode = enabled;
        self
    }

    fn go_env(&self, key: &str) -> Option<String> {
        let spec = CommandSpec::new(&self.go).args(["env", key]).capture();
        match self.runner.run(&spec) {
            Ok(result) if result.success => {
                let value = result.stdout.trim().to_string();
                (!value.is_empty()).then_some(value)
            }
            Ok(_) | Err(_) => None,
        }
    }

    /// The command runner.
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// The workspace search path where packages are fetched.
    pub fn workspace(&self) -> &SearchPath {
        &self.workspace
    }

    /// Search path for dependency lookups: the workspace plus `GOROOT`.
    pub fn lookup_path(&self) -> SearchPath {
        match &self.goroot {
            Some(goroot) => self.workspace.with_root(goroot),
            None => self.workspace.clone(),
        }
    }

    fn go(&self) -> CommandSpec {
        let spec = CommandSpec::new(&self.go);
        if self.gopath_mode {
            spec.env("GO111MODULE", "off")
        } else {
            spec
        }
    }

    /// `go get -d [args] [packages]`, optionally inside `dir`.
    pub fn get(&self, dir: Option<&Path>, args: &[String], packages: &[&str]) -> Result<()> {
        let mut spec = self
            .go()
            .args(["get", "-d"])
            .args(args.iter().cloned())
            .args(packages.iter().copied());
        if let Some(dir) = dir {
            spec = spec.cwd(dir);
        }
        run_checked(self.runner(), &spec)?;
        Ok(())
    }

    /// `go build [args] -o <output> <sources>` with extra environment.
    pub fn build(
        &self,
        args: &[String],
        output: &Path,
        sources: &[&Path],
        env: &[(&str, &str)],
    ) -> Result<()> {
        let mut spec = self
            .go()
            .arg("build")
            .args(args.iter().cloned())
            .arg("-o")
            .arg(output.to_string_lossy())
            .args(sources.iter().map(|s| s.to_string_lossy().into_owned()));
        for (key, value) in env {
            spec = spec.env(*key, *value);
        }
        run_checked(self.runner(), &spec)?;
        Ok(())
    }

    /// Transitive import paths of `sources`, in the order `go list` prints them.
    pub fn list_deps(&self, dir: &Path, sources: &[&Path]) -> Result<Vec<String>> {
        let spec = self
            .go()
            .args(["list", "-f", DEPS_FORMAT])
            .args(sources.iter().map(|s| s.to_string_lossy().into_owned()))
            .cwd(dir)
            .capture();
        let result = run_checked(self.runner(), &spec)?;

        Ok(result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Run a built binary with inherited stdio.
    pub fn exec(&self, binary: &Path, args: &[String]) -> Result<()> {
        let spec = CommandSpec::new(binary.to_string_lossy()).args(args.iter().cloned());
        run_checked(self.runner(), &spec)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::mock::{fail, ok};
    use crate::shell::RecordingRunner;

    fn toolchain(runner: &Arc<RecordingRunner>) -> Toolchain {
        Toolchain::new(runner.clone(), SearchPath::from_roots(["/gopath"]))
    }

    #[test]
    fn get_sets_gopath_mode_and_args() {
        let runner = Arc::new(RecordingRunner::new());

        toolchain(&runner)
            .get(Some(Path::new("/tmp/w")), &["-v".to_string()], &[])
            .unwrap();

        let call = &runner.calls()[0];
        assert_eq!(call.program, "go");
        assert_eq!(call.arg_strs(), vec!["get", "-d", "-v"]);
        assert_eq!(call.options.env.get("GO111MODULE").unwrap(), "off");
        assert_eq!(call.options.cwd.as_deref(), Some(Path::new("/tmp/w")));
    }

    #[test]
    fn gopath_mode_can_be_disabled() {
        let runner = Arc::new(RecordingRunner::new());

        toolchain(&runner)
            .with_gopath_mode(false)
            .get(None, &[], &["example.com/x"])
            .unwrap();

        assert!(runner.calls()[0].options.env.is_empty());
    }

    #[test]
    fn build_places_output_before_sources() {
        let runner = Arc::new(RecordingRunner::new());

        toolchain(&runner)
            .build(
                &["-trimpath".to_string()],
                Path::new("/out/api"),
                &[Path::new("/w/main_api.go"), Path::new("/w/main_api_imports.go")],
                &[("GOOS", "linux")],
            )
            .unwrap();

        let call = &runner.calls()[0];
        assert_eq!(
            call.arg_strs(),
            vec![
                "build",
                "-trimpath",
                "-o",
                "/out/api",
                "/w/main_api.go",
                "/w/main_api_imports.go"
            ]
        );
        assert_eq!(call.options.env.get("GOOS").unwrap(), "linux");
    }

    #[test]
    fn list_deps_splits_lines() {
        let runner = Arc::new(
            RecordingRunner::new().respond_with(|_| ok("fmt\ngithub.com/org/a\n\n  github.com/org/b \n")),
        );

        let deps = toolchain(&runner)
            .list_deps(Path::new("/w"), &[Path::new("/w/imports.go")])
            .unwrap();

        assert_eq!(deps, vec!["fmt", "github.com/org/a", "github.com/org/b"]);
        assert_eq!(runner.calls()[0].args[2], DEPS_FORMAT);
    }

    #[test]
    fn build_failure_is_an_error() {
        let runner = Arc::new(RecordingRunner::new().respond_with(|_| fail(2, "undefined: x")));

        let result = toolchain(&runner).build(&[], Path::new("/o"), &[], &[]);

        assert!(result.is_err());
    }

    #[test]
    fn lookup_path_appends_goroot() {
        let runner = Arc::new(RecordingRunner::new());

        let path = toolchain(&runner).with_goroot("/goroot").lookup_path();

        assert_eq!(
            path.roots(),
            &[PathBuf::from("/gopath"), PathBuf::from("/goroot")]
        );
    }

    #[test]
    fn exec_runs_binary_with_args() {
        let runner = Arc::new(RecordingRunner::new());

        toolchain(&runner)
            .exec(Path::new("/w/api"), &["--port".to_string(), "80".to_string()])
            .unwrap();

        assert_eq!(runner.command_lines(), vec!["/w/api --port 80"]);
    }
}
