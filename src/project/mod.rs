//! Buildable projects.
//!
//! A [`Project`] is one top-level entry of the configuration: the packages
//! to link into a binary, the repos to pull, extra `go get`/`go build`
//! arguments and an optional cross-compile matrix. Every project owns one
//! fetcher per registered strategy, configured from its own
//! `fetchers.<strategy>` subtree.
//!
//! A build runs these steps in order and stops at the first failure:
//!
//! 1. Skip entirely when no packages are configured
//! 2. Create a scratch directory
//! 3. Write the imports unit, snapshot dependency revisions, render the
//!    main unit
//! 4. `go get -d` inside the scratch directory
//! 5. `go build` once (plain build or run) or once per target
//!
//! The imports unit is removed when the build returns; the main unit and
//! the scratch directory are left on disk for inspection.

pub mod entrypoint;
pub mod repo;
pub mod revision;

pub use repo::{Repo, DEFAULT_FETCHER};
pub use revision::{PackageRevision, RevisionError};

use crate::config::Config;
use crate::error::{BuilderError, Result};
use crate::fetcher::{FetchOutcome, Fetcher, FetcherRegistry};
use crate::template::{EntryTemplate, Metadata, TemplateData};
use crate::toolchain::Toolchain;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use entrypoint::RemoveOnDrop;

/// Prefix of every scratch directory.
pub const SCRATCH_PREFIX: &str = "gobuilder-";

/// Options shared by every project of a builder.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Pull updates into existing checkouts.
    pub update_repo: bool,
    /// Template for the main unit.
    pub template: EntryTemplate,
    /// Go toolchain and workspace.
    pub toolchain: Arc<Toolchain>,
    /// Where build artifacts are written.
    pub output_dir: PathBuf,
    /// Parent of scratch directories; the system temp dir when unset.
    pub scratch_root: Option<PathBuf>,
}

/// How a build ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode<'a> {
    /// Compile to the output directory.
    Build,
    /// Compile into the scratch directory and execute with these arguments.
    Run(&'a [String]),
}

/// One cross-compile target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub os: String,
    pub arch: String,
}

impl Target {
    /// `<project>-<os>-<arch>`
    pub fn artifact_name(&self, project: &str) -> String {
        format!("{project}-{}-{}", self.os, self.arch)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// What a build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Scratch directory; `None` when the build was skipped.
    pub workdir: Option<PathBuf>,
    /// The rendered main unit.
    pub main_source: Option<PathBuf>,
    /// Compiled binaries, in build order.
    pub artifacts: Vec<PathBuf>,
    /// Dependency revisions passed to the template.
    pub revisions: Vec<PackageRevision>,
}

impl BuildReport {
    /// True when the project has no packages and nothing ran.
    pub fn is_skipped(&self) -> bool {
        self.workdir.is_none()
    }
}

/// Result of pulling one repo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPull {
    pub name: String,
    pub url: String,
    pub fetcher: String,
    pub outcome: FetchOutcome,
}

/// Result of pulling every repo of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullReport {
    pub project: String,
    pub repos: Vec<RepoPull>,
}

impl PullReport {
    /// Repos whose requested update was skipped because they are detached.
    pub fn skipped_updates(&self) -> impl Iterator<Item = &RepoPull> {
        self.repos.iter().filter(|r| r.outcome.update_skipped)
    }
}

/// A configured project.
pub struct Project {
    name: String,
    config: Config,
    fetchers: BTreeMap<String, Box<dyn Fetcher>>,
    options: Arc<BuildOptions>,
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("fetchers", &self.fetchers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Project {
    /// Create a project from its config subtree.
    ///
    /// # Errors
    ///
    /// - `ProjectConfigEmpty` when `config` is empty
    /// - `FetchersNotConfigured` when there is no `fetchers` section
    /// - any error a fetcher constructor reports
    pub fn new(
        name: impl Into<String>,
        config: Config,
        registry: &FetcherRegistry,
        options: Arc<BuildOptions>,
    ) -> Result<Self> {
        let name = name.into();

        if config.is_empty() {
            return Err(BuilderError::ProjectConfigEmpty { project: name });
        }
        if !config.has("fetchers") {
            return Err(BuilderError::FetchersNotConfigured { project: name });
        }

        let fetchers_config = config.get_config("fetchers");
        let mut fetchers = BTreeMap::new();
        for fetcher in registry.names() {
            let instance = registry.create(
                &fetcher,
                &fetchers_config.child(&fetcher),
                options.toolchain.clone(),
            )?;
            fetchers.insert(fetcher, instance);
        }

        Ok(Self {
            name,
            config,
            fetchers,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Packages linked into the binary, in config order.
    pub fn packages(&self) -> Vec<String> {
        self.config.get_string_list("packages")
    }

    /// Names of the fetchers this project holds.
    pub fn fetcher_names(&self) -> Vec<&str> {
        self.fetchers.keys().map(String::as_str).collect()
    }

    /// Cross-compile targets: OS in config order, then arch in list order.
    pub fn targets(&self) -> Vec<Target> {
        let target = self.config.get_config("build.target");
        target
            .keys()
            .into_iter()
            .flat_map(|os| {
                target
                    .child(&os)
                    .get_string_list("")
                    .into_iter()
                    .map(move |arch| Target {
                        os: os.clone(),
                        arch,
                    })
            })
            .collect()
    }

    /// The configured repos, in config order.
    ///
    /// # Errors
    ///
    /// - `MissingField` for a repo with no config or an empty `url`
    /// - `FetcherNotFound` for a repo naming an unregistered strategy
    pub fn repos(&self) -> Result<Vec<Repo<'_>>> {
        let repos = self.config.get_config("repos");
        let mut result = Vec::new();

        for name in repos.keys() {
            let config = repos.child(&name);
            let context = format!("project '{}' repo '{name}'", self.name);
            if config.is_empty() {
                return Err(BuilderError::missing("url", context));
            }

            let url = config.get_string("url");
            if url.is_empty() {
                return Err(BuilderError::missing("url", context));
            }

            let fetcher_name = config.get_string_or("fetcher", DEFAULT_FETCHER);
            let fetcher = self
                .fetchers
                .get(&fetcher_name)
                .ok_or(BuilderError::FetcherNotFound { name: fetcher_name })?;

            let revision = config.get_string("revision");

            result.push(Repo {
                name,
                url,
                fetcher: fetcher.as_ref(),
                revision: (!revision.is_empty()).then_some(revision),
                update: self.options.update_repo,
                config,
            });
        }

        Ok(result)
    }

    /// Pull every repo, in config order, stopping at the first failure.
    pub fn pull(&self) -> Result<PullReport> {
        let mut report = PullReport {
            project: self.name.clone(),
            repos: Vec::new(),
        };

        for repo in self.repos()? {
            let outcome = repo.pull()?;
            report.repos.push(RepoPull {
                name: repo.name.clone(),
                url: repo.url.clone(),
                fetcher: repo.fetcher.name().to_string(),
                outcome,
            });
        }

        Ok(report)
    }

    /// Generate, fetch and compile this project.
    ///
    /// # Errors
    ///
    /// Any failure, wrapped in `BuilderError::Build`.
    pub fn build(&self, data: &TemplateData, mode: BuildMode<'_>) -> Result<BuildReport> {
        self.build_steps(data, mode)
            .map_err(|e| BuilderError::Build {
                project: self.name.clone(),
                source: Box::new(e),
            })
    }

    fn build_steps(&self, data: &TemplateData, mode: BuildMode<'_>) -> Result<BuildReport> {
        let packages = self.packages();
        if packages.is_empty() {
            tracing::info!(project = %self.name, "No packages configured, nothing to build");
            return Ok(BuildReport::default());
        }

        let toolchain = &self.options.toolchain;
        let workdir = self.scratch_dir()?;
        tracing::debug!(project = %self.name, workdir = %workdir.display(), "Created scratch directory");

        let imports_path = workdir.join(entrypoint::imports_file_name(&self.name));
        let main_path = workdir.join(entrypoint::main_file_name(&self.name));

        fs::write(&imports_path, entrypoint::imports_source(&packages))?;
        let _imports = RemoveOnDrop::new(&imports_path);

        let revisions =
            revision::discover_revisions(toolchain, &self.name, &workdir, &[&imports_path]);
        tracing::debug!(project = %self.name, count = revisions.len(), "Resolved dependency revisions");

        let metadata = Metadata {
            name: self.name.clone(),
            packages,
            config: self.config.clone(),
            revisions,
            built_at: chrono::Utc::now(),
        };
        let main_source = self.options.template.render(&metadata, data)?;
        fs::write(&main_path, main_source)?;

        toolchain.get(
            Some(&workdir),
            &self.config.get_string_list("build.args.go-get"),
            &[],
        )?;
        tracing::debug!(project = %self.name, "Fetched build dependencies");

        let build_args = self.config.get_string_list("build.args.go-build");
        let sources = [main_path.as_path(), imports_path.as_path()];
        let mut artifacts = Vec::new();

        match mode {
            BuildMode::Run(args) => {
                let output = workdir.join(&self.name);
                toolchain.build(&build_args, &output, &sources, &[])?;
                tracing::info!(project = %self.name, output = %output.display(), "Running");
                toolchain.exec(&output, args)?;
                artifacts.push(output);
            }
            BuildMode::Build if self.config.get_config("build.target").is_empty() => {
                let output = self.options.output_dir.join(&self.name);
                toolchain.build(&build_args, &output, &sources, &[])?;
                tracing::info!(project = %self.name, output = %output.display(), "Built");
                artifacts.push(output);
            }
            BuildMode::Build => {
                for target in self.targets() {
                    let output = self
                        .options
                        .output_dir
                        .join(target.artifact_name(&self.name));
                    toolchain.build(
                        &build_args,
                        &output,
                        &sources,
                        &[("GOOS", target.os.as_str()), ("GOARCH", target.arch.as_str())],
                    )?;
                    tracing::info!(
                        project = %self.name,
                        target = %target,
                        output = %output.display(),
                        "Built"
                    );
                    artifacts.push(output);
                }
            }
        }

        Ok(BuildReport {
            workdir: Some(workdir),
            main_source: Some(main_path),
            artifacts,
            revisions: metadata.revisions,
        })
    }

    fn scratch_dir(&self) -> Result<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);

        let dir = match &self.options.scratch_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        Ok(dir.keep())
    }
}
