//! Top-level build orchestration.
//!
//! A [`Builder`] owns every project declared across its configuration
//! sources, in declaration order, and runs builds and pulls over them one
//! project at a time.
//!
//! # Example
//!
//! ```no_run
//! use gobuilder::{Builder, BuilderOptions};
//! use gobuilder::config::Config;
//! use gobuilder::template::TemplateData;
//!
//! let config = Config::from_yaml_str(
//!     "api:\n  fetchers: {}\n  packages: [github.com/org/api/server]\n",
//! )?;
//! let builder = Builder::new(BuilderOptions::new().config(config))?;
//!
//! builder.pull(&builder.list_projects())?;
//! builder.build(&TemplateData::new(), &["api"])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::Config;
use crate::error::{BuilderError, Result};
use crate::fetcher::FetcherRegistry;
use crate::project::{BuildMode, BuildOptions, BuildReport, Project, PullReport};
use crate::shell::SystemRunner;
use crate::template::{EntryTemplate, TemplateData};
use crate::toolchain::Toolchain;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything needed to construct a [`Builder`].
///
/// Unset collaborators fall back to production defaults: the embedded
/// template, the discovered go toolchain, the built-in fetchers and the
/// current directory.
#[derive(Debug, Default)]
pub struct BuilderOptions {
    configs: Vec<Config>,
    update_repo: bool,
    template: Option<EntryTemplate>,
    toolchain: Option<Arc<Toolchain>>,
    registry: Option<FetcherRegistry>,
    output_dir: Option<PathBuf>,
    scratch_root: Option<PathBuf>,
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source. Sources are read in the order added.
    pub fn config(mut self, config: Config) -> Self {
        self.configs.push(config);
        self
    }

    /// Add several configuration sources.
    pub fn configs(mut self, configs: impl IntoIterator<Item = Config>) -> Self {
        self.configs.extend(configs);
        self
    }

    /// Pull updates into repos that are already present.
    pub fn update_repo(mut self, update: bool) -> Self {
        self.update_repo = update;
        self
    }

    pub fn template(mut self, template: EntryTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub fn toolchain(mut self, toolchain: Arc<Toolchain>) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    pub fn registry(mut self, registry: FetcherRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Directory build artifacts are written to.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Directory scratch workspaces are created in.
    pub fn scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(dir.into());
        self
    }
}

/// The configured project set.
#[derive(Debug)]
pub struct Builder {
    order: Vec<String>,
    projects: HashMap<String, Project>,
}

impl Builder {
    /// Construct every project declared in `options`' configs.
    ///
    /// # Errors
    ///
    /// `DuplicateProject` when two sources (or one source) declare the same
    /// name, or any project construction error. No builder is returned
    /// in either case.
    pub fn new(options: BuilderOptions) -> Result<Self> {
        let template = match options.template {
            Some(template) => template,
            None => EntryTemplate::builtin()?,
        };
        let toolchain = options
            .toolchain
            .unwrap_or_else(|| Arc::new(Toolchain::discover(Arc::new(SystemRunner))));
        let registry = options.registry.unwrap_or_else(FetcherRegistry::builtin);
        let output_dir = match options.output_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        let shared = Arc::new(BuildOptions {
            update_repo: options.update_repo,
            template,
            toolchain,
            output_dir,
            scratch_root: options.scratch_root,
        });

        let mut order: Vec<String> = Vec::new();
        let mut declared = Vec::new();
        for config in &options.configs {
            for name in config.keys() {
                if order.contains(&name) {
                    return Err(BuilderError::DuplicateProject { name });
                }
                declared.push(config.child(&name));
                order.push(name);
            }
        }

        let mut projects = HashMap::with_capacity(order.len());
        for (name, config) in order.iter().zip(declared) {
            let project = Project::new(name.clone(), config, &registry, shared.clone())?;
            tracing::debug!(project = %name, "Loaded project");
            projects.insert(name.clone(), project);
        }

        Ok(Self { order, projects })
    }

    /// Project names in declaration order.
    pub fn list_projects(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Look up a project by name.
    pub fn project(&self, name: &str) -> Result<&Project> {
        self.projects
            .get(name)
            .ok_or_else(|| BuilderError::ProjectNotFound {
                name: name.to_string(),
            })
    }

    /// Build `projects` in order, stopping at the first failure.
    pub fn build<S: AsRef<str>>(
        &self,
        data: &TemplateData,
        projects: &[S],
    ) -> Result<Vec<BuildReport>> {
        let mut reports = Vec::with_capacity(projects.len());
        for name in projects {
            let project = self.project(name.as_ref())?;
            tracing::info!(project = %project.name(), "Building");
            reports.push(project.build(data, BuildMode::Build)?);
        }
        Ok(reports)
    }

    /// Build `project` into a scratch directory and run it with `args`.
    pub fn run(&self, data: &TemplateData, project: &str, args: &[String]) -> Result<BuildReport> {
        self.project(project)?.build(data, BuildMode::Run(args))
    }

    /// Pull the repos of `projects` in order, stopping at the first failure.
    pub fn pull<S: AsRef<str>>(&self, projects: &[S]) -> Result<Vec<PullReport>> {
        let mut reports = Vec::with_capacity(projects.len());
        for name in projects {
            let project = self.project(name.as_ref())?;
            tracing::info!(project = %project.name(), "Pulling");
            reports.push(project.pull()?);
        }
        Ok(reports)
    }
}
