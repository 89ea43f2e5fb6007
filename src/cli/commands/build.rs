//! Build command implementation.
//!
//! The `gobuilder build` command builds the named projects (all of them
//! when none are named) one after another and stops at the first failure.

use crate::builder::Builder;
use crate::cli::args::BuildArgs;
use crate::error::Result;
use crate::template::TemplateData;
use crate::ui::UserInterface;

use super::dispatcher::{selected_projects, Command, CommandResult};

/// The build command implementation.
pub struct BuildCommand {
    builder: Builder,
    data: TemplateData,
    args: BuildArgs,
}

impl BuildCommand {
    pub fn new(builder: Builder, data: TemplateData, args: BuildArgs) -> Self {
        Self {
            builder,
            data,
            args,
        }
    }
}

impl Command for BuildCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        for project in selected_projects(&self.builder, &self.args.projects) {
            ui.show_header(&project);

            for report in self.builder.build(&self.data, &[&project])? {
                if report.is_skipped() {
                    ui.message("No packages configured, nothing to build");
                    continue;
                }
                for artifact in &report.artifacts {
                    ui.success(&format!("Built {}", artifact.display()));
                }
            }
        }

        Ok(CommandResult::success())
    }
}
