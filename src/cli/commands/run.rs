//! Run command implementation.
//!
//! The `gobuilder run` command builds one project into a scratch directory
//! and executes the binary with the arguments given after `--`.

use crate::builder::Builder;
use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::template::TemplateData;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    builder: Builder,
    data: TemplateData,
    args: RunArgs,
}

impl RunCommand {
    pub fn new(builder: Builder, data: TemplateData, args: RunArgs) -> Self {
        Self {
            builder,
            data,
            args,
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self
            .builder
            .run(&self.data, &self.args.project, &self.args.args)?;

        if report.is_skipped() {
            ui.warning(&format!(
                "Project '{}' has no packages, nothing to run",
                self.args.project
            ));
        }

        Ok(CommandResult::success())
    }
}
