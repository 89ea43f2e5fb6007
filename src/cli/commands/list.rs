//! List command implementation.
//!
//! The `gobuilder list` command prints configured projects in declaration
//! order.

use crate::builder::Builder;
use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    builder: Builder,
    args: ListArgs,
}

impl ListCommand {
    pub fn new(builder: Builder, args: ListArgs) -> Self {
        Self { builder, args }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let projects = self.builder.list_projects();

        if self.args.json {
            let json = serde_json::to_string_pretty(&projects).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        for project in &projects {
            ui.message(project);
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderOptions;
    use crate::config::Config;
    use crate::shell::RecordingRunner;
    use crate::template::EntryTemplate;
    use crate::toolchain::Toolchain;
    use crate::ui::MockUI;
    use crate::workspace::SearchPath;
    use std::sync::Arc;

    fn builder() -> Builder {
        let toolchain = Toolchain::new(Arc::new(RecordingRunner::new()), SearchPath::default());
        Builder::new(
            BuilderOptions::new()
                .config(Config::from_yaml_str("web:\n  fetchers: {}\napi:\n  fetchers: {}\n").unwrap())
                .toolchain(Arc::new(toolchain))
                .template(EntryTemplate::from_source("t", "package main\n"))
                .output_dir("/out"),
        )
        .unwrap()
    }

    #[test]
    fn lists_in_declaration_order() {
        let mut ui = MockUI::new();

        let result = ListCommand::new(builder(), ListArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.messages(), ["web", "api"]);
    }

    #[test]
    fn json_output_is_an_array() {
        let mut ui = MockUI::new();

        ListCommand::new(builder(), ListArgs { json: true })
            .execute(&mut ui)
            .unwrap();

        let names: Vec<String> = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(names, vec!["web", "api"]);
    }
}
