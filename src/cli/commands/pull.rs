//! Pull command implementation.
//!
//! The `gobuilder pull` command fetches the repos of the named projects (all
//! of them when none are named), checks out pinned revisions and, with
//! `--update`, pulls new changes.

use crate::builder::Builder;
use crate::cli::args::PullArgs;
use crate::error::Result;
use crate::project::RepoPull;
use crate::ui::UserInterface;

use super::dispatcher::{selected_projects, Command, CommandResult};

/// The pull command implementation.
pub struct PullCommand {
    builder: Builder,
    args: PullArgs,
}

impl PullCommand {
    pub fn new(builder: Builder, args: PullArgs) -> Self {
        Self { builder, args }
    }
}

fn report_repo(ui: &mut dyn UserInterface, repo: &RepoPull) {
    let outcome = &repo.outcome;

    if outcome.update_skipped {
        ui.warning(&format!(
            "{}: checkout is detached, update skipped ({})",
            repo.name, repo.url
        ));
        return;
    }

    let mut done = Vec::new();
    if outcome.fetched {
        done.push("fetched");
    }
    if outcome.checked_out {
        done.push("checked out");
    }
    if outcome.updated {
        done.push("updated");
    }

    if done.is_empty() {
        ui.message(&format!("{}: present ({})", repo.name, repo.url));
    } else {
        ui.success(&format!("{}: {} ({})", repo.name, done.join(", "), repo.url));
    }
}

impl Command for PullCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        for project in selected_projects(&self.builder, &self.args.projects) {
            ui.show_header(&project);

            for report in self.builder.pull(&[&project])? {
                for repo in &report.repos {
                    report_repo(ui, repo);
                }
            }
        }

        Ok(CommandResult::success())
    }
}
