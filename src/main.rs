//! gobuilder CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use gobuilder::cli::{Cli, CommandDispatcher};
use gobuilder::ui::create_ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("gobuilder=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gobuilder=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("gobuilder starting with args: {:?}", cli);

    let mut ui = create_ui(!cli.no_color);

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            ui.error(&format!("Error: cannot determine working directory: {e}"));
            return ExitCode::from(1);
        }
    };

    let dispatcher = CommandDispatcher::new(cwd);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {e}"));
            ExitCode::from(1)
        }
    }
}
