//! User-facing output.
//!
//! Commands talk to the user through the [`UserInterface`] trait so they can
//! be exercised with [`MockUI`] in tests. Diagnostics go through `tracing`
//! instead; this module is only for results the user asked for.

pub mod mock;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Theme};

/// Trait for user interface interactions.
pub trait UserInterface {
    /// Plain output.
    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    /// A section header, e.g. the project being built.
    fn show_header(&mut self, title: &str);
}
