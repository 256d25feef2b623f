//! Command handlers for the BibliaAI CLI
//!
//! Each subcommand lives in its own module and is dispatched from `main`.

// Study generation
pub mod generate;

// History management commands
pub mod history;

// Schema inspection
pub mod schema;

// Theme preference commands
pub mod theme;

pub use generate::{run_generate, run_open, GenerateOptions, OutputOptions};
pub use history::handle_history;
pub use schema::handle_schema;
pub use theme::handle_theme;
