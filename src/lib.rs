//! BibliaAI - Bible studies and sermons generated by AI
//!
//! This library turns a topic into a structured Bible study and complete
//! sermon, fetches a bounded set of illustrations, and keeps a short local
//! history of past studies.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `content`: Study data model, response schema, validation and rendering
//! - `prompts`: Persona, study instruction and illustration style
//! - `providers`: Generative capability abstraction (Gemini, Ollama, fake)
//! - `generation`: Content and illustration requests
//! - `illustrations`: Bounded, failure-tolerant illustration batches
//! - `storage`: Key/value persistence, study history and theme preference
//! - `facade`: Single entry point used by the CLI
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use bibliaai::{Config, OrchestrationFacade};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let facade = OrchestrationFacade::from_config(&config)?;
//!     let study = facade.generate("A Graça").await?;
//!     println!("{}", bibliaai::content::to_markdown(&study));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod facade;
pub mod generation;
pub mod illustrations;
pub mod prompts;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use content::{GeneratedImage, StudyContent};
pub use error::{BibliaError, Result};
pub use facade::OrchestrationFacade;
pub use generation::GenerationClient;
pub use illustrations::{IllustrationBatcher, Liveness};
pub use storage::{HistoryStore, KeyValueStore, TimelineEntry};

#[cfg(test)]
pub mod test_utils;
