//! Conventional commit message rewriter
//!
//! This library sends a free-form commit message to an OpenAI-compatible chat
//! model and returns the message reformatted to the Conventional Commits
//! specification. It also stores the API key between runs.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod prompt;
pub mod style;
pub mod types;

// Re-export commonly used types
pub use app::{App, Invocation, parse_invocation};
pub use error::{ConaiError, Result};
pub use types::{Args, Status, TransformOutcome};
