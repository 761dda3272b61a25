//! Prompt assembly for the conventionalize request.
//!
//! Both prompt texts are compiled into the binary from `prompts/`. The user
//! prompt wraps the raw message in `"""` delimiters. The message is inserted
//! verbatim: a message that itself contains `"""` is passed through as-is and
//! may blur where the quoted text ends for the model.

use rust_embed::RustEmbed;
use tera::{Context, Tera};

use crate::error::{ConaiError, Result};

/// Embedded prompts folder (compiled into binary)
#[derive(RustEmbed)]
#[folder = "prompts/"]
struct Prompts;

const SYSTEM_TEMPLATE: &str = "system.md";
const USER_TEMPLATE: &str = "user.md";

/// The two messages sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
   pub system: String,
   pub user:   String,
}

fn load_embedded(name: &str) -> Result<String> {
   let file = Prompts::get(name)
      .ok_or_else(|| ConaiError::Other(format!("Embedded prompt {name} not found")))?;
   std::str::from_utf8(file.data.as_ref())
      .map(|s| s.trim_end().to_string())
      .map_err(|e| ConaiError::Other(format!("Embedded prompt {name} is not valid UTF-8: {e}")))
}

/// Fixed system instruction describing the Conventional Commits rules.
pub fn system_prompt() -> Result<String> {
   load_embedded(SYSTEM_TEMPLATE)
}

/// User prompt with `message` quoted inside it.
pub fn user_prompt(message: &str) -> Result<String> {
   let template = load_embedded(USER_TEMPLATE)?;

   let mut context = Context::new();
   context.insert("message", message);

   // Markdown, not HTML: escaping would rewrite quotes in the message
   Ok(Tera::one_off(&template, &context, false)?)
}

/// Build both prompts for one request.
pub fn build_prompts(message: &str) -> Result<PromptPair> {
   Ok(PromptPair { system: system_prompt()?, user: user_prompt(message)? })
}
