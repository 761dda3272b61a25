use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConaiError {
   /// No credential on disk, or the file could not be parsed
   #[error("No usable API key found in {path}")]
   ConfigMissingOrInvalid { path: String },

   /// The provider rejected the credential (HTTP 401)
   #[error("API key was rejected by the provider")]
   InvalidCredential,

   #[error("{0}")]
   ProviderError(String),

   #[error("Failed to render prompt template: {0}")]
   TemplateError(#[from] tera::Error),

   #[error("IO error: {0}")]
   IoError(#[from] std::io::Error),

   #[error("JSON error: {0}")]
   JsonError(#[from] serde_json::Error),

   #[error("Clipboard error: {0}")]
   ClipboardError(#[from] arboard::Error),

   #[error("Argument error: {0}")]
   ArgumentError(#[from] clap::Error),

   #[error("{0}")]
   Other(String),
}

pub type Result<T> = std::result::Result<T, ConaiError>;
