use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{
   config::ClientSettings,
   error::{ConaiError, Result},
};

/// A chat-completion provider: one system turn, one user turn, one reply.
pub trait CompletionClient {
   fn complete(&self, api_key: &str, system: &str, user: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct Message<'a> {
   role:    &'a str,
   content: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
   model:    &'a str,
   messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
   message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
   #[serde(default)]
   content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
   choices: Vec<Choice>,
}

/// `{"error": {"message": "..."}}` body returned on failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
   error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
   message: String,
}

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAiClient {
   settings: ClientSettings,
   http:     reqwest::blocking::Client,
}

impl OpenAiClient {
   pub fn new(settings: ClientSettings) -> Result<Self> {
      // Blocking clients default to a 30s total timeout; wait for the provider
      // instead, however long a reply takes
      let http = reqwest::blocking::Client::builder()
         .timeout(None::<Duration>)
         .build()
         .map_err(|e| ConaiError::ProviderError(format!("Failed to build HTTP client: {e}")))?;
      Ok(Self { settings, http })
   }

   fn endpoint(&self) -> String {
      format!("{}/chat/completions", self.settings.api_base_url)
   }
}

/// Pull the provider's own message out of an error body, falling back to the
/// raw text or the status line.
fn provider_error_text(status: StatusCode, body: &str) -> String {
   if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
      return parsed.error.message;
   }
   let body = body.trim();
   if body.is_empty() {
      status.to_string()
   } else {
      body.to_string()
   }
}

impl CompletionClient for OpenAiClient {
   fn complete(&self, api_key: &str, system: &str, user: &str) -> Result<String> {
      let request = ApiRequest {
         model:    &self.settings.model,
         messages: vec![
            Message { role: "system", content: system },
            Message { role: "user", content: user },
         ],
      };

      let url = self.endpoint();
      tracing::debug!(%url, model = %self.settings.model, "sending completion request");

      let response = self
         .http
         .post(&url)
         .header("content-type", "application/json")
         .header("Authorization", format!("Bearer {api_key}"))
         .json(&request)
         .send()
         .map_err(|e| ConaiError::ProviderError(e.to_string()))?;

      let status = response.status();
      tracing::debug!(%status, "completion response received");

      if status == StatusCode::UNAUTHORIZED {
         return Err(ConaiError::InvalidCredential);
      }

      if !status.is_success() {
         let body = response.text().unwrap_or_default();
         return Err(ConaiError::ProviderError(provider_error_text(status, &body)));
      }

      let api_response: ApiResponse = response
         .json()
         .map_err(|e| ConaiError::ProviderError(format!("Failed to decode response: {e}")))?;

      let Some(choice) = api_response.choices.into_iter().next() else {
         return Err(ConaiError::ProviderError("API returned no choices".to_string()));
      };

      choice
         .message
         .content
         .ok_or_else(|| ConaiError::ProviderError("API returned an empty message".to_string()))
   }
}
