use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConaiError, Result};

/// File name of the credential store, placed beside the executable
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// On-disk credential record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
   pub api_key: String,
}

/// Where the API credential lives between runs.
///
/// The dispatcher only talks to this trait, so tests can hand it an
/// in-memory store or a file in a temp dir.
pub trait KeyStore {
   /// Overwrite the stored credential. No format validation is done.
   fn set_key(&self, key: &str) -> Result<()>;

   /// Read the stored credential.
   ///
   /// Any failure (missing file, bad JSON, missing field) collapses into
   /// [`ConaiError::ConfigMissingOrInvalid`].
   fn load_key(&self) -> Result<String>;
}

/// JSON file store: `{ "apiKey": "..." }`, pretty-printed.
#[derive(Debug, Clone)]
pub struct JsonKeyStore {
   path: PathBuf,
}

impl JsonKeyStore {
   pub fn new(path: impl Into<PathBuf>) -> Self {
      Self { path: path.into() }
   }

   /// Store at the default location.
   ///
   /// `CONAI_CONFIG` overrides the path; otherwise the file sits next to the
   /// running executable.
   pub fn locate() -> Result<Self> {
      let path = if let Ok(custom_path) = std::env::var("CONAI_CONFIG") {
         PathBuf::from(custom_path)
      } else {
         Self::default_config_path()?
      };
      tracing::debug!(path = %path.display(), "using credential store");
      Ok(Self::new(path))
   }

   pub fn default_config_path() -> Result<PathBuf> {
      let exe = std::env::current_exe()?;
      let dir = exe.parent().ok_or_else(|| {
         ConaiError::Other(format!("Executable path {} has no parent directory", exe.display()))
      })?;
      Ok(dir.join(CONFIG_FILE_NAME))
   }

   pub fn path(&self) -> &Path {
      &self.path
   }

   fn invalid(&self) -> ConaiError {
      ConaiError::ConfigMissingOrInvalid { path: self.path.display().to_string() }
   }
}

impl KeyStore for JsonKeyStore {
   fn set_key(&self, key: &str) -> Result<()> {
      let record = StoredConfig { api_key: key.to_string() };
      let contents = serde_json::to_string_pretty(&record)?;
      std::fs::write(&self.path, contents)?;
      tracing::debug!(path = %self.path.display(), "credential written");
      Ok(())
   }

   fn load_key(&self) -> Result<String> {
      let contents = std::fs::read_to_string(&self.path).map_err(|e| {
         tracing::debug!(path = %self.path.display(), error = %e, "credential file unreadable");
         self.invalid()
      })?;
      let record: StoredConfig = serde_json::from_str(&contents).map_err(|e| {
         tracing::debug!(path = %self.path.display(), error = %e, "credential file malformed");
         self.invalid()
      })?;
      Ok(record.api_key)
   }
}

/// Endpoint and model used for the completion call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
   pub api_base_url: String,
   pub model:        String,
}

impl Default for ClientSettings {
   fn default() -> Self {
      Self { api_base_url: DEFAULT_API_BASE_URL.to_string(), model: DEFAULT_MODEL.to_string() }
   }
}

impl ClientSettings {
   /// Defaults with environment overrides applied:
   /// - `CONAI_API_URL` overrides `api_base_url`
   /// - `CONAI_MODEL` overrides `model`
   pub fn from_env() -> Self {
      let mut settings = Self::default();
      settings.apply_overrides(
         std::env::var("CONAI_API_URL").ok(),
         std::env::var("CONAI_MODEL").ok(),
      );
      settings
   }

   fn apply_overrides(&mut self, api_url: Option<String>, model: Option<String>) {
      if let Some(api_url) = api_url.filter(|s| !s.trim().is_empty()) {
         self.api_base_url = api_url.trim_end_matches('/').to_string();
      }
      if let Some(model) = model.filter(|s| !s.trim().is_empty()) {
         self.model = model;
      }
   }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
   pub key: std::cell::RefCell<Option<String>>,
}

#[cfg(test)]
impl KeyStore for MemoryKeyStore {
   fn set_key(&self, key: &str) -> Result<()> {
      *self.key.borrow_mut() = Some(key.to_string());
      Ok(())
   }

   fn load_key(&self) -> Result<String> {
      self
         .key
         .borrow()
         .clone()
         .ok_or_else(|| ConaiError::ConfigMissingOrInvalid { path: "<memory>".to_string() })
   }
}

#[cfg(test)]
mod tests {
   use tempfile::TempDir;

   use super::*;

   fn store_in(dir: &TempDir) -> JsonKeyStore {
      JsonKeyStore::new(dir.path().join(CONFIG_FILE_NAME))
   }

   #[test]
   fn test_set_key_writes_pretty_json() {
      let dir = TempDir::new().unwrap();
      let store = store_in(&dir);
      store.set_key("sk-test-123").unwrap();

      let written = std::fs::read_to_string(store.path()).unwrap();
      assert_eq!(written, "{\n  \"apiKey\": \"sk-test-123\"\n}");
   }

   #[test]
   fn test_set_then_load_round_trip() {
      let dir = TempDir::new().unwrap();
      let store = store_in(&dir);
      store.set_key("sk-round-trip").unwrap();
      assert_eq!(store.load_key().unwrap(), "sk-round-trip");
   }

   #[test]
   fn test_set_key_overwrites_previous() {
      let dir = TempDir::new().unwrap();
      let store = store_in(&dir);
      store.set_key("first").unwrap();
      store.set_key("second").unwrap();
      assert_eq!(store.load_key().unwrap(), "second");
   }

   #[test]
   fn test_set_key_accepts_any_string() {
      let dir = TempDir::new().unwrap();
      let store = store_in(&dir);
      store.set_key("has \"quotes\" and spaces").unwrap();
      assert_eq!(store.load_key().unwrap(), "has \"quotes\" and spaces");
   }

   #[test]
   fn test_load_missing_file() {
      let dir = TempDir::new().unwrap();
      let result = store_in(&dir).load_key();
      assert!(matches!(result.unwrap_err(), ConaiError::ConfigMissingOrInvalid { .. }));
   }

   #[test]
   fn test_load_malformed_json() {
      let dir = TempDir::new().unwrap();
      let store = store_in(&dir);
      std::fs::write(store.path(), "{ apiKey: nope").unwrap();
      assert!(matches!(store.load_key().unwrap_err(), ConaiError::ConfigMissingOrInvalid { .. }));
   }

   #[test]
   fn test_load_missing_field() {
      let dir = TempDir::new().unwrap();
      let store = store_in(&dir);
      std::fs::write(store.path(), r#"{ "token": "abc" }"#).unwrap();
      assert!(matches!(store.load_key().unwrap_err(), ConaiError::ConfigMissingOrInvalid { .. }));
   }

   #[test]
   fn test_load_wrong_field_type() {
      let dir = TempDir::new().unwrap();
      let store = store_in(&dir);
      std::fs::write(store.path(), r#"{ "apiKey": 42 }"#).unwrap();
      assert!(matches!(store.load_key().unwrap_err(), ConaiError::ConfigMissingOrInvalid { .. }));
   }

   #[test]
   fn test_set_key_into_missing_directory_fails() {
      let dir = TempDir::new().unwrap();
      let store = JsonKeyStore::new(dir.path().join("nope").join(CONFIG_FILE_NAME));
      assert!(matches!(store.set_key("k").unwrap_err(), ConaiError::IoError(_)));
   }

   #[test]
   fn test_client_settings_defaults() {
      let settings = ClientSettings::default();
      assert_eq!(settings.api_base_url, "https://api.openai.com/v1");
      assert_eq!(settings.model, "gpt-3.5-turbo");
   }

   #[test]
   fn test_client_settings_overrides() {
      let mut settings = ClientSettings::default();
      settings
         .apply_overrides(Some("http://localhost:4000/".to_string()), Some("gpt-4o".to_string()));
      assert_eq!(settings.api_base_url, "http://localhost:4000");
      assert_eq!(settings.model, "gpt-4o");
   }

   #[test]
   fn test_client_settings_ignores_blank_overrides() {
      let mut settings = ClientSettings::default();
      settings.apply_overrides(Some("  ".to_string()), Some(String::new()));
      assert_eq!(settings, ClientSettings::default());
   }
}
