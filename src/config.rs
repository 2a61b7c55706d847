use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the provider. The API key itself lives in the
/// credential store and is handed over at initialization time.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub text_model: String,
    pub image_model: String,
    pub edit_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = env::var("GENSTUDIO_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = env::var("GENSTUDIO_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config = config.with_timeout_secs(secs);
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gemini: GeminiConfig,
    /// Credential file override; `None` means the per-user config directory.
    pub credentials_path: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let credentials_path = env::var("GENSTUDIO_CREDENTIALS").ok().map(PathBuf::from);

        Config {
            gemini: GeminiConfig::from_env(),
            credentials_path,
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "imagen-4.0-generate-001");
        assert_eq!(config.edit_model, "gemini-2.5-flash-image-preview");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .with_gemini(
                GeminiConfig::new()
                    .with_base_url("http://localhost:9999")
                    .with_timeout_secs(5)
                    .with_api_key("k"),
            )
            .with_credentials_path("/tmp/creds.json");

        assert_eq!(config.gemini.base_url, "http://localhost:9999");
        assert_eq!(config.gemini.timeout_secs, 5);
        assert_eq!(config.gemini.api_key.as_deref(), Some("k"));
        assert_eq!(
            config.credentials_path,
            Some(PathBuf::from("/tmp/creds.json"))
        );
    }
}
