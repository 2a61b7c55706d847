//! Credential lifecycle: the stored API key decides whether the gateway is usable.

use crate::{
    config::{Config, GeminiConfig},
    credential::{CredentialStore, FileStore, API_KEY_SLOT},
    error::{Result, StudioError},
    gateway::ProviderGateway,
};

pub struct Studio {
    store: Box<dyn CredentialStore>,
    gateway: ProviderGateway,
}

impl Studio {
    pub fn new(store: Box<dyn CredentialStore>, config: GeminiConfig) -> Self {
        Self {
            store,
            gateway: ProviderGateway::new(config),
        }
    }

    /// File-backed studio using `config.credentials_path` or the default location.
    pub fn from_config(config: Config) -> Result<Self> {
        let store = match config.credentials_path {
            Some(path) => FileStore::new(path),
            None => FileStore::default_location()?,
        };
        log::debug!("Credential store: {}", store.path().display());
        Ok(Self::new(Box::new(store), config.gemini))
    }

    /// Initializes the client handle with the key, then persists it. On
    /// failure neither the store nor the handle keep the new key.
    pub fn save(&mut self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(StudioError::InvalidInput("API key must not be empty.".into()));
        }

        self.gateway.initialize(api_key)?;
        if let Err(e) = self.store.set(API_KEY_SLOT, api_key) {
            log::error!("Failed to persist API key: {}", e);
            self.gateway.reset();
            return Err(e);
        }
        log::info!("API key saved");
        Ok(())
    }

    /// Forgets the key and drops the client handle. Safe to call repeatedly.
    pub fn clear(&mut self) -> Result<()> {
        self.gateway.reset();
        self.store.remove(API_KEY_SLOT)?;
        log::info!("API key cleared");
        Ok(())
    }

    /// Re-initializes from a previously stored key. Returns whether the studio is configured.
    pub fn restore(&mut self) -> Result<bool> {
        match self.store.get(API_KEY_SLOT)? {
            Some(api_key) if !api_key.trim().is_empty() => {
                self.gateway.initialize(&api_key)?;
                log::debug!("Restored stored API key");
                Ok(true)
            }
            _ => {
                self.gateway.reset();
                log::debug!("No stored API key");
                Ok(false)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_configured()
    }

    pub fn gateway(&self) -> &ProviderGateway {
        &self.gateway
    }
}
