pub mod image_client;
pub mod text_client;
pub mod transport;

use crate::{config::GeminiConfig, error::Result};
use std::sync::Arc;

pub use image_client::ImageClient;
pub use text_client::TextClient;
pub use transport::{GenerativeTransport, HttpTransport};

/// The initialized client handle: text and image capabilities over one transport.
#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl GeminiClient {
    /// Connects over HTTPS. Fails if `config.api_key` is missing or blank.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        log::debug!("Gemini client configured for {}", transport.base_url());
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    pub fn with_transport(transport: Arc<dyn GenerativeTransport>, config: &GeminiConfig) -> Self {
        Self {
            text_client: TextClient::new(transport.clone(), config.text_model.clone()),
            image_client: ImageClient::new(
                transport,
                config.image_model.clone(),
                config.edit_model.clone(),
            ),
        }
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}
