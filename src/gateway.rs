//! The provider gateway: three user intents, three provider calls.
//!
//! Every operation either returns a complete value or a single
//! [`StudioError`]. Low-level failures are logged and replaced with an
//! operation-specific message; only the edit path passes the model's own
//! explanation, or the provider's error message, through.

use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    gemini::GeminiClient,
    models::{
        EditMode, ImageEditRequest, ImageGenerationRequest, ImagePayload, TextGenerationRequest,
    },
};

const ENHANCE_TEMPERATURE: f32 = 0.8;
const ENHANCE_MAX_OUTPUT_TOKENS: u32 = 100;
const ENHANCE_THINKING_BUDGET: u32 = 50;
const IMAGE_ASPECT_RATIO: &str = "1:1";
const IMAGE_OUTPUT_MIME: &str = "image/png";
const NO_REASON_PROVIDED: &str = "No specific reason provided.";

pub fn enhancement_instruction(prompt: &str) -> String {
    format!(
        "Enhance the following image generation prompt with vivid details, cinematic lighting, and a specific art style. Keep it concise and focused on visual elements. Original prompt: \"{}\"",
        prompt
    )
}

pub struct ProviderGateway {
    config: GeminiConfig,
    client: Option<GeminiClient>,
}

impl ProviderGateway {
    /// An unconfigured gateway. Nothing works until [`initialize`](Self::initialize).
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Builds the client handle from an API key, replacing any previous one.
    /// A blank key leaves the gateway unconfigured.
    pub fn initialize(&mut self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            self.client = None;
            return Err(StudioError::InvalidInput("API key must not be empty.".into()));
        }

        let client = GeminiClient::new(&self.config.clone().with_api_key(api_key))?;
        self.client = Some(client);
        log::info!("Gemini client initialized");
        Ok(())
    }

    /// Installs an already-built client handle.
    pub fn attach(&mut self, client: GeminiClient) {
        self.client = Some(client);
    }

    pub fn reset(&mut self) {
        if self.client.take().is_some() {
            log::info!("Gemini client cleared");
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&GeminiClient> {
        self.client.as_ref().ok_or(StudioError::NotInitialized)
    }

    pub async fn enhance_prompt(&self, prompt: &str) -> Result<String> {
        let client = self.client()?;
        let prompt = require_prompt(prompt)?;

        let mut request = TextGenerationRequest::new(enhancement_instruction(prompt));
        request.temperature = Some(ENHANCE_TEMPERATURE);
        request.max_tokens = Some(ENHANCE_MAX_OUTPUT_TOKENS);
        request.thinking_budget = Some(ENHANCE_THINKING_BUDGET);

        let response = client.text().generate(request).await.map_err(|e| {
            log::error!("Error enhancing prompt: {}", e);
            StudioError::EnhancementFailed
        })?;

        let enhanced = response.text.trim();
        if enhanced.is_empty() {
            log::error!(
                "Error enhancing prompt: empty text from {} (finish reason: {})",
                response.model,
                response.finish_reason.as_deref().unwrap_or("unknown")
            );
            return Err(StudioError::EnhancementFailed);
        }

        Ok(enhanced.to_string())
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<ImagePayload> {
        let client = self.client()?;
        let prompt = require_prompt(prompt)?;

        let mut request = ImageGenerationRequest::new(prompt);
        request.num_images = Some(1);
        request.aspect_ratio = Some(IMAGE_ASPECT_RATIO.to_string());
        request.mime_type = Some(IMAGE_OUTPUT_MIME.to_string());

        let response = client.image().generate(request).await.map_err(|e| {
            log::error!("Error generating image: {}", e);
            StudioError::GenerationFailed
        })?;

        response.images.into_iter().next().ok_or_else(|| {
            log::error!("Error generating image: {} returned no images", response.model);
            StudioError::NoImageGenerated
        })
    }

    pub async fn edit_image(
        &self,
        prompt: &str,
        image: &ImagePayload,
        mode: EditMode,
    ) -> Result<ImagePayload> {
        let client = self.client()?;
        let prompt = require_prompt(prompt)?;
        let instruction = mode
            .instruction(prompt)
            .ok_or(StudioError::InvalidEditMode(mode))?;

        if image.data.is_empty() || image.mime_type.is_empty() {
            return Err(StudioError::InvalidInput(
                "An image upload is required for editing.".into(),
            ));
        }

        let request = ImageEditRequest {
            instruction,
            image: image.clone(),
            model_id: None,
        };

        let response = client.image().edit(request).await.map_err(|e| {
            log::error!("Error editing image: {}", e);
            match e {
                StudioError::Api { message, .. } => StudioError::EditRejected(message),
                _ => StudioError::EditFailed,
            }
        })?;

        match response.image {
            Some(edited) => Ok(edited),
            None => {
                let reason = response
                    .text
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| NO_REASON_PROVIDED.to_string());
                log::error!("Error editing image: no image part ({})", reason);
                Err(StudioError::EditRefused(reason))
            }
        }
    }
}

fn require_prompt(prompt: &str) -> Result<&str> {
    if prompt.trim().is_empty() {
        return Err(StudioError::InvalidInput("A text prompt is required.".into()));
    }
    Ok(prompt)
}
