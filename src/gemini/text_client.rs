use crate::{
    error::{Result, StudioError},
    gemini::transport::GenerativeTransport,
    models::{
        GenerateContentRequest, GenerationConfig, Part, TextGenerationRequest,
        TextGenerationResponse, ThinkingConfig,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct TextClient {
    transport: Arc<dyn GenerativeTransport>,
    default_model: String,
}

impl TextClient {
    pub fn new(transport: Arc<dyn GenerativeTransport>, default_model: impl Into<String>) -> Self {
        Self {
            transport,
            default_model: default_model.into(),
        }
    }

    pub async fn generate(&self, request: TextGenerationRequest) -> Result<TextGenerationResponse> {
        let model_id = request
            .model_id
            .as_deref()
            .unwrap_or(&self.default_model)
            .to_string();

        let payload = Self::build_request_payload(&request);

        log::info!("Invoking model: {}", model_id);
        log::debug!(
            "Text generation request: {}",
            serde_json::to_string(&payload).unwrap_or_default()
        );

        let response = self.transport.generate_content(&model_id, &payload).await?;
        let finish_reason = response.finish_reason().map(String::from);

        let text = response.text().ok_or_else(|| {
            StudioError::Response(format!(
                "No text in response (finish reason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        Ok(TextGenerationResponse {
            text,
            model: model_id,
            finish_reason,
        })
    }

    fn build_request_payload(request: &TextGenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest::from_parts(vec![Part::text(request.prompt.clone())]).with_config(
            GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                thinking_config: request
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
                response_modalities: None,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_carries_sampling_settings() {
        let mut request = TextGenerationRequest::new("hello");
        request.temperature = Some(0.8);
        request.max_tokens = Some(100);
        request.thinking_budget = Some(50);

        let payload = TextClient::build_request_payload(&request);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 100);
        assert_eq!(json["generationConfig"]["thinkingConfig"]["thinkingBudget"], 50);
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_payload_omits_unset_settings() {
        let payload = TextClient::build_request_payload(&TextGenerationRequest::new("hi"));
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["generationConfig"].get("thinkingConfig").is_none());
        assert!(json["generationConfig"].get("temperature").is_none());
    }
}
