use crate::{
    error::Result,
    gemini::transport::GenerativeTransport,
    models::{
        GenerateContentRequest, GenerationConfig, ImageEditRequest, ImageEditResponse,
        ImageGenerationRequest, ImageGenerationResponse, ImagePayload, Modality, OutputOptions,
        Part, PredictInstance, PredictParameters, PredictRequest,
    },
};
use std::sync::Arc;

const DEFAULT_OUTPUT_MIME: &str = "image/png";

#[derive(Clone)]
pub struct ImageClient {
    transport: Arc<dyn GenerativeTransport>,
    image_model: String,
    edit_model: String,
}

impl ImageClient {
    pub fn new(
        transport: Arc<dyn GenerativeTransport>,
        image_model: impl Into<String>,
        edit_model: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            image_model: image_model.into(),
            edit_model: edit_model.into(),
        }
    }

    /// Text-to-image. An empty `images` list means the provider filtered every sample.
    pub async fn generate(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse> {
        let model_id = request
            .model_id
            .clone()
            .unwrap_or_else(|| self.image_model.clone());
        let output_mime = request
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_MIME.to_string());

        let payload = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: request.num_images.unwrap_or(1),
                aspect_ratio: request.aspect_ratio.clone(),
                output_options: Some(OutputOptions {
                    mime_type: output_mime.clone(),
                }),
            },
        };

        log::info!("Generating image with model: {}", model_id);

        let response = self.transport.predict(&model_id, &payload).await?;

        for filtered in response
            .predictions
            .iter()
            .filter_map(|p| p.rai_filtered_reason.as_deref())
        {
            log::warn!("Sample filtered by provider: {}", filtered);
        }

        let images: Vec<ImagePayload> = response
            .predictions
            .into_iter()
            .filter_map(|p| {
                let data = p.bytes_base64_encoded.filter(|d| !d.is_empty())?;
                let mime_type = p.mime_type.unwrap_or_else(|| output_mime.clone());
                Some(ImagePayload::new(mime_type, data))
            })
            .collect();

        Ok(ImageGenerationResponse {
            images,
            model: model_id,
        })
    }

    /// Image + instruction to the multimodal model, asking for image and text back.
    pub async fn edit(&self, request: ImageEditRequest) -> Result<ImageEditResponse> {
        let model_id = request
            .model_id
            .clone()
            .unwrap_or_else(|| self.edit_model.clone());

        let payload = Self::build_edit_payload(&request);

        log::info!(
            "Editing image with model: {} (input {}, {} base64 chars)",
            model_id,
            request.image.mime_type,
            request.image.data.len()
        );

        let response = self.transport.generate_content(&model_id, &payload).await?;

        if let Some(reason) = response.finish_reason() {
            log::debug!("Edit finish reason: {}", reason);
        }

        let image = response
            .first_inline_data()
            .map(|inline| ImagePayload::new(inline.mime_type.clone(), inline.data.clone()));

        Ok(ImageEditResponse {
            image,
            text: response.text(),
            model: model_id,
        })
    }

    fn build_edit_payload(request: &ImageEditRequest) -> GenerateContentRequest {
        GenerateContentRequest::from_parts(vec![
            Part::inline(request.image.mime_type.clone(), request.image.data.clone()),
            Part::text(request.instruction.clone()),
        ])
        .with_config(GenerationConfig {
            response_modalities: Some(vec![Modality::Image, Modality::Text]),
            ..Default::default()
        })
    }
}
