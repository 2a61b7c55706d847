use crate::error::{Result, StudioError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// An image as exchanged with the provider: base64 bytes plus a MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String, // Base64 encoded
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(mime_type, BASE64.encode(bytes))
    }

    /// Reads an image file. The MIME type comes from the extension, falling back to magic bytes.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;

        let mime_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_from_extension)
            .or_else(|| mime_from_magic_bytes(&bytes))
            .ok_or_else(|| {
                StudioError::InvalidInput(format!(
                    "Unsupported image file: {}",
                    path.display()
                ))
            })?;

        Ok(Self::from_bytes(&bytes, mime_type))
    }

    /// Parses `data:<mime>;base64,<bytes>`.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::Decode("not a data URI".into()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| StudioError::Decode("data URI has no payload".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| StudioError::Decode("data URI is not base64 encoded".into()))?;

        if mime_type.is_empty() {
            return Err(StudioError::Decode("data URI has no MIME type".into()));
        }
        if !UPLOAD_MIME_TYPES.contains(&mime_type) {
            return Err(StudioError::InvalidInput(format!(
                "Unsupported image type: {}",
                mime_type
            )));
        }

        Ok(Self::new(mime_type, data))
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| StudioError::Decode(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.decode()?)?;
        Ok(())
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

impl fmt::Display for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Image types accepted as edit input.
pub const UPLOAD_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn mime_from_magic_bytes(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

#[derive(Debug, Clone)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub model_id: Option<String>,
    pub aspect_ratio: Option<String>,
    pub mime_type: Option<String>,
    pub num_images: Option<u32>,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: None,
            aspect_ratio: None,
            mime_type: None,
            num_images: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageGenerationResponse {
    pub images: Vec<ImagePayload>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct ImageEditRequest {
    pub instruction: String,
    pub image: ImagePayload,
    pub model_id: Option<String>,
}

/// Result of an edit call. The model may answer with text only.
#[derive(Debug, Clone)]
pub struct ImageEditResponse {
    pub image: Option<ImagePayload>,
    pub text: Option<String>,
    pub model: String,
}

// Imagen `:predict` wire types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub sample_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_options: Option<OutputOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub mime_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rai_filtered_reason: Option<String>,
}
