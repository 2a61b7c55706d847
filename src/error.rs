use crate::models::EditMode;

#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// The gateway has no client handle (no API key saved yet).
    #[error("API client is not initialized. Please set your API key.")]
    NotInitialized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid edit mode specified: {0}")]
    InvalidEditMode(EditMode),

    #[error("Failed to connect with the AI to enhance the prompt. Please try again.")]
    EnhancementFailed,

    #[error("No image was generated. The response may have been blocked.")]
    NoImageGenerated,

    #[error("Image generation failed. The prompt might have been rejected. Please revise your prompt and try again.")]
    GenerationFailed,

    /// The edit model answered but returned no image. Carries the model's own text.
    #[error("The model could not edit the image. Reason: {0}")]
    EditRefused(String),

    /// The provider answered the edit call with an error. Carries the provider's message.
    #[error("{0}")]
    EditRejected(String),

    #[error("An unexpected error occurred while editing the image.")]
    EditFailed,

    #[error("Another request is already in progress.")]
    Busy,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Response error: {0}")]
    Response(String),
}

impl StudioError {
    /// True for errors raised by the caller-side checks, before any request is sent.
    pub fn is_rejected_locally(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized | Self::InvalidInput(_) | Self::InvalidEditMode(_) | Self::Busy
        )
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_refused_includes_reason() {
        let err = StudioError::EditRefused("I can't edit photos of that.".into());
        assert_eq!(
            err.to_string(),
            "The model could not edit the image. Reason: I can't edit photos of that."
        );
    }

    #[test]
    fn test_edit_rejected_is_verbatim() {
        let err = StudioError::EditRejected("INVALID_ARGUMENT: API key not valid.".into());
        assert_eq!(err.to_string(), "INVALID_ARGUMENT: API key not valid.");
    }

    #[test]
    fn test_invalid_edit_mode_display() {
        let err = StudioError::InvalidEditMode(EditMode::Generate);
        assert_eq!(err.to_string(), "Invalid edit mode specified: generate");
    }

    #[test]
    fn test_rejected_locally() {
        assert!(StudioError::NotInitialized.is_rejected_locally());
        assert!(StudioError::InvalidInput("empty".into()).is_rejected_locally());
        assert!(!StudioError::GenerationFailed.is_rejected_locally());
        assert!(!StudioError::Api {
            status: 500,
            message: "boom".into()
        }
        .is_rejected_locally());
    }
}
