//! Ephemeral session state for a front end: prompt, uploaded image, result,
//! progress message and last error.
//!
//! Gateway failures never escape a workbench action. They are stored as a
//! display string in [`WorkbenchState::error`]. The only error an action
//! returns is [`StudioError::Busy`], when another action is still running.

use crate::{
    error::{Result, StudioError},
    gateway::ProviderGateway,
    models::{EditMode, ImagePayload},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_PROMPT: &str = "A photorealistic image of a majestic lion in the savanna at sunset, detailed fur, warm lighting.";
const ENHANCING_MESSAGE: &str = "Enhancing prompt...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbenchState {
    pub prompt: String,
    pub input_image: Option<ImagePayload>,
    pub output_image: Option<ImagePayload>,
    pub loading_message: Option<String>,
    pub error: Option<String>,
}

impl Default for WorkbenchState {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            input_image: None,
            output_image: None,
            loading_message: None,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Workbench {
    state: Mutex<WorkbenchState>,
    busy: AtomicBool,
}

/// Marks the workbench busy; dropping it (on any exit path) frees it again.
struct BusyGuard<'a> {
    workbench: &'a Workbench,
}

impl<'a> BusyGuard<'a> {
    fn acquire(workbench: &'a Workbench) -> Result<Self> {
        workbench
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StudioError::Busy)?;
        Ok(Self { workbench })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.workbench.lock().loading_message = None;
        self.workbench.busy.store(false, Ordering::Release);
    }
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, WorkbenchState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> WorkbenchState {
        self.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.lock().prompt = prompt.into();
    }

    /// Sets or removes the image that edit actions work on.
    pub fn set_input_image(&self, image: Option<ImagePayload>) {
        self.lock().input_image = image;
    }

    /// Replaces the prompt with an enhanced version.
    pub async fn enhance(&self, gateway: &ProviderGateway) -> Result<()> {
        let _busy = BusyGuard::acquire(self)?;

        let prompt = {
            let mut state = self.lock();
            if state.prompt.trim().is_empty() {
                state.error = Some("Please enter a prompt to enhance.".to_string());
                return Ok(());
            }
            state.loading_message = Some(ENHANCING_MESSAGE.to_string());
            state.error = None;
            state.prompt.clone()
        };

        let result = gateway.enhance_prompt(&prompt).await;

        let mut state = self.lock();
        match result {
            Ok(enhanced) => state.prompt = enhanced,
            Err(e) => {
                log_failure("Enhance", &e);
                state.error = Some(e.to_string());
            }
        }
        Ok(())
    }

    /// Runs the action selected by `mode` against the current prompt and upload.
    pub async fn submit(&self, gateway: &ProviderGateway, mode: EditMode) -> Result<()> {
        let _busy = BusyGuard::acquire(self)?;

        let (prompt, input_image) = {
            let mut state = self.lock();
            state.error = None;
            state.output_image = None;

            if state.prompt.trim().is_empty() {
                state.error = Some("A text prompt is required for all actions.".to_string());
                return Ok(());
            }
            if mode.requires_image() && state.input_image.is_none() {
                state.error = Some("An image upload is required for editing.".to_string());
                return Ok(());
            }

            state.loading_message = Some(mode.loading_message().to_string());
            (state.prompt.clone(), state.input_image.clone())
        };

        let result = match (mode, input_image) {
            (EditMode::Generate, _) => gateway.generate_image(&prompt).await,
            (mode, Some(image)) => gateway.edit_image(&prompt, &image, mode).await,
            (mode, None) => Err(StudioError::InvalidInput(format!(
                "An image upload is required for {}.",
                mode
            ))),
        };

        let mut state = self.lock();
        match result {
            Ok(image) => state.output_image = Some(image),
            Err(e) => {
                log_failure(mode.as_str(), &e);
                state.error = Some(e.to_string());
            }
        }
        Ok(())
    }
}

/// Local rejections are user mistakes, not provider failures.
fn log_failure(action: &str, error: &StudioError) {
    if error.is_rejected_locally() {
        log::warn!("{} rejected: {}", action, error);
    } else {
        log::error!("{} failed: {}", action, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::gemini::transport::{GenerativeTransport, MockGenerativeTransport};
    use crate::gemini::GeminiClient;
    use crate::models::{
        GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse,
        Prediction,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    fn gateway_with(transport: Arc<dyn GenerativeTransport>) -> ProviderGateway {
        let config = GeminiConfig::default();
        let mut gateway = ProviderGateway::new(config.clone());
        gateway.attach(GeminiClient::with_transport(transport, &config));
        gateway
    }

    fn png_prediction() -> PredictResponse {
        PredictResponse {
            predictions: vec![Prediction {
                bytes_base64_encoded: Some("iVBORw0KGgo=".into()),
                mime_type: Some("image/png".into()),
                rai_filtered_reason: None,
            }],
        }
    }

    /// Holds every `predict` call until a permit is released.
    struct GatedTransport {
        gate: Semaphore,
    }

    #[async_trait]
    impl GenerativeTransport for GatedTransport {
        async fn generate_content(
            &self,
            _model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse> {
            Err(StudioError::Response("not used".into()))
        }

        async fn predict(&self, _model: &str, _request: &PredictRequest) -> Result<PredictResponse> {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| StudioError::Response(e.to_string()))?;
            Ok(png_prediction())
        }
    }

    #[test]
    fn test_initial_state() {
        let workbench = Workbench::new();
        let state = workbench.snapshot();
        assert_eq!(state.prompt, DEFAULT_PROMPT);
        assert!(state.output_image.is_none());
        assert!(!workbench.is_busy());
    }

    #[tokio::test]
    async fn test_blank_prompt_guards() {
        let mut mock = MockGenerativeTransport::new();
        mock.expect_generate_content().never();
        mock.expect_predict().never();
        let gateway = gateway_with(Arc::new(mock));

        let workbench = Workbench::new();
        workbench.set_prompt("   ");

        workbench.enhance(&gateway).await.unwrap();
        assert_eq!(
            workbench.snapshot().error.as_deref(),
            Some("Please enter a prompt to enhance.")
        );

        workbench.submit(&gateway, EditMode::Generate).await.unwrap();
        assert_eq!(
            workbench.snapshot().error.as_deref(),
            Some("A text prompt is required for all actions.")
        );
    }

    #[tokio::test]
    async fn test_edit_requires_upload() {
        let mut mock = MockGenerativeTransport::new();
        mock.expect_generate_content().never();
        let gateway = gateway_with(Arc::new(mock));

        let workbench = Workbench::new();
        workbench
            .submit(&gateway, EditMode::ChangeBackground)
            .await
            .unwrap();
        assert_eq!(
            workbench.snapshot().error.as_deref(),
            Some("An image upload is required for editing.")
        );
    }

    #[tokio::test]
    async fn test_generate_stores_output() {
        let mut mock = MockGenerativeTransport::new();
        mock.expect_predict()
            .times(1)
            .returning(|_, _| Ok(png_prediction()));
        let gateway = gateway_with(Arc::new(mock));

        let workbench = Workbench::new();
        workbench.submit(&gateway, EditMode::Generate).await.unwrap();

        let state = workbench.snapshot();
        assert!(state.error.is_none());
        assert!(state.loading_message.is_none());
        assert_eq!(
            state.output_image.unwrap().to_data_uri(),
            "data:image/png;base64,iVBORw0KGgo="
        );
        assert!(!workbench.is_busy());
    }

    #[tokio::test]
    async fn test_gateway_error_becomes_message() {
        let gateway = ProviderGateway::new(GeminiConfig::default());
        let workbench = Workbench::new();

        workbench.submit(&gateway, EditMode::Generate).await.unwrap();
        let state = workbench.snapshot();
        assert_eq!(
            state.error.as_deref(),
            Some("API client is not initialized. Please set your API key.")
        );
        assert!(state.output_image.is_none());
        assert!(!workbench.is_busy());
    }

    #[tokio::test]
    async fn test_enhance_replaces_prompt() {
        let mut mock = MockGenerativeTransport::new();
        mock.expect_generate_content().times(1).returning(|_, _| {
            Ok(GenerateContentResponse {
                candidates: vec![crate::models::Candidate {
                    content: Some(crate::models::Content {
                        role: Some("model".into()),
                        parts: vec![crate::models::Part::text(" A lion at golden hour. ")],
                    }),
                    finish_reason: None,
                }],
                prompt_feedback: None,
            })
        });
        let gateway = gateway_with(Arc::new(mock));

        let workbench = Workbench::new();
        workbench.set_prompt("a lion");
        workbench.enhance(&gateway).await.unwrap();
        assert_eq!(workbench.snapshot().prompt, "A lion at golden hour.");
    }

    #[tokio::test]
    async fn test_second_action_rejected_while_busy() {
        let transport = Arc::new(GatedTransport {
            gate: Semaphore::new(0),
        });
        let gateway = gateway_with(transport.clone());
        let workbench = Workbench::new();

        let first = workbench.submit(&gateway, EditMode::Generate);
        let second = async {
            tokio::task::yield_now().await;
            assert!(workbench.is_busy());
            assert_eq!(
                workbench.snapshot().loading_message.as_deref(),
                Some("Generating your masterpiece...")
            );
            let rejected = workbench.enhance(&gateway).await;
            transport.gate.add_permits(1);
            rejected
        };

        let (first, second) = tokio::join!(first, second);
        assert!(first.is_ok());
        assert!(matches!(second, Err(StudioError::Busy)));

        let state = workbench.snapshot();
        assert!(state.output_image.is_some());
        assert!(state.loading_message.is_none());
        assert!(!workbench.is_busy());
    }
}
