use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    models::{GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse},
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

/// One authenticated round trip to the provider per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeTransport: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;

    async fn predict(&self, model: &str, request: &PredictRequest) -> Result<PredictResponse>;
}

/// HTTPS transport for the Generative Language REST API.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StudioError::Config("API key is required".into()))?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_api_error(status.as_u16(), &text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            log::debug!("Unparseable provider response: {}", text);
            StudioError::Response(e.to_string())
        })
    }
}

#[async_trait]
impl GenerativeTransport for HttpTransport {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.model_url(model, "generateContent");
        log::debug!("POST {}", url);
        self.post_json(&url, request).await
    }

    async fn predict(&self, model: &str, request: &PredictRequest) -> Result<PredictResponse> {
        let url = self.model_url(model, "predict");
        log::debug!("POST {}", url);
        self.post_json(&url, request).await
    }
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Builds an `Api` error, preferring the provider's own `error.message`.
pub(crate) fn parse_api_error(status: u16, body: &str) -> StudioError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| match (envelope.error.status, envelope.error.message) {
            (Some(code), Some(message)) => Some(format!("{}: {}", code, message)),
            (None, Some(message)) => Some(message),
            (Some(code), None) => Some(code),
            (None, None) => None,
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_string()
            } else {
                trimmed.chars().take(500).collect()
            }
        });

    StudioError::Api { status, message }
}
