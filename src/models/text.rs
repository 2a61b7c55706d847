#[derive(Debug, Clone)]
pub struct TextGenerationRequest {
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub thinking_budget: Option<u32>,
    pub model_id: Option<String>,
}

impl TextGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
            thinking_budget: None,
            model_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextGenerationResponse {
    pub text: String,
    pub model: String,
    pub finish_reason: Option<String>,
}
