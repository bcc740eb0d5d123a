//! Hugging Face Inference API client
//!
//! One HTTP client serves all three creative capabilities. Each model is
//! addressed as `{base_url}/models/{model}` with a bearer token.
//!
//! The request deadline is enforced here (`inference.timeout_secs`), not by the pipeline.

use async_trait::async_trait;
use bard_common::config::{BardConfig, InferenceConfig, ModelConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{
    GenerationParams, LyricsProvider, MusicProvider, ProviderError, ProviderErrorKind,
    VocalsProvider,
};
use crate::models::EncodedAudio;

const USER_AGENT: &str = concat!("bard/", env!("CARGO_PKG_VERSION"));

/// Prefix the lyrics model expects before free-form reasoning
const THINK_PREFIX: &str = "<think>\n";

#[derive(Debug, Serialize)]
struct TextGenerationRequest {
    inputs: String,
    parameters: TextGenerationParameters,
}

#[derive(Debug, Serialize)]
struct TextGenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
    do_sample: bool,
    top_p: f32,
    repetition_penalty: f32,
}

#[derive(Debug, Serialize)]
struct AudioRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Text generation returns either a list of candidates or a single object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextGenerationResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl TextGenerationResponse {
    fn into_text(self) -> Option<String> {
        match self {
            TextGenerationResponse::Many(candidates) => {
                candidates.into_iter().next().map(|c| c.generated_text)
            }
            TextGenerationResponse::One(candidate) => Some(candidate.generated_text),
        }
    }
}

/// Hugging Face inference client
pub struct HfInferenceClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
    models: ModelConfig,
}

impl HfInferenceClient {
    pub fn new(
        inference: &InferenceConfig,
        models: &ModelConfig,
        api_token: String,
    ) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(inference.timeout_secs))
            .build()
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: inference.base_url.trim_end_matches('/').to_string(),
            api_token,
            models: models.clone(),
        })
    }

    /// Build from validated configuration and an already-resolved token
    pub fn from_config(config: &BardConfig, api_token: String) -> Result<Self, ProviderError> {
        Self::new(&config.inference, &config.models, api_token)
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        model: &str,
        body: &T,
    ) -> Result<reqwest::Response, ProviderError> {
        tracing::debug!(model = model, "Calling inference API");

        let response = self
            .http_client
            .post(self.model_url(model))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        tracing::warn!(model = model, status = status.as_u16(), "Inference API error");
        Err(ProviderError::new(classify_status(status.as_u16()), error_text))
    }

    async fn fetch_audio(&self, model: &str, text: &str) -> Result<EncodedAudio, ProviderError> {
        let response = self.post(model, &AudioRequest { inputs: text }).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ProviderError::empty(format!("{} returned no audio", model)));
        }
        Ok(EncodedAudio::new(bytes))
    }
}

/// Map a non-success HTTP status to a provider error kind
pub fn classify_status(status: u16) -> ProviderErrorKind {
    match status {
        401 | 403 => ProviderErrorKind::Authentication,
        404 => ProviderErrorKind::ModelAccess,
        429 => ProviderErrorKind::RateLimited,
        other => ProviderErrorKind::Api(other),
    }
}

#[async_trait]
impl LyricsProvider for HfInferenceClient {
    async fn generate_lyrics(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let model = self.models.lyrics.as_str();
        let request = TextGenerationRequest {
            inputs: format!("{}{}", THINK_PREFIX, prompt),
            parameters: TextGenerationParameters {
                max_new_tokens: params.max_length,
                temperature: params.temperature,
                return_full_text: false,
                do_sample: true,
                top_p: params.top_p,
                repetition_penalty: params.repetition_penalty,
            },
        };

        let response = self.post(model, &request).await?;
        let parsed: TextGenerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::InvalidResponse, e.to_string()))?;

        let text = parsed
            .into_text()
            .ok_or_else(|| ProviderError::empty("no generated text in response"))?;

        tracing::info!(model = model, chars = text.len(), "Lyrics text generated");
        Ok(text)
    }
}

#[async_trait]
impl VocalsProvider for HfInferenceClient {
    async fn synthesize_line(&self, line: &str) -> Result<EncodedAudio, ProviderError> {
        self.fetch_audio(&self.models.vocals, line).await
    }
}

#[async_trait]
impl MusicProvider for HfInferenceClient {
    async fn generate_music(&self, prompt: &str) -> Result<EncodedAudio, ProviderError> {
        let audio = self.fetch_audio(&self.models.music, prompt).await?;
        tracing::info!(model = %self.models.music, bytes = audio.len(), "Music generated");
        Ok(audio)
    }
}
