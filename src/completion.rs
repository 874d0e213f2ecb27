use crate::conversation::Turn;
use crate::error::{Error, Result};
use crate::request::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, info};

/// Default chat completions endpoint
pub const COMPLETIONS_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Environment variable consulted for the API key by default
pub const DEFAULT_CREDENTIAL_VAR: &str = "OPENAI_API_KEY";

/// Anything that can turn a conversation into an assistant reply
///
/// The conversation manager only depends on this trait, so tests and
/// alternative providers can stand in for the HTTP client.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send the whole conversation and return the reply text
    async fn complete(&self, messages: &[Turn], max_tokens: u32) -> Result<String>;
}

/// Where the bearer credential comes from
///
/// The credential is resolved on every request, never at startup, so a missing
/// key only shows up as a failed send.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read the named environment variable at send time
    Env(String),
    /// A key supplied directly
    Static(String),
}

impl Default for CredentialSource {
    fn default() -> Self {
        CredentialSource::Env(DEFAULT_CREDENTIAL_VAR.to_string())
    }
}

impl CredentialSource {
    /// Resolve the credential now
    ///
    /// # Errors
    ///
    /// [`Error::MissingCredential`] when the variable is unset or blank, or the
    /// static key is blank.
    pub fn resolve(&self) -> Result<String> {
        let (value, name) = match self {
            CredentialSource::Env(var) => (std::env::var(var).ok(), var.as_str()),
            CredentialSource::Static(key) => (Some(key.clone()), "the configured API key"),
        };
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::MissingCredential(name.to_string()))
    }
}

/// HTTP client for an OpenAI-compatible chat completions API
///
/// # Example
///
/// ```rust
/// use routine_builder::{CredentialSource, OpenAiClient};
///
/// let client = OpenAiClient::new(CredentialSource::Static("sk-test".to_string()))
///     .with_model("gpt-4o-mini")
///     .with_endpoint("http://localhost:8080/v1/chat/completions");
///
/// assert_eq!(client.model(), "gpt-4o-mini");
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    credential: CredentialSource,
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(credential: CredentialSource) -> Self {
        Self {
            credential,
            client: reqwest::Client::new(),
            endpoint: COMPLETIONS_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post a completion request and parse the response
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredential`] - If no API key is available
    /// - [`Error::Header`] - If the key cannot be used as a header value
    /// - [`Error::Request`] - If the HTTP request fails
    /// - [`Error::Response`] - If the API returns a non-success status code
    /// - [`Error::Parse`] - If the response body can't be parsed
    pub async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let api_key = self.credential.resolve()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| Error::Header("Failed to create authorization header".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!(
            model = %request.model,
            turns = request.messages.len(),
            max_tokens = request.max_tokens,
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error_json) = serde_json::from_str::<Value>(&text) {
                if let Some(error_msg) = error_json
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                {
                    return Err(Error::Response(
                        error_msg.to_string(),
                        Some(status.as_u16()),
                    ));
                }
            }

            return Err(Error::Response(text, Some(status.as_u16())));
        }

        let response_text = response.text().await?;
        let completion: CompletionResponse = serde_json::from_str(&response_text)?;

        if let Some(usage) = &completion.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion received"
            );
        }

        Ok(completion)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, messages: &[Turn], max_tokens: u32) -> Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            max_tokens,
        };
        let response = self.send(&request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| Error::Response("response contained no choices".to_string(), None))
    }
}
