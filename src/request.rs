use crate::conversation::Turn;
use serde::{Deserialize, Serialize};

/// Request body for the chat completions endpoint
///
/// Carries the entire conversation to date; the API is stateless.
///
/// # Example
///
/// ```rust
/// use routine_builder::{CompletionRequest, Turn};
///
/// let request = CompletionRequest {
///     model: "gpt-4o".to_string(),
///     messages: vec![Turn::system("You are helpful."), Turn::user("Hi")],
///     max_tokens: 500,
/// };
///
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["messages"][1]["role"], "user");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier, e.g. "gpt-4o"
    pub model: String,
    /// Every turn of the conversation, system turn first
    pub messages: Vec<Turn>,
    /// Response budget for this call
    pub max_tokens: u32,
}

/// Successful response from the chat completions endpoint
///
/// Only the fields the client reads are modelled; everything else in the body
/// is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Content of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    pub content: String,
}

/// Token accounting reported by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
