// Type definitions and error kinds

use async_openai::error::OpenAIError;
use std::path::Path;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LLMRequest {
    /// Single-turn request carrying one user message
    pub fn single_turn(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: None,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Error kinds surfaced to the console.
///
/// `Config` is fatal at startup; the other two are reported per file and the
/// watcher keeps running.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("ConfigError: {0}")]
    Config(String),

    #[error("ExtractionError: {0}")]
    Extraction(String),

    #[error("ClassificationError: {0}")]
    Classification(String),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        AppError::Extraction(message.into())
    }

    pub fn classification(message: impl Into<String>) -> Self {
        AppError::Classification(message.into())
    }

    /// Config error that names the offending path
    pub fn config_at(path: &Path, message: impl std::fmt::Display) -> Self {
        AppError::Config(format!("{}: {}", path.display(), message))
    }

    /// Short name of the error kind, as printed on report lines
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "ConfigError",
            AppError::Extraction(_) => "ExtractionError",
            AppError::Classification(_) => "ClassificationError",
        }
    }

    /// The message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            AppError::Config(m) | AppError::Extraction(m) | AppError::Classification(m) => m,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Classification(format!("request timed out: {}", e))
        } else if e.is_connect() {
            AppError::Classification(format!("endpoint unreachable: {}", e))
        } else {
            AppError::Classification(format!("request failed: {}", e))
        }
    }
}

impl From<OpenAIError> for AppError {
    fn from(e: OpenAIError) -> Self {
        match e {
            OpenAIError::Reqwest(e) => AppError::from(e),
            OpenAIError::ApiError(api) => {
                AppError::classification(format!("endpoint returned an error: {}", api))
            }
            OpenAIError::JSONDeserialize(e, _) => {
                AppError::classification(format!("malformed response: {}", e))
            }
            OpenAIError::StreamError(e) => {
                AppError::classification(format!("stream failed: {}", e))
            }
            other => AppError::classification(other.to_string()),
        }
    }
}

impl From<lopdf::Error> for AppError {
    fn from(e: lopdf::Error) -> Self {
        AppError::Extraction(format!("not a readable PDF: {}", e))
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_kind() {
        let err = AppError::classification("endpoint unreachable");
        assert_eq!(err.to_string(), "ClassificationError: endpoint unreachable");
        assert_eq!(err.kind(), "ClassificationError");
        assert_eq!(err.message(), "endpoint unreachable");
    }

    #[test]
    fn test_config_at_names_path() {
        let err = AppError::config_at(Path::new("/tmp/missing"), "watch folder does not exist");
        assert!(err.to_string().starts_with("ConfigError: /tmp/missing"));
    }

    #[test]
    fn test_single_turn_request() {
        let request = LLMRequest::single_turn("foundation", "hello");
        assert_eq!(request.messages, vec![LLMMessage::user("hello")]);
        assert_eq!(request.model, "foundation");
    }
}
