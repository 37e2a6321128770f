// Classification client: one request per document, answer checked against the categories

use crate::categories::CategoryRegistry;
use crate::classify::prompt::ClassificationPrompt;
use crate::config::{ClassificationConfig, LLMConfig};
use crate::llm::provider::LLMAdapter;
use crate::models::{ClassificationResult, Resolution};
use crate::types::{AppError, AppResult, LLMRequest};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ClassificationClient {
    llm: Arc<dyn LLMAdapter>,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
    stream: bool,
}

impl ClassificationClient {
    pub fn new(llm: Arc<dyn LLMAdapter>, config: &LLMConfig) -> Self {
        Self {
            llm,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            stream: config.stream,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the model's raw answer, trimmed
    pub async fn classify(&self, prompt: &ClassificationPrompt) -> AppResult<String> {
        let mut request = LLMRequest::single_turn(&self.model, &prompt.text);
        request.max_tokens = Some(self.max_tokens);
        request.temperature = self.temperature;

        let answer = if self.stream {
            let mut stream = self.llm.create_chat_completion_stream(&request).await?;
            let mut answer = String::new();
            while let Some(piece) = stream.next().await {
                answer.push_str(&piece?);
            }
            answer
        } else {
            let response = self.llm.create_chat_completion(&request).await?;
            if let Some(usage) = &response.usage {
                debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "Completion usage"
                );
            }
            response.content
        };

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(AppError::classification("model returned an empty answer"));
        }
        Ok(answer.to_string())
    }
}

/// Map a raw answer onto the registry, applying the fallback policy
pub fn interpret(
    answer: &str,
    registry: &CategoryRegistry,
    policy: &ClassificationConfig,
) -> ClassificationResult {
    if let Some(category) = registry.resolve(answer) {
        return ClassificationResult {
            category: category.name.clone(),
            raw_answer: answer.to_string(),
            resolution: Resolution::Matched,
        };
    }

    if policy.accept_unlisted {
        warn!(answer, "Answer matches no category, reporting as-is");
        return ClassificationResult {
            category: answer.to_string(),
            raw_answer: answer.to_string(),
            resolution: Resolution::Unlisted,
        };
    }

    warn!(
        answer,
        fallback = %policy.fallback_category,
        "Invalid category, using fallback"
    );
    ClassificationResult {
        category: policy.fallback_category.clone(),
        raw_answer: answer.to_string(),
        resolution: Resolution::Fallback,
    }
}
