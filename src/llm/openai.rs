// OpenAI-compatible chat completion adapter
// Works with any server exposing POST {base}/chat/completions: local runtimes
// (osaurus, llama.cpp, Ollama, LM Studio) as well as hosted APIs.

use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse, TokenUsage};
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs, FinishReason,
};
use async_openai::Client;
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use futures::stream::{BoxStream, StreamExt};
use std::time::Duration;
use tracing::debug;

pub struct OpenAICompatAdapter {
    client: Client<OpenAIConfig>,
    base_url: String,
}

impl OpenAICompatAdapter {
    pub fn new(base_url: &str, api_key: Option<&str>, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        // Never fall back to OPENAI_API_KEY from the environment
        let config = OpenAIConfig::new()
            .with_api_base(base_url.clone())
            .with_api_key(api_key.unwrap_or_default());

        let client = Client::with_config(config)
            .with_http_client(http_client)
            .with_backoff(single_attempt());

        Ok(Self { client, base_url })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, request: &LLMRequest, stream: bool) -> AppResult<CreateChatCompletionRequest> {
        let messages = request
            .messages
            .iter()
            .map(to_request_message)
            .collect::<Vec<_>>();

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(request.model.as_str()).messages(messages).stream(stream);
        if let Some(max_tokens) = request.max_tokens {
            // Local servers understand max_tokens, not max_completion_tokens
            #[allow(deprecated)]
            args.max_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }

        args.build()
            .map_err(|e| AppError::classification(format!("invalid completion request: {}", e)))
    }
}

// One request per document: no retries on 5xx or 429
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

fn to_request_message(message: &LLMMessage) -> ChatCompletionRequestMessage {
    let content = message.content.as_str();
    match message.role.as_str() {
        "system" => ChatCompletionRequestSystemMessage::from(content).into(),
        "assistant" => ChatCompletionRequestAssistantMessage::from(content).into(),
        _ => ChatCompletionRequestUserMessage::from(content).into(),
    }
}

fn finish_reason_name(reason: FinishReason) -> &'static str {
    match reason {
        FinishReason::Stop => "stop",
        FinishReason::Length => "length",
        FinishReason::ToolCalls => "tool_calls",
        FinishReason::ContentFilter => "content_filter",
        FinishReason::FunctionCall => "function_call",
    }
}

#[async_trait]
impl LLMAdapter for OpenAICompatAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let body = self.build_request(request, false)?;
        debug!(url = %self.completions_url(), model = %request.model, "Sending completion request");

        let response = self.client.chat().create(body).await?;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::classification("response contained no choices"))?;

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason.map(|r| finish_reason_name(r).to_string()),
            usage,
        })
    }

    async fn create_chat_completion_stream(
        &self,
        request: &LLMRequest,
    ) -> AppResult<BoxStream<'static, AppResult<String>>> {
        let body = self.build_request(request, true)?;
        debug!(url = %self.completions_url(), model = %request.model, "Sending streaming completion request");

        let stream = self.client.chat().create_stream(body).await?;

        // Role-only and empty chunks carry no text
        let deltas = stream.filter_map(|chunk| async move {
            match chunk {
                Ok(chunk) => chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .filter(|text| !text.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(AppError::from(e))),
            }
        });

        Ok(deltas.boxed())
    }
}
