use crate::config::LLMConfig;
use crate::types::{AppResult, LLMRequest, LLMResponse};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;

    /// Stream of content deltas, in arrival order
    async fn create_chat_completion_stream(
        &self,
        request: &LLMRequest,
    ) -> AppResult<BoxStream<'static, AppResult<String>>>;
}

/// Build the adapter for the configured completion endpoint
pub fn adapter_for(config: &LLMConfig) -> AppResult<Arc<dyn LLMAdapter>> {
    let adapter = crate::llm::openai::OpenAICompatAdapter::new(
        &config.base_url,
        config.api_key.as_deref(),
        config.timeout,
    )?;
    Ok(Arc::new(adapter))
}
