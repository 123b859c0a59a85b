//! Chat Completions session
//!
//! The endpoint is stateless, so the session keeps the transcript locally
//! and replays it on every request.

use super::types::{
    ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse, ChatCompletionTool,
    convert_response,
};
use arkcutt_application::ports::llm_gateway::{GatewayError, LlmSession, ToolResultMessage};
use arkcutt_domain::{LlmResponse, Message, Model};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared connection settings for every session of one gateway
#[derive(Debug)]
pub(crate) struct Endpoint {
    pub client: reqwest::Client,
    pub completions_url: String,
    pub api_key: Option<String>,
    pub parallel_tool_calls: bool,
}

impl Endpoint {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<LlmResponse, GatewayError> {
        debug!(
            url = %self.completions_url,
            model = %request.model,
            messages = request.messages.len(),
            "Calling chat completions"
        );

        let mut builder = self.client.post(&self.completions_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("Cannot read response: {e}")))?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => GatewayError::ConnectionError(format!(
                    "HTTP {status}: check the API key ({body})"
                )),
                404 => GatewayError::ModelNotAvailable(format!("{} ({body})", request.model)),
                _ => GatewayError::RequestFailed(format!("HTTP {status}: {body}")),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::RequestFailed(format!("JSON parse error: {e}. Raw: {body}"))
        })?;
        convert_response(parsed)
    }
}

pub struct OpenAiSession {
    endpoint: Arc<Endpoint>,
    model: Model,
    system_prompt: String,
    transcript: Mutex<Vec<ChatCompletionMessage>>,
    /// Tools of the last `send_with_tools`, reused for tool-result follow-ups
    tools: Mutex<Vec<ChatCompletionTool>>,
}

impl OpenAiSession {
    pub(crate) fn new(endpoint: Arc<Endpoint>, model: Model, system_prompt: String) -> Self {
        Self {
            endpoint,
            model,
            system_prompt,
            transcript: Mutex::new(Vec::new()),
            tools: Mutex::new(Vec::new()),
        }
    }

    async fn exchange(
        &self,
        transcript: &mut Vec<ChatCompletionMessage>,
    ) -> Result<LlmResponse, GatewayError> {
        let tools = self.tools.lock().await.clone();
        let request = ChatCompletionRequest {
            model: self.model.to_string(),
            messages: transcript.clone(),
            parallel_tool_calls: (!tools.is_empty()).then_some(self.endpoint.parallel_tool_calls),
            tools: (!tools.is_empty()).then_some(tools),
        };

        let response = self.endpoint.complete(&request).await?;
        transcript.push(ChatCompletionMessage::assistant(&response));
        Ok(response)
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send_with_tools(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        let wire_tools = tools
            .iter()
            .map(ChatCompletionTool::from_schema)
            .collect::<Result<Vec<_>, _>>()?;
        *self.tools.lock().await = wire_tools;

        let mut transcript = self.transcript.lock().await;
        transcript.clear();
        if !self.system_prompt.is_empty() {
            transcript.push(ChatCompletionMessage::system(&self.system_prompt));
        }
        transcript.extend(messages.iter().map(ChatCompletionMessage::from));

        self.exchange(&mut transcript).await
    }

    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError> {
        let mut transcript = self.transcript.lock().await;
        if transcript.is_empty() {
            return Err(GatewayError::SessionError(
                "tool results sent before any request".to_string(),
            ));
        }
        transcript.extend(results.iter().map(ChatCompletionMessage::tool_result));

        self.exchange(&mut transcript).await
    }
}
