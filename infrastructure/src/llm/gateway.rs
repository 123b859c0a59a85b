//! Gateway for OpenAI-compatible chat completion endpoints

use super::session::{Endpoint, OpenAiSession};
use crate::config::FileModelConfig;
use crate::services::http::join_url;
use arkcutt_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use arkcutt_domain::Model;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct OpenAiGateway {
    endpoint: Arc<Endpoint>,
}

impl OpenAiGateway {
    /// Build a gateway from the `[model]` section.
    ///
    /// A missing API key is only a warning: local OpenAI-compatible
    /// servers often run without one.
    pub fn from_config(config: &FileModelConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!(env = %config.api_key_env, "No API key found for the chat model");
        }
        Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let completions_url = join_url(base_url, "chat/completions");
        info!(url = %completions_url, "Chat model gateway initialized");
        Ok(Self {
            endpoint: Arc::new(Endpoint {
                client,
                completions_url,
                api_key,
                parallel_tool_calls: true,
            }),
        })
    }

    /// Let the model request several tools in one response.
    pub fn with_parallel_tool_calls(mut self, enabled: bool) -> Self {
        if let Some(endpoint) = Arc::get_mut(&mut self.endpoint) {
            endpoint.parallel_tool_calls = enabled;
        }
        self
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession::new(
            self.endpoint.clone(),
            model.clone(),
            system_prompt.to_string(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkcutt_application::ports::llm_gateway::ToolResultMessage;
    use arkcutt_domain::{Message, StopReason};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> OpenAiGateway {
        OpenAiGateway::new(
            &format!("{}/v1", server.uri()),
            Some("sk-test".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn delivery_schema() -> serde_json::Value {
        json!({
            "name": "getDeliveryInfo",
            "description": "Delivery options",
            "input_schema": {"type": "object", "properties": {}, "required": []}
        })
    }

    #[tokio::test]
    async fn test_text_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "You quote laser cuts."},
                    {"role": "user", "content": "hola"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "finish_reason": "stop",
                    "message": {"role": "assistant", "content": "¡Hola! ¿En qué te ayudo?"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = gateway(&server)
            .create_session_with_system_prompt(&Model::default(), "You quote laser cuts.")
            .await
            .unwrap();
        let response = session
            .send_with_tools(&[Message::user("hola")], &[])
            .await
            .unwrap();

        assert_eq!(response.text_content(), "¡Hola! ¿En qué te ayudo?");
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    }

    #[tokio::test]
    async fn test_tool_round_trip_replays_transcript() {
        let server = MockServer::start().await;

        // Follow-up request: carries the assistant tool call and the tool answer
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "messages": [
                    {"role": "user", "content": "¿Cuándo llega?"},
                    {"role": "assistant", "tool_calls": [{"id": "call_1"}]},
                    {"role": "tool", "tool_call_id": "call_1"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "finish_reason": "stop",
                    "message": {"role": "assistant", "content": "Llega en 5 días."}
                }]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "tools": [{"type": "function", "function": {"name": "getDeliveryInfo"}}],
                "parallel_tool_calls": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "finish_reason": "tool_calls",
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "getDeliveryInfo", "arguments": "{}"}
                        }]
                    }
                }]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let session = gateway(&server)
            .create_session_with_system_prompt(&Model::default(), "")
            .await
            .unwrap();

        let first = session
            .send_with_tools(&[Message::user("¿Cuándo llega?")], &[delivery_schema()])
            .await
            .unwrap();
        assert_eq!(first.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(first.tool_calls()[0].tool_name, "getDeliveryInfo");

        let second = session
            .send_tool_results(&[ToolResultMessage {
                tool_use_id: "call_1".to_string(),
                tool_name: "getDeliveryInfo".to_string(),
                output: r#"{"ok":true}"#.to_string(),
                is_error: false,
            }])
            .await
            .unwrap();
        assert_eq!(second.text_content(), "Llega en 5 días.");
    }

    #[tokio::test]
    async fn test_http_error_maps_to_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let session = gateway(&server)
            .create_session_with_system_prompt(&Model::default(), "")
            .await
            .unwrap();
        let err = session
            .send_with_tools(&[Message::user("hola")], &[])
            .await
            .unwrap_err();
        match err {
            GatewayError::RequestFailed(message) => assert!(message.contains("upstream down")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_tool_results_without_request() {
        let server = MockServer::start().await;
        let session = gateway(&server)
            .create_session_with_system_prompt(&Model::default(), "")
            .await
            .unwrap();
        let err = session.send_tool_results(&[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::SessionError(_)));
    }
}
