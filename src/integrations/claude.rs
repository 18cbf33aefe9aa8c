use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::AiConfig;
use crate::errors::{AcademiqError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// 模型返回的文本
#[derive(Debug, Clone)]
pub struct Completion {
    pub model: String,
    pub text: String,
}

/// Anthropic Messages API 客户端
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeClient {
    /// 未配置 api_key 时返回 None
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>> {
        if config.api_key.is_empty() {
            return Ok(None);
        }
        Self::new(
            &config.api_key,
            &config.api_base,
            &config.model,
            config.max_tokens,
            config.timeout_secs,
        )
        .map(Some)
    }

    pub fn new(
        api_key: &str,
        api_base: &str,
        model: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AcademiqError::ai_service(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            max_tokens,
        })
    }

    /// 单轮对话：system 提示 + 用户消息
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<Completion> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Sending prompt to {} ({} chars)", self.model, prompt.len());

        let response = self
            .http
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AcademiqError::ai_service(format!("AI request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AcademiqError::ai_service(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(r) => format!("{}: {}", r.error.kind, r.error.message),
                Err(_) => body,
            };
            error!("AI service returned {}: {}", status, message);
            return Err(AcademiqError::ai_service(format!(
                "AI service error {}: {}",
                status.as_u16(),
                message
            )));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| AcademiqError::ai_service(format!("Unexpected AI response: {e}")))?;

        let text = parsed
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .map(|b| b.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(AcademiqError::ai_service("AI response contained no text"));
        }

        Ok(Completion {
            model: parsed.model,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> ClaudeClient {
        ClaudeClient::new("test-key", base, "claude-test", 256, 5).unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_text_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(json!({"model": "claude-test", "max_tokens": 256})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "model": "claude-test",
                "content": [
                    {"type": "text", "text": "El alumno va bien."},
                    {"type": "text", "text": "Reforzar matemáticas."}
                ],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server.uri())
            .complete("Eres un asistente escolar.", "¿Cómo va Ana?")
            .await
            .unwrap();
        assert_eq!(answer.model, "claude-test");
        assert_eq!(answer.text, "El alumno va bien.\nReforzar matemáticas.");
    }

    #[tokio::test]
    async fn test_complete_maps_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "type": "error",
                "error": {"type": "rate_limit_error", "message": "Too many requests"}
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .complete("system", "hola")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");
        assert!(err.message().contains("rate_limit_error"));
    }

    #[test]
    fn test_unconfigured_client_is_none() {
        let config = AiConfig::default();
        assert!(ClaudeClient::from_config(&config).unwrap().is_none());
    }
}
