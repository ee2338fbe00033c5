//! 文本生成模型客户端
//!
//! `OpenAiClient` 对接 OpenAI 兼容的 chat completions 接口。
//! 网络瞬时故障（连接失败、超时）最多重试 `max_retries` 次，其余失败直接返回。

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AiGradingConfig;
use crate::errors::{ClassroomError, Result};

/// 一次补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 文本生成模型
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// 返回模型回复的原始文本，空回复视为上游失败
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl OpenAiClient {
    pub fn new(config: &AiGradingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassroomError::upstream(format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_once(&self, body: &ChatRequest<'_>) -> std::result::Result<String, SendError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(SendError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SendError::Fatal(ClassroomError::upstream(format!(
                "模型接口返回 {status}: {text}"
            ))));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            SendError::Fatal(ClassroomError::upstream(format!("模型响应解码失败: {e}")))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| SendError::Fatal(ClassroomError::upstream("模型返回了空内容")))
    }
}

/// 单次发送的失败，区分可重试与不可重试
enum SendError {
    Transient(ClassroomError),
    Fatal(ClassroomError),
}

impl SendError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            SendError::Transient(err.into())
        } else {
            SendError::Fatal(err.into())
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut attempt = 0;
        loop {
            match self.send_once(&body).await {
                Ok(content) => return Ok(content),
                Err(SendError::Transient(err)) if attempt < self.max_retries => {
                    attempt += 1;
                    debug!("模型请求瞬时失败，第 {} 次重试: {}", attempt, err);
                }
                Err(SendError::Transient(err)) | Err(SendError::Fatal(err)) => {
                    warn!("模型请求失败: {}", err);
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn config(api_base: &str) -> AiGradingConfig {
        AiGradingConfig {
            api_base: api_base.to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 1,
            max_retries: 1,
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OpenAiClient::new(&config("https://api.openai.com/v1/")).unwrap();
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4",
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: "sys".to_string(),
            }],
            temperature: 0.5,
            max_tokens: 10,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 10);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_upstream_failure() {
        // 端口 1 上没有服务，连接失败后重试一次仍失败
        let client = OpenAiClient::new(&config("http://127.0.0.1:1/v1")).unwrap();

        let err = client.complete(&sample_request()).await.unwrap_err();
        assert!(matches!(err, ClassroomError::Upstream(_)));
    }

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4".to_string(),
            system: "sys".to_string(),
            user: "hi".to_string(),
            temperature: 0.7,
            max_tokens: 10,
        }
    }

    /// 读完一个请求（头部 + Content-Length 指定的请求体）
    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + body_len {
                    return;
                }
            }
        }
    }

    /// 本地 HTTP 服务，统计建立的连接数；`response` 为 None 时收下请求后不作答
    async fn serve(response: Option<String>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));

        let counter = connections.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let response = response.clone();
                tokio::spawn(async move {
                    read_request(&mut stream).await;
                    match response {
                        Some(response) => {
                            let _ = stream.write_all(response.as_bytes()).await;
                            let _ = stream.shutdown().await;
                        }
                        None => tokio::time::sleep(Duration::from_secs(30)).await,
                    }
                });
            }
        });

        (format!("http://{addr}/v1"), connections)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn test_timeout_is_retried_once() {
        let (base, connections) = serve(None).await;
        let client = OpenAiClient::new(&config(&base)).unwrap();

        let err = client.complete(&sample_request()).await.unwrap_err();

        assert!(matches!(err, ClassroomError::Upstream(_)));
        assert_eq!(connections.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_status_is_not_retried() {
        let (base, connections) = serve(Some(http_response(
            "500 Internal Server Error",
            r#"{"error":"boom"}"#,
        )))
        .await;
        let client = OpenAiClient::new(&config(&base)).unwrap();

        let err = client.complete(&sample_request()).await.unwrap_err();

        assert!(matches!(err, ClassroomError::Upstream(_)));
        assert!(err.message().contains("500"));
        assert_eq!(connections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_content_is_upstream_failure() {
        let (base, connections) = serve(Some(http_response(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"  "}}]}"#,
        )))
        .await;
        let client = OpenAiClient::new(&config(&base)).unwrap();

        let err = client.complete(&sample_request()).await.unwrap_err();

        assert!(matches!(err, ClassroomError::Upstream(_)));
        assert_eq!(connections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_reply_returns_content() {
        let (base, connections) = serve(Some(http_response(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"score\": 9, \"feedback\": \"ok\"}"}}]}"#,
        )))
        .await;
        let client = OpenAiClient::new(&config(&base)).unwrap();

        let content = client.complete(&sample_request()).await.unwrap();

        assert_eq!(content, r#"{"score": 9, "feedback": "ok"}"#);
        assert_eq!(connections.load(Ordering::SeqCst), 1);
    }
}
