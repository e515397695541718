use crate::openai::config::OpenAiConfig;
use kk_core::llm::{ChatError, ChatOpts, ChatResult, Message, ModelClient, Role};
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::{error, info};

#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    cfg: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(cfg: OpenAiConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key))?,
        );
        let mut builder = Client::builder()
            .default_headers(headers)
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(cfg.timeout);
        if let Some(p) = &cfg.proxy {
            builder = builder.proxy(reqwest::Proxy::all(p)?);
        }
        let http = builder.build()?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        )
    }
}

impl ModelClient for OpenAiClient {
    async fn send_chat(&self, msgs: &[Message], opts: &ChatOpts) -> Result<ChatResult, ChatError> {
        let url = self.endpoint();
        info!(target: "providers::openai", "chat request model={} url={}", opts.model, url);
        let body = request_body(msgs, opts);
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.ok();
            error!(target: "providers::openai", "chat non-200 status={} body={:?}", status, body);
            return Err(map_status_err(status, body));
        }
        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;
        parse_chat_completion(&v)
    }
}

fn map_messages(msgs: &[Message]) -> Vec<serde_json::Value> {
    msgs.iter()
        .map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => "system",
            };
            serde_json::json!({"role": role, "content": m.content})
        })
        .collect()
}

fn request_body(msgs: &[Message], opts: &ChatOpts) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": opts.model,
        "messages": map_messages(msgs),
        "stream": false,
    });
    if let Some(map) = body.as_object_mut() {
        if let Some(t) = opts.temperature {
            map.insert("temperature".into(), serde_json::json!(t));
        }
        if let Some(p) = opts.top_p {
            map.insert("top_p".into(), serde_json::json!(p));
        }
        if let Some(m) = opts.max_tokens {
            map.insert("max_tokens".into(), serde_json::json!(m));
        }
    }
    body
}

fn parse_chat_completion(v: &serde_json::Value) -> Result<ChatResult, ChatError> {
    let choice = &v["choices"][0];
    let Some(text) = choice["message"]["content"].as_str() else {
        return Err(ChatError::Protocol("unexpected response format".into()));
    };
    let tokens = |key: &str| v["usage"][key].as_u64().and_then(|n| u32::try_from(n).ok());
    Ok(ChatResult {
        text: text.to_string(),
        finish_reason: choice["finish_reason"].as_str().map(str::to_string),
        prompt_tokens: tokens("prompt_tokens"),
        completion_tokens: tokens("completion_tokens"),
    })
}

fn map_reqwest_err(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout(e.to_string())
    } else if e.is_request() || e.is_connect() {
        ChatError::Network(e.to_string())
    } else {
        ChatError::Other(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: Option<String>) -> ChatError {
    let s = format!("{} {}", status.as_u16(), body.unwrap_or_default());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::Auth(s),
        StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimit(s),
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => ChatError::Network(s),
        StatusCode::NOT_FOUND => ChatError::Protocol(s),
        _ => ChatError::Other(s),
    }
}
