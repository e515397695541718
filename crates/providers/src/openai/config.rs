use kk_core::{config::FileConfig, llm::ChatOpts};
use std::{env, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 100;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub proxy: Option<String>,
}

impl OpenAiConfig {
    pub fn from_env_and_file(file: &FileConfig) -> anyhow::Result<Self> {
        let proxy = env::var("HTTPS_PROXY")
            .ok()
            .or_else(|| env::var("HTTP_PROXY").ok());
        Self::from_parts(
            env::var("OPENAI_API_KEY").ok(),
            env::var("OPENAI_BASE_URL").ok(),
            proxy,
            file,
        )
    }

    pub fn from_parts(
        api_key: Option<String>,
        base_url: Option<String>,
        proxy: Option<String>,
        file: &FileConfig,
    ) -> anyhow::Result<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAiConfig {
            api_key,
            base_url,
            model: file
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: file.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: file.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: Duration::from_millis(file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            proxy,
        })
    }

    pub fn chat_opts(&self) -> ChatOpts {
        ChatOpts {
            model: self.model.clone(),
            temperature: Some(self.temperature),
            top_p: None,
            max_tokens: Some(self.max_tokens),
        }
    }
}
