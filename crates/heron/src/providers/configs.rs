use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl OpenAiProviderConfig {
    pub fn new<H, K, M>(host: H, api_key: K, model: M) -> Self
    where
        H: Into<String>,
        K: Into<String>,
        M: Into<String>,
    {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Read the configuration from OPENAI_API_KEY, OPENAI_HOST and
    /// OPENAI_MODEL, with defaults for the latter two.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable is not set")?;
        let host =
            env::var("OPENAI_HOST").unwrap_or_else(|_| "https://api.openai.com".to_string());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        Ok(Self::new(host, api_key, model))
    }
}
