//! Text-analysis client for an OpenAI-compatible chat-completions endpoint.
//!
//! Provides topic summarization, analysis, keyword extraction, and free-form
//! Q&A over resolved topic text. These are independent request/response
//! operations against an external service; nothing in the indexing or search
//! path ever waits on them. Failures surface as [`Error::AiService`] with
//! the upstream message unmodified.
//!
//! Retry strategy: HTTP 429 and 5xx and network errors retry with
//! exponential backoff (1s, 2s, 4s, ... capped at 32s); other 4xx fail
//! immediately.

use std::time::Duration;

use crate::config::AiConfig;
use crate::error::{Error, Result};

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const MAX_COMPLETION_TOKENS: u32 = 800;

pub struct AiClient {
    config: AiConfig,
    client: reqwest::Client,
}

impl AiClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::AiService(e.to_string()))?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Academic summary of at most 200 characters.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        self.chat(
            "你是一个严谨的学术文献助理",
            format!("请对下面内容做不超过200字的学术摘要：\n{}", text),
            0.3,
        )
        .await
    }

    /// Analysis along research theme, core viewpoints, and conclusions.
    pub async fn analyze(&self, text: &str) -> Result<String> {
        self.chat(
            "你是科研助理，擅长文献分析",
            format!(
                "请从【研究主题】【核心观点】【结论】三个方面分析下面内容：\n{}",
                text
            ),
            0.3,
        )
        .await
    }

    /// The 5–8 most important keywords, 顿号-separated.
    pub async fn keywords(&self, text: &str) -> Result<String> {
        self.chat(
            "你是信息抽取助手",
            format!("请提取下面内容中最重要的5-8个关键词，用顿号分隔：\n{}", text),
            0.2,
        )
        .await
    }

    /// Answer a question against supplied context (flattened topic text).
    pub async fn ask(&self, question: &str, context: &str) -> Result<String> {
        self.chat(
            "你是一个严谨的学术文献助理",
            format!(
                "请根据以下资料回答问题。\n资料：\n{}\n\n问题：{}",
                context, question
            ),
            0.3,
        )
        .await
    }

    async fn chat(&self, system: &str, user: String, temperature: f32) -> Result<String> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::AiService(format!("{} environment variable not set", API_KEY_ENV)))?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": temperature,
            "max_tokens": MAX_COMPLETION_TOKENS,
        });

        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&self.config.api_url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response
                            .json()
                            .await
                            .map_err(|e| Error::AiService(e.to_string()))?;
                        return extract_answer(&json);
                    }

                    // Rate limited or server error — retry.
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(Error::AiService(format!("{}: {}", status, body_text)));
                        continue;
                    }

                    // Client error (not 429) — don't retry.
                    let body_text = response.text().await.unwrap_or_default();
                    return Err(Error::AiService(format!("{}: {}", status, body_text)));
                }
                Err(e) => {
                    last_err = Some(Error::AiService(e.to_string()));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::AiService("request failed after retries".into())))
    }
}

fn extract_answer(json: &serde_json::Value) -> Result<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::AiService("malformed chat-completions response".into()))
}
