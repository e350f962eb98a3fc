use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{ProviderReply, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "http://api.weatherstack.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the WeatherStack `current` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherStackProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug)]
pub struct WeatherStackBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl WeatherStackBuilder {
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<WeatherStackProvider> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client for WeatherStack")?;

        Ok(WeatherStackProvider {
            api_key: self.api_key,
            base_url: self.base_url,
            http,
        })
    }
}

impl WeatherStackProvider {
    pub fn builder(api_key: String) -> WeatherStackBuilder {
        WeatherStackBuilder {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    async fn fetch_current(&self, query: &str) -> Result<ProviderReply> {
        let url = format!("{}/current", self.base_url);

        tracing::debug!(%query, "querying WeatherStack current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[("access_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await
            .context("Failed to send request to WeatherStack (current)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read WeatherStack current response body")?;

        let parsed: Value = serde_json::from_str(&body).with_context(|| {
            format!(
                "Failed to parse WeatherStack response with status {}: {}",
                status,
                truncate_body(&body),
            )
        })?;

        Ok(ProviderReply::new(status, parsed))
    }
}

#[async_trait]
impl WeatherProvider for WeatherStackProvider {
    async fn current_conditions(&self, query: &str) -> Result<ProviderReply> {
        self.fetch_current(query).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
