use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::{fmt::Debug, sync::Arc};

use crate::{Config, provider::weatherstack::WeatherStackProvider};

pub mod weatherstack;

/// Message used when the provider rejects a query without explaining why.
pub const REJECTION_FALLBACK: &str = "Failed to fetch weather data.";

/// A provider answer that made it back over the wire, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: StatusCode,
    pub body: Value,
}

impl ProviderReply {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// Shorthand for a `200 OK` reply.
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// The provider's explanation if this reply is a logical rejection.
    ///
    /// A reply is rejected when the HTTP status is not a success, when the
    /// payload carries an `error` field, or when it reports
    /// `"success": false`.
    pub fn rejection(&self) -> Option<String> {
        let error = self.body.get("error").filter(|e| !e.is_null());
        let flagged_failure = self.body.get("success") == Some(&Value::Bool(false));

        if error.is_none() && !flagged_failure && self.status.is_success() {
            return None;
        }

        let message = error
            .and_then(|e| e.get("info").and_then(Value::as_str).or_else(|| e.as_str()))
            .filter(|m| !m.is_empty())
            .unwrap_or(REJECTION_FALLBACK);

        Some(message.to_string())
    }

    /// The `current` sub-payload, or an empty object when absent.
    pub fn current_conditions(&self) -> Value {
        self.body
            .get("current")
            .filter(|c| !c.is_null())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

/// Source of current weather conditions for a free-text location.
///
/// `Err` is reserved for transport-level failures (connect, timeout,
/// unreadable body). A reply that arrived is always `Ok`, even when the
/// provider refused the query; callers inspect [`ProviderReply::rejection`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, query: &str) -> anyhow::Result<ProviderReply>;
}

/// Build the WeatherStack client described by `config`.
///
/// Fails when no access key is available, which keeps the server from
/// starting without one.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = WeatherStackProvider::builder(api_key)
        .base_url(&config.provider.base_url)
        .timeout(config.provider.timeout())
        .build()?;

    Ok(Arc::new(provider))
}
