// src/services/practicum.rs

//! Homework review API client.
//!
//! Issues `GET <endpoint>?from_date=<cursor>` with OAuth authorization and
//! classifies the outcome into request, status, format and API errors.

use async_trait::async_trait;
use reqwest::{Client, Request};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;
use crate::utils::format_timestamp;

/// Source of homework status responses.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Fetch the raw status response for changes since `from_date`.
    async fn homework_statuses(&self, from_date: i64) -> Result<Value>;
}

/// Review API client backed by reqwest.
pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Create a new client for the configured endpoint.
    pub fn new(client: Client, config: &ApiConfig, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            token: token.into(),
        }
    }

    /// Build the status request for changes since `from_date`.
    pub fn request(&self, from_date: i64) -> Result<Request> {
        let request = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl ReviewApi for PracticumClient {
    async fn homework_statuses(&self, from_date: i64) -> Result<Value> {
        log::info!(
            "Sending request to review API. timestamp={}({})",
            from_date,
            format_timestamp(from_date)
        );

        let request = self.request(from_date)?;
        let response = self.client.execute(request).await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        log::debug!("Data received ({}): {}", status, body);

        interpret_response(status, &self.endpoint, &body)
    }
}

/// Classify a raw HTTP answer from the review API.
///
/// Only the top-level contract is checked here; the body's shape is left to
/// the validator.
pub fn interpret_response(status: u16, endpoint: &str, body: &str) -> Result<Value> {
    if status != 200 {
        return Err(AppError::bad_status(status, endpoint));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::format(format!("response body is not valid JSON: {e}")))?;

    for key in ["error", "code"] {
        if let Some(detail) = value.get(key) {
            return Err(AppError::api(format!(
                "{key} in response: {}",
                describe(detail)
            )));
        }
    }

    Ok(value)
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("error")
            .or_else(|| map.get("message"))
            .map(describe)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}
