//! Production waitlist store: the Supabase REST interface.
//!
//! Three requests cover the whole contract:
//! - lookup: `GET /rest/v1/{table}?email=eq.<value>&select=id`
//! - insert: `POST /rest/v1/{table}` with a JSON row
//! - count: `GET /rest/v1/{table}?select=id` with `Prefer: count=exact`;
//!   the total comes back in the `Content-Range` header (`0-9/42` → 42)

use super::{StoreError, WaitlistStore};
use crate::config::WaitlistConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use serde_json::json;

/// REST client for a Supabase-hosted waitlist table.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    table: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(config: &WaitlistConfig) -> Self {
        Self {
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_anon_key.clone(),
            table: config.table.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Request builder with the auth headers every Supabase call needs.
    /// `Prefer` is per-operation: each query sends at most one value.
    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl WaitlistStore for SupabaseStore {
    async fn contains(&self, email: &str) -> Result<bool, StoreError> {
        let res = self
            .request(reqwest::Method::GET)
            .query(&[("email", format!("eq.{}", email)), ("select", "id".to_string())])
            .send()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        if !res.status().is_success() {
            return Err(StoreError::new(format!(
                "lookup failed with status {}",
                res.status()
            )));
        }

        let rows: Vec<serde_json::Value> = res
            .json()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, email: &str, source: &str) -> Result<(), StoreError> {
        let res = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .json(&json!({ "email": email, "source": source }))
            .send()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(StoreError::new(format!(
                "insert failed with status {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let res = self
            .request(reqwest::Method::GET)
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        if !res.status().is_success() {
            return Err(StoreError::new(format!(
                "count failed with status {}",
                res.status()
            )));
        }

        let total = res
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .unwrap_or(0);
        Ok(total)
    }
}

/// Extract the total from a `Content-Range` value such as `0-9/42`.
/// An unknown total (`*`) or malformed header yields None.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.split('/').nth(1)?.parse().ok()
}
