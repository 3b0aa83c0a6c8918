use crate::core::{ConfigProvider, NewWaitlistEntry, Role, WaitlistEntry, WaitlistStore};
use crate::domain::model::DEFAULT_SOURCE;
use crate::utils::error::{LandingError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// 透過 Supabase (PostgREST) 寫入報名資料
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaitlistRow {
    id: serde_json::Value,
    name: String,
    email: String,
    practice: Option<String>,
    role: Option<String>,
    interests: Option<Vec<String>>,
    created_at: Option<DateTime<Utc>>,
    source: Option<String>,
}

impl WaitlistRow {
    fn into_entry(self) -> WaitlistEntry {
        let id = match self.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        WaitlistEntry {
            id,
            name: self.name,
            email: self.email,
            practice: self.practice,
            role: self.role.and_then(|r| r.parse::<Role>().ok()),
            interests: self
                .interests
                .unwrap_or_default()
                .into_iter()
                .collect::<BTreeSet<_>>(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
            source: self.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        }
    }
}

impl SupabaseStore {
    pub fn new(base_url: &str, api_key: &str, table: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.datastore_url(),
            config.datastore_key(),
            config.waitlist_table(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WaitlistStore for SupabaseStore {
    async fn insert(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry> {
        tracing::debug!("POST {}", self.endpoint);

        // created_at 與 source 交給資料庫預設值
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(&[&entry])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Supabase response status: {}", status);

        if status.is_success() {
            let rows: Vec<WaitlistRow> = response.json().await?;
            return rows
                .into_iter()
                .next()
                .map(WaitlistRow::into_entry)
                .ok_or_else(|| LandingError::DatastoreError {
                    code: None,
                    message: "insert returned no rows".to_string(),
                });
        }

        let text = response.text().await.unwrap_or_default();
        let error: Option<PostgrestError> = serde_json::from_str(&text).ok();
        let code = error.as_ref().and_then(|e| e.code.clone());

        if status == StatusCode::CONFLICT || code.as_deref() == Some(UNIQUE_VIOLATION) {
            return Err(LandingError::conflict("Email already registered for waitlist"));
        }

        let message = error
            .map(|e| {
                let mut message = e.message.unwrap_or_default();
                if let Some(details) = e.details {
                    message = format!("{} ({})", message, details);
                }
                message
            })
            .unwrap_or(text);

        tracing::error!("❌ Supabase error {}: {}", status, message);
        Err(LandingError::DatastoreError { code, message })
    }
}
