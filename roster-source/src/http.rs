//! reqwest-backed [`RecordSource`].

use std::time::Duration;

use async_trait::async_trait;
use roster_core::{ConfigError, FetchError, Record, RecordId, RosterError, RosterResult};
use roster_storage::RecordSource;
use serde::de::DeserializeOwned;

use crate::config::SourceConfig;

#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(config: &SourceConfig) -> RosterResult<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RosterError::Config(ConfigError::InvalidValue {
                    field: "http_client".to_string(),
                    value: config.base_url.clone(),
                    reason: e.to_string(),
                })
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn record_url(&self, id: RecordId) -> String {
        format!("{}/id/{}.json", self.base_url, id)
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/all.json", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "Request failed");
            FetchError::Transport {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Non-success response");
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(%url, error = %e, "Malformed payload");
            FetchError::Decode {
                url,
                reason: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch_by_id(&self, id: RecordId) -> Result<Record, FetchError> {
        let url = self.record_url(id);
        let record: Record = self.get_json(url.clone()).await?;
        if record.id != id {
            return Err(FetchError::Decode {
                url,
                reason: format!("asked for record {} but received {}", id, record.id),
            });
        }
        Ok(record)
    }

    /// Entries that fail to decode are skipped; the rest keep remote order.
    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError> {
        let url = self.catalog_url();
        let entries: Vec<serde_json::Value> = self.get_json(url.clone()).await?;
        let total = entries.len();

        let records: Vec<Record> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let entry_id = entry.get("id").cloned();
                match serde_json::from_value::<Record>(entry) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(
                            %url,
                            index,
                            id = ?entry_id,
                            error = %e,
                            "Skipping malformed catalog entry"
                        );
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(
            count = records.len(),
            skipped = total - records.len(),
            "Fetched full catalog"
        );
        Ok(records)
    }
}
