use crate::config::ActivitySettings;
use crate::models::ActivityCounts;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Documents requested per page when counting authored content
const PAGE_SIZE: usize = 100;

/// Errors that can occur when fetching activity counts
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Activity store not configured: {0}")]
    NotConfigured(String),
}

/// Client for the document store holding user-authored content
///
/// Counts how many documents each user authored, which the matcher uses for
/// its activity signal. Counts are cached per user for the configured TTL.
pub struct ActivityClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    collection: String,
    author_field: String,
    client: Client,
    cache: moka::future::Cache<String, u32>,
}

impl ActivityClient {
    /// Create a client from settings; fails when no endpoint is configured
    pub fn from_settings(settings: &ActivitySettings) -> Result<Self, ActivityError> {
        let base_url = settings
            .endpoint
            .clone()
            .ok_or_else(|| ActivityError::NotConfigured("activity.endpoint".into()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let cache = moka::future::CacheBuilder::new(settings.cache_size)
            .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
            .build();

        Ok(Self {
            base_url,
            api_key: settings.api_key.clone().unwrap_or_default(),
            project_id: settings.project_id.clone().unwrap_or_default(),
            database_id: settings.database_id.clone().unwrap_or_default(),
            collection: settings.collection.clone(),
            author_field: settings.author_field.clone(),
            client,
            cache,
        })
    }

    /// Fetch content counts for the given users
    ///
    /// Every requested id is present in the result; users without content
    /// map to 0.
    pub async fn fetch_counts(&self, user_ids: &[String]) -> Result<ActivityCounts, ActivityError> {
        let mut counts = ActivityCounts::new();
        let mut missing: Vec<String> = Vec::new();

        for id in user_ids {
            if counts.contains_key(id) || missing.contains(id) {
                continue;
            }
            match self.cache.get(id).await {
                Some(count) => {
                    counts.insert(id.clone(), count);
                }
                None => missing.push(id.clone()),
            }
        }

        tracing::trace!("Activity cache: {} hits, {} misses", counts.len(), missing.len());

        if missing.is_empty() {
            return Ok(counts);
        }

        let fetched = self.count_documents(&missing).await?;
        for id in missing {
            let count = fetched.get(&id).copied().unwrap_or(0);
            self.cache.insert(id.clone(), count).await;
            counts.insert(id, count);
        }

        Ok(counts)
    }

    /// Fetch counts, degrading to an empty mapping when the store is unavailable
    pub async fn fetch_counts_or_empty(&self, user_ids: &[String]) -> ActivityCounts {
        match self.fetch_counts(user_ids).await {
            Ok(counts) => counts,
            Err(e) => {
                tracing::warn!("Failed to fetch activity counts, scoring without activity: {}", e);
                ActivityCounts::new()
            }
        }
    }

    async fn count_documents(&self, user_ids: &[String]) -> Result<ActivityCounts, ActivityError> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collection
        );
        let author_filter = serde_json::to_string(user_ids)
            .map_err(|e| ActivityError::InvalidResponse(e.to_string()))?;

        let mut counts = ActivityCounts::new();
        let mut offset = 0usize;

        loop {
            let queries = vec![
                format!("equal(\"{}\", {})", self.author_field, author_filter),
                format!("limit({})", PAGE_SIZE),
                format!("offset({})", offset),
            ];
            let queries_json = serde_json::to_string(&queries)
                .map_err(|e| ActivityError::InvalidResponse(e.to_string()))?;
            let full_url = format!("{}?query={}", url, urlencoding::encode(&queries_json));

            tracing::debug!("Fetching activity page at offset {} for {} users", offset, user_ids.len());

            let response = self
                .client
                .get(&full_url)
                .header("X-Appwrite-Key", &self.api_key)
                .header("X-Appwrite-Project", &self.project_id)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(ActivityError::ApiError(format!(
                    "Failed to list documents: {}",
                    response.status()
                )));
            }

            let json: Value = response.json().await?;

            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| ActivityError::InvalidResponse("Missing documents array".into()))?;

            for doc in documents {
                let data = doc.get("data").unwrap_or(doc);
                if let Some(author) = data.get(&self.author_field).and_then(|a| a.as_str()) {
                    *counts.entry(author.to_string()).or_insert(0) += 1;
                }
            }

            let total = json
                .get("total")
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as usize;
            offset += documents.len();

            if documents.len() < PAGE_SIZE || offset >= total {
                break;
            }
        }

        Ok(counts)
    }
}
