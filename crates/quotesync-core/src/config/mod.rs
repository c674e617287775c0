//! Sync settings shared by every front end.
//!
//! Settings are plain data with serde defaults, so a partial JSON file fills
//! in the rest. Call [`SyncSettings::validate`] before handing them to the
//! gateway or orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
pub const DEFAULT_FETCH_LIMIT: usize = 5;
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    pub remote_endpoint: String,
    /// Maximum records requested per cycle
    pub fetch_limit: usize,
    pub sync_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            remote_endpoint: DEFAULT_REMOTE_ENDPOINT.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SyncSettings {
    /// Normalize the endpoint and reject values the orchestrator cannot use.
    pub fn validate(mut self) -> Result<Self, String> {
        let endpoint = normalize_text_option(Some(self.remote_endpoint))
            .ok_or_else(|| "remote_endpoint must not be empty".to_string())?;
        if !is_http_url(&endpoint) {
            return Err("remote_endpoint must include http:// or https://".to_string());
        }
        self.remote_endpoint = endpoint.trim_end_matches('/').to_string();

        if self.fetch_limit == 0 {
            return Err("fetch_limit must be at least 1".to_string());
        }
        if self.sync_interval_secs == 0 {
            return Err("sync_interval_secs must be at least 1".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".to_string());
        }

        Ok(self)
    }

    /// Replace the endpoint when an override is present and non-blank.
    #[must_use]
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = normalize_text_option(endpoint) {
            self.remote_endpoint = endpoint;
        }
        self
    }

    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
