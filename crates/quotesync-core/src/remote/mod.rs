//! Remote gateway: fetch quote batches from and push new quotes to the
//! remote feed.
//!
//! The feed speaks a posts-style JSON API: `GET <endpoint>?_limit=N` returns
//! `[{ "id": .., "title": .., .. }]` and `POST <endpoint>` accepts
//! `{ "title", "body", "userId" }`.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::QuoteRecord;
use crate::util::{compact_text, is_http_url, normalize_text_option, unix_timestamp_ms_now};

/// Anonymous user id the feed expects on created posts.
const PUSH_USER_ID: u32 = 1;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote API error: {0}")]
    Api(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Acknowledgement returned by the feed for a pushed quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushAck {
    /// Id the remote assigned, when it reported one
    pub remote_id: Option<String>,
}

/// Source of remote quotes the sync orchestrator talks to.
#[allow(async_fn_in_trait)]
pub trait RemoteSource {
    /// Fetch up to `limit` records. Failures are logged and yield an empty
    /// batch.
    async fn fetch_batch(&self, limit: usize) -> Vec<QuoteRecord>;

    /// Upload one locally created record.
    async fn push_one(&self, record: &QuoteRecord) -> RemoteResult<PushAck>;
}

/// HTTP implementation of [`RemoteSource`].
#[derive(Clone)]
pub struct HttpRemoteGateway {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemoteGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch a batch, surfacing failures to the caller.
    pub async fn try_fetch_batch(&self, limit: usize) -> RemoteResult<Vec<QuoteRecord>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("_limit", limit)])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(describe_api_error(status, &body)));
        }

        let posts = response.json::<Vec<RemotePost>>().await?;
        Ok(posts_to_records(posts, limit, unix_timestamp_ms_now()))
    }
}

impl RemoteSource for HttpRemoteGateway {
    async fn fetch_batch(&self, limit: usize) -> Vec<QuoteRecord> {
        match self.try_fetch_batch(limit).await {
            Ok(records) => {
                tracing::debug!("Fetched {} remote quotes", records.len());
                records
            }
            Err(error) => {
                tracing::warn!("Fetching remote quotes failed: {error}");
                Vec::new()
            }
        }
    }

    async fn push_one(&self, record: &QuoteRecord) -> RemoteResult<PushAck> {
        let payload = NewPost {
            title: &record.text,
            body: &record.category,
            user_id: PUSH_USER_ID,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(describe_api_error(status, &body)));
        }

        let body = response.json::<Value>().await?;
        Ok(parse_push_ack(&body))
    }
}

/// Item shape served by the feed. Only `id` and `title` are used.
#[derive(Debug, Deserialize)]
struct RemotePost {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewPost<'a> {
    title: &'a str,
    body: &'a str,
    user_id: u32,
}

fn posts_to_records(posts: Vec<RemotePost>, limit: usize, fetched_at: i64) -> Vec<QuoteRecord> {
    posts
        .into_iter()
        .filter_map(|post| {
            let title = normalize_text_option(post.title)?;
            Some(QuoteRecord::from_remote(
                post.id.as_ref().and_then(remote_id_label),
                &title,
                fetched_at,
            ))
        })
        .take(limit)
        .collect()
}

fn remote_id_label(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => normalize_text_option(Some(text.clone())),
        _ => None,
    }
}

fn parse_push_ack(body: &Value) -> PushAck {
    PushAck {
        remote_id: body.get("id").and_then(remote_id_label),
    }
}

fn describe_api_error(status: StatusCode, body: &str) -> String {
    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_endpoint(raw: String) -> RemoteResult<String> {
    let endpoint = normalize_text_option(Some(raw)).ok_or_else(|| {
        RemoteError::InvalidConfiguration("endpoint must not be empty".to_string())
    })?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(RemoteError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuoteSource, REMOTE_CATEGORY};

    #[test]
    fn normalize_endpoint_rejects_invalid_values() {
        assert!(normalize_endpoint(String::new()).is_err());
        assert!(normalize_endpoint("jsonplaceholder.typicode.com/posts".to_string()).is_err());
        assert_eq!(
            normalize_endpoint(" https://example.com/posts/ ".to_string()).unwrap(),
            "https://example.com/posts"
        );
    }

    #[test]
    fn posts_map_to_remote_records() {
        let posts: Vec<RemotePost> = serde_json::from_str(
            r#"[
                {"userId": 1, "id": 1, "title": "sunt aut facere", "body": "..."},
                {"id": "abc", "title": "  qui est esse "},
                {"id": 3, "title": "   "},
                {"title": "no id"}
            ]"#,
        )
        .unwrap();

        let records = posts_to_records(posts, 10, 99);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id.as_str(), "srv-1");
        assert_eq!(records[0].text, "sunt aut facere");
        assert_eq!(records[0].category, REMOTE_CATEGORY);
        assert_eq!(records[0].source, QuoteSource::Remote);
        assert_eq!(records[0].last_modified, 99);
        assert_eq!(records[1].id.as_str(), "srv-abc");
        assert_eq!(records[1].text, "qui est esse");
        assert!(records[2].id.is_remote());
    }

    #[test]
    fn posts_are_capped_at_limit() {
        let posts: Vec<RemotePost> =
            serde_json::from_str(r#"[{"id":1,"title":"a"},{"id":2,"title":"b"}]"#).unwrap();
        assert_eq!(posts_to_records(posts, 1, 0).len(), 1);
    }

    #[test]
    fn push_ack_reads_id_loosely() {
        let ack = parse_push_ack(&serde_json::json!({"id": 101, "title": "x"}));
        assert_eq!(ack.remote_id.as_deref(), Some("101"));
        assert_eq!(parse_push_ack(&serde_json::json!({})), PushAck::default());
    }

    #[test]
    fn new_post_uses_feed_field_names() {
        let payload = NewPost {
            title: "Be kind",
            body: "Wisdom",
            user_id: 1,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "Be kind");
        assert_eq!(json["body"], "Wisdom");
        assert_eq!(json["userId"], 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_empty_batch() {
        let gateway =
            HttpRemoteGateway::new("http://127.0.0.1:9/posts", Duration::from_secs(2)).unwrap();

        assert!(gateway.try_fetch_batch(5).await.is_err());
        assert!(gateway.fetch_batch(5).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_push_is_an_error() {
        let gateway =
            HttpRemoteGateway::new("http://127.0.0.1:9/posts", Duration::from_secs(2)).unwrap();
        let record = QuoteRecord::new_local("Be kind", "Wisdom");

        assert!(gateway.push_one(&record).await.is_err());
    }
}
