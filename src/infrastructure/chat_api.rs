use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Delivery rejected for recipient {0}")]
    Rejected(i64),
    #[error("Rate limited")]
    RateLimited,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Outbound message delivery seam.
///
/// The core never talks to the chat platform directly; broadcast and
/// notification logic go through this trait so tests can substitute an
/// in-memory sink.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_text(&self, recipient: i64, text: &str) -> Result<(), DeliveryError>;
}

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 503)
}

/// HTTP client for the chat platform's bot API.
pub struct ChatApiClient {
    client: Client,
    base_url: String,
}

impl ChatApiClient {
    pub fn new(base_url: String, api_token: &str) -> Result<Self, DeliveryError> {
        let mut headers = header::HeaderMap::new();
        let auth_value = header::HeaderValue::from_str(&format!("Bearer {}", api_token))
            .map_err(|e| DeliveryError::InvalidConfig(format!("Invalid API token: {}", e)))?;
        headers.insert(header::AUTHORIZATION, auth_value);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                DeliveryError::InvalidConfig(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    async fn post_with_retry(
        &self,
        path: &str,
        body: serde_json::Value,
        recipient: i64,
    ) -> Result<(), DeliveryError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let mut last_error: Option<String> = None;

        for attempt in 0..MAX_RETRIES {
            match self.client.post(&url).json(&body).send().await {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    if status == 429 {
                        return Err(DeliveryError::RateLimited);
                    }
                    // Blocked bot, deleted account: permanent for this recipient.
                    if status == 403 || status == 404 {
                        return Err(DeliveryError::Rejected(recipient));
                    }
                    if is_retryable_status(status) && attempt < MAX_RETRIES - 1 {
                        let backoff = INITIAL_BACKOFF_MS * 2_u64.pow(attempt);
                        sleep(Duration::from_millis(backoff)).await;
                        continue;
                    }
                    if !resp.status().is_success() {
                        let error_text = resp
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        return Err(DeliveryError::RequestFailed(error_text));
                    }
                    return Ok(());
                }
                Err(e) => {
                    last_error = Some(e.to_string());
                    if attempt < MAX_RETRIES - 1 {
                        let backoff = INITIAL_BACKOFF_MS * 2_u64.pow(attempt);
                        sleep(Duration::from_millis(backoff)).await;
                    }
                }
            }
        }

        Err(DeliveryError::RequestFailed(
            last_error.unwrap_or_else(|| "Max retries exceeded".to_string()),
        ))
    }
}

#[async_trait]
impl MessageSink for ChatApiClient {
    async fn send_text(&self, recipient: i64, text: &str) -> Result<(), DeliveryError> {
        let body = json!({
            "chat_id": recipient,
            "text": text,
        });
        self.post_with_retry("sendMessage", body, recipient).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses_are_server_errors_only() {
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(403));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(429));
    }

    #[test]
    fn client_rejects_unprintable_token() {
        let result = ChatApiClient::new("https://api.example.com".to_string(), "tok\nen");
        assert!(matches!(result, Err(DeliveryError::InvalidConfig(_))));
    }
}
