//! A client for sending alert messages to a chat webhook.

use crate::core::{ChatNotifier, NotifyError};
use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, instrument};

/// A client for posting messages to a fixed incoming-webhook URL.
pub struct ChatClient {
    webhook_url: String,
    http: reqwest::Client,
    timeout: std::time::Duration,
}

impl ChatClient {
    /// Creates a new `ChatClient`.
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            http: reqwest::Client::new(),
            timeout: std::time::Duration::from_secs(10),
        }
    }
}

#[async_trait]
impl ChatNotifier for ChatClient {
    /// Serializes the message body and posts it to the configured webhook.
    #[instrument(skip(self, text), fields(length = text.len()))]
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let payload = json!({ "text": text });

        let response = self
            .http
            .post(&self.webhook_url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Successfully sent chat message.");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                body = %body,
                "Failed to send chat notification"
            );
            Err(NotifyError::Rejected { status, body })
        }
    }
}

#[cfg(test)]
mod chat_client_tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_chat_client_send_success() {
        // Arrange
        let server = MockServer::start().await;
        let text = "🚨 *Dataform Anomaly Alert*\n\ntest body";
        let expected_body = json!({ "text": text });

        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(header("content-type", "application/json"))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = ChatClient::new(format!("{}/webhook", server.uri()));

        // Act
        let result = client.send(text).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_chat_client_handles_server_error() {
        // Arrange
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ChatClient::new(format!("{}/webhook", server.uri()));

        // Act
        let result = client.send("message").await;

        // Assert
        match result.unwrap_err() {
            NotifyError::Rejected { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Rejected, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_chat_client_handles_timeout() {
        // Arrange
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let mut client = ChatClient::new(format!("{}/webhook", server.uri()));
        client.timeout = std::time::Duration::from_millis(200);

        // Act
        let result = client.send("message").await;

        // Assert
        let err = result.unwrap_err();
        match err {
            NotifyError::Request(e) => assert!(e.is_timeout(), "not a timeout: {e}"),
            other => panic!("expected Request, got: {other}"),
        }
    }
}
