//! Blocking client for Discord incoming webhooks

use reqwest::blocking::{Client, multipart::Form};
use tracing::{debug, info};

use crate::error::{NotifyError, Result};
use crate::payload::Payload;

/// Form field Discord reads the message JSON from
pub const PAYLOAD_FIELD: &str = "payload_json";

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Delivery {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Sends one payload per call; no retries.
pub struct WebhookClient {
    url: String,
    client: Client,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts `payload` as a multipart form. Any 2xx status is success; anything else
    /// becomes [`NotifyError::Delivery`] carrying the (pretty-printed) response body.
    pub fn send(&self, payload: &Payload) -> Result<()> {
        let json = payload.to_json()?;
        debug!(payload = %json, "Webhook payload");

        let form = Form::new().text(PAYLOAD_FIELD, json);
        let response = self.client.post(&self.url).multipart(form).send()?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        info!(status = status.as_u16(), body = %body, "Webhook response");

        if status.is_success() {
            return Ok(());
        }

        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        } else {
            pretty_body(&body)
        };
        Err(NotifyError::Delivery {
            status: Some(status.as_u16()),
            message,
        })
    }
}

/// Re-indents a JSON body for the build log; other bodies are returned as-is.
fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}
