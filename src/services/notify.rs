use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when invoking the email function
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Email function returned error: {0}")]
    FunctionError(String),
}

/// Form submission that the team should hear about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    GpRegistration { name: String, email: String, firm: String },
    LpRegistration { name: String, email: String, organization: String },
    Contact { name: String, email: String, message: String },
    DocumentAccess { name: String, email: String, document: String },
}

/// Client for the hosted serverless email function
pub struct Notifier {
    endpoint: String,
    api_key: String,
    function: String,
    client: Client,
}

impl Notifier {
    pub fn new(endpoint: String, api_key: String, function: String) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            endpoint,
            api_key,
            function,
            client,
        })
    }

    fn function_url(&self) -> String {
        format!("{}/functions/v1/{}", self.endpoint.trim_end_matches('/'), self.function)
    }

    /// Invoke the email function once; no retries
    pub async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.function_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(notification)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::FunctionError(format!(
                "Failed to send notification: {}",
                response.status()
            )));
        }

        tracing::debug!("Sent notification: {:?}", notification);
        Ok(())
    }
}

/// Send if a notifier is configured, logging instead of failing
pub async fn notify_best_effort(notifier: Option<&Notifier>, notification: Notification) {
    let Some(notifier) = notifier else {
        return;
    };

    if let Err(e) = notifier.send(&notification).await {
        tracing::warn!("Notification failed, submission was still stored: {}", e);
    }
}
