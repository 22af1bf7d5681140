//! # Response Notifier
//!
//! Delivers the response document to the pre-signed callback URL that
//! CloudFormation puts in every custom-resource event.
//!
//! The delivery is fire-and-forget: one PUT, no retry, and no
//! verification beyond logging the callback's HTTP status. The callback
//! contract requires an empty `content-type` header and an explicit
//! `content-length` matching the serialized body.

use crate::error::ProvisionError;
use crate::event::{CustomResourceRequest, ResponseStatus, StatusDocument};
use anyhow::{Context, Result};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use tracing::info;

/// Sends response documents to the CloudFormation callback URL
#[derive(Debug)]
pub struct ResponseNotifier {
    http_client: Client,
    log_stream_name: String,
}

impl ResponseNotifier {
    /// Creates a notifier that reports the given log stream as the
    /// physical resource id.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new(log_stream_name: String) -> Result<Self> {
        let http_client = Client::builder()
            .build()
            .context("Failed to create HTTP client for callback delivery")?;
        Ok(Self::with_client(http_client, log_stream_name))
    }

    pub fn with_client(http_client: Client, log_stream_name: String) -> Self {
        Self {
            http_client,
            log_stream_name,
        }
    }

    /// Builds the response document and PUTs it to the event's callback
    /// URL. Any HTTP status from the callback endpoint counts as
    /// delivered; only transport-level failures are errors, and even
    /// those must not keep the invocation from completing.
    ///
    /// # Errors
    ///
    /// `ProvisionError::NotificationTransport` when the PUT cannot be
    /// completed.
    pub async fn send(
        &self,
        event: &CustomResourceRequest,
        status: ResponseStatus,
        data: Option<serde_json::Value>,
    ) -> Result<(), ProvisionError> {
        let document = StatusDocument::new(event, status, &self.log_stream_name, data);
        let body = serde_json::to_string(&document)
            .map_err(|e| ProvisionError::NotificationTransport(Box::new(e)))?;

        info!("Response body: {}", body);
        info!("Sending response to {}", event.response_url);

        let response = self
            .http_client
            .put(&event.response_url)
            .header(CONTENT_TYPE, "")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await
            .map_err(|e| ProvisionError::NotificationTransport(Box::new(e)))?;

        info!("Callback endpoint answered {}", response.status());
        Ok(())
    }
}
