//! # Webhook Registrar
//!
//! Creates or edits a repository webhook through the GitHub REST API v3.
//!
//! The update path deliberately does not look up a hook id: the handler
//! stores nothing between invocations, so matching the existing hook is
//! left to the hosting side. Stack deletion performs no call here at all.
//!
//! References:
//! - [Repository webhooks REST API](https://docs.github.com/en/rest/repos/webhooks)

use crate::credentials::Credentials;
use crate::error::ProvisionError;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

const GITHUB_API_BASE_URL: &str = "https://api.github.com";
const GITHUB_ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// GitHub rejects requests without a user agent.
const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Hook name for repository webhooks; the API only accepts `web`.
const HOOK_NAME: &str = "web";

/// Delivery configuration nested inside a webhook
#[derive(Debug, Clone, Serialize)]
pub struct HookConfig {
    /// Endpoint the webhook POSTs events to
    pub url: String,
    /// Payload encoding; always `json` for this handler
    pub content_type: String,
}

/// Webhook to register on a repository
///
/// Owner and repository identify the target and travel in the request
/// path, not in the body.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookSpec {
    #[serde(skip_serializing)]
    pub owner: String,
    #[serde(skip_serializing)]
    pub repo: String,
    /// Always `web`
    pub name: String,
    /// Events the webhook subscribes to
    pub events: Vec<String>,
    pub active: bool,
    pub config: HookConfig,
}

impl WebhookSpec {
    /// Builds the fixed-shape webhook this handler provisions: a `web`
    /// hook subscribed to pull requests and issue comments, delivering
    /// JSON to the given endpoint.
    pub fn for_endpoint(owner: &str, repo: &str, endpoint: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            name: HOOK_NAME.to_string(),
            events: vec!["pull_request".to_string(), "issue_comment".to_string()],
            active: true,
            config: HookConfig {
                url: endpoint.to_string(),
                content_type: "json".to_string(),
            },
        }
    }
}

/// Client for the repository hooks endpoint
#[derive(Debug)]
pub struct HookRegistrar {
    http_client: Client,
    base_url: String,
}

impl HookRegistrar {
    /// Creates a registrar against the public GitHub API.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let http_client = Client::builder()
            .build()
            .context("Failed to create HTTP client for the GitHub API")?;
        Ok(Self::with_base_url(http_client, GITHUB_API_BASE_URL))
    }

    /// Creates a registrar against a custom API endpoint. Used by tests
    /// and GitHub Enterprise style deployments.
    pub fn with_base_url(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Registers a new webhook on the repository.
    ///
    /// # Errors
    ///
    /// `ProvisionError::Registration` on transport failure or an API
    /// error response.
    pub async fn create_hook(
        &self,
        spec: &WebhookSpec,
        credentials: &Credentials,
    ) -> Result<(), ProvisionError> {
        info!(
            "Creating webhook on {}/{} for {}",
            spec.owner, spec.repo, spec.config.url
        );
        self.send_hook(reqwest::Method::POST, spec, credentials)
            .await
    }

    /// Edits the repository webhook in place. Relies on the hosting side
    /// matching the existing hook; no hook id is looked up or stored.
    ///
    /// # Errors
    ///
    /// `ProvisionError::Registration` on transport failure or an API
    /// error response.
    pub async fn edit_hook(
        &self,
        spec: &WebhookSpec,
        credentials: &Credentials,
    ) -> Result<(), ProvisionError> {
        info!(
            "Editing webhook on {}/{} for {}",
            spec.owner, spec.repo, spec.config.url
        );
        self.send_hook(reqwest::Method::PATCH, spec, credentials)
            .await
    }

    async fn send_hook(
        &self,
        method: reqwest::Method,
        spec: &WebhookSpec,
        credentials: &Credentials,
    ) -> Result<(), ProvisionError> {
        let url = format!(
            "{}/repos/{}/{}/hooks",
            self.base_url, spec.owner, spec.repo
        );

        let response = self
            .http_client
            .request(method, &url)
            .basic_auth(&credentials.username, Some(&credentials.token))
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT_HEADER)
            .header(reqwest::header::USER_AGENT, APP_USER_AGENT)
            .json(spec)
            .send()
            .await
            .map_err(ProvisionError::registration_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::registration_rejected(status, &body));
        }

        debug!("GitHub API answered {}", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_serializes_to_the_hook_payload() {
        let spec = WebhookSpec::for_endpoint("acme", "widgets", "https://ci.example.com/github");
        let body = serde_json::to_value(&spec).unwrap();

        assert_eq!(
            body,
            json!({
                "name": "web",
                "events": ["pull_request", "issue_comment"],
                "active": true,
                "config": {
                    "url": "https://ci.example.com/github",
                    "content_type": "json"
                }
            })
        );
    }

    #[test]
    fn owner_and_repo_never_reach_the_body() {
        let spec = WebhookSpec::for_endpoint("acme", "widgets", "https://ci.example.com/github");
        let body = serde_json::to_string(&spec).unwrap();
        assert!(!body.contains("acme"));
        assert!(!body.contains("widgets"));
    }
}
