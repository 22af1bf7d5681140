//! # Webhook Provisioner
//!
//! Dispatch glue for one custom-resource invocation: branch on the
//! requested lifecycle operation, resolve credentials, register the
//! webhook, and always report the outcome to the callback URL.
//!
//! Exactly one response document is sent per invocation, on every path.
//! A failed callback delivery is logged but never blocks completion, so
//! CloudFormation is not left waiting on a hung stack operation longer
//! than its own timeout.

use crate::config::HandlerConfig;
use crate::credentials::{CredentialResolver, SsmParameterStore};
use crate::error::ProvisionError;
use crate::event::{CustomResourceRequest, RequestType, ResponseStatus};
use crate::notifier::ResponseNotifier;
use crate::registrar::{HookRegistrar, WebhookSpec};
use anyhow::Result;
use serde_json::json;
use tracing::{error, info};

/// Handles custom-resource invocations for one repository
#[derive(Debug)]
pub struct WebhookProvisioner {
    config: HandlerConfig,
    credentials: CredentialResolver,
    registrar: HookRegistrar,
    notifier: ResponseNotifier,
}

impl WebhookProvisioner {
    /// Wires the provisioner against AWS SSM and the public GitHub API.
    ///
    /// Constructed once per process so the credential cache spans all
    /// invocations served by a warm process.
    ///
    /// # Errors
    ///
    /// Fails when an HTTP client cannot be constructed.
    pub fn new(config: HandlerConfig, ssm_client: aws_sdk_ssm::Client) -> Result<Self> {
        let credentials = CredentialResolver::new(
            Box::new(SsmParameterStore::new(ssm_client)),
            config.username_parameter.clone(),
            config.token_parameter.clone(),
        );
        let registrar = HookRegistrar::new()?;
        let notifier = ResponseNotifier::new(config.log_stream_name.clone())?;
        Ok(Self::with_components(config, credentials, registrar, notifier))
    }

    /// Assembles a provisioner from explicit components. Tests use this
    /// to substitute an in-memory parameter store and mock endpoints.
    pub fn with_components(
        config: HandlerConfig,
        credentials: CredentialResolver,
        registrar: HookRegistrar,
        notifier: ResponseNotifier,
    ) -> Self {
        Self {
            config,
            credentials,
            registrar,
            notifier,
        }
    }

    /// Handles one invocation end to end.
    ///
    /// Resolves only after the response document has been sent (or its
    /// delivery failed and was logged), so the invocation completes
    /// exactly once on every path.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error after reporting FAILED, so the platform
    /// also sees the invocation as failed.
    pub async fn handle(&self, event: &CustomResourceRequest) -> Result<(), ProvisionError> {
        info!(
            request_type = ?event.request_type,
            stack_id = %event.stack_id,
            request_id = %event.request_id,
            "Request received"
        );

        // Stack deletion does not remove the webhook; it only confirms
        // the resource is gone from CloudFormation's point of view.
        if event.request_type == RequestType::Delete {
            self.notify(event, ResponseStatus::Success, None).await;
            return Ok(());
        }

        let credentials = match self.credentials.resolve().await {
            Ok(credentials) => credentials,
            Err(e) => {
                error!("Credential resolution failed: {:#}", e);
                self.notify(event, ResponseStatus::Failed, Some(json!({})))
                    .await;
                return Err(e);
            }
        };

        let spec = WebhookSpec::for_endpoint(
            &self.config.owner,
            &self.config.repo,
            &event.resource_properties.endpoint,
        );

        let registration = match event.request_type {
            RequestType::Create => self.registrar.create_hook(&spec, credentials).await,
            RequestType::Update | RequestType::Delete => {
                self.registrar.edit_hook(&spec, credentials).await
            }
        };

        match registration {
            Ok(()) => {
                self.notify(event, ResponseStatus::Success, Some(json!({})))
                    .await;
                Ok(())
            }
            Err(e) => {
                error!("Webhook registration failed: {:#}", e);
                self.notify(event, ResponseStatus::Failed, Some(json!({})))
                    .await;
                Err(e)
            }
        }
    }

    /// Sends the response document, swallowing transport failures so the
    /// invocation always completes.
    async fn notify(
        &self,
        event: &CustomResourceRequest,
        status: ResponseStatus,
        data: Option<serde_json::Value>,
    ) {
        if let Err(e) = self.notifier.send(event, status, data).await {
            error!("sendResponse error: {:#}", e);
        }
    }
}
