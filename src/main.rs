//! # Webhook Provisioner
//!
//! Lambda entry point for the CloudFormation custom resource that
//! provisions a GitHub repository webhook.
//!
//! The provisioner is constructed once per process, so the credential
//! cache survives across invocations served by the same warm process.

use anyhow::Context;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::info;
use webhook_provisioner::{CustomResourceRequest, HandlerConfig, WebhookProvisioner};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webhook_provisioner=info".into()),
        )
        .init();

    info!("Starting webhook provisioner");

    let config = HandlerConfig::from_env()?;

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .load()
        .await;
    let ssm_client = aws_sdk_ssm::Client::new(&sdk_config);

    let provisioner = Arc::new(
        WebhookProvisioner::new(config, ssm_client)
            .context("Failed to construct the webhook provisioner")?,
    );

    run(service_fn(move |event: LambdaEvent<CustomResourceRequest>| {
        let provisioner = Arc::clone(&provisioner);
        async move {
            provisioner.handle(&event.payload).await?;
            Ok::<(), Error>(())
        }
    }))
    .await
}
