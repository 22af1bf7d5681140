//! Webhook Provisioner Library
//!
//! A CloudFormation custom-resource handler that provisions a GitHub
//! repository webhook. On stack Create it registers the webhook, on
//! Update it edits it in place, and on Delete it reports success without
//! touching the repository. Credentials come from AWS Systems Manager
//! Parameter Store and the outcome is reported to CloudFormation through
//! the pre-signed callback URL carried in every event.
//!
//! The pipeline is strictly sequential: username lookup, token lookup,
//! one create-or-edit call, one callback PUT. Nothing is retried, and
//! exactly one response document is sent per invocation.
//!
//! Tests are included in the module files; end-to-end handler tests live
//! in `tests/`.

pub mod config;
pub mod credentials;
pub mod error;
pub mod event;
pub mod notifier;
pub mod provisioner;
pub mod registrar;

pub use config::HandlerConfig;
pub use credentials::{CredentialResolver, Credentials, ParameterStore, SsmParameterStore};
pub use error::ProvisionError;
pub use event::{
    CustomResourceRequest, RequestType, ResourceProperties, ResponseStatus, StatusDocument,
};
pub use notifier::ResponseNotifier;
pub use provisioner::WebhookProvisioner;
pub use registrar::{HookConfig, HookRegistrar, WebhookSpec};
