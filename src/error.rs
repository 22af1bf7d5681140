//! # Error Types
//!
//! Error taxonomy for the webhook provisioner. Each variant maps to one
//! stage of the pipeline: configuration load, secret lookup, credential
//! validation, hook registration, and callback delivery.
//!
//! Nothing in the pipeline is retried. Every invocation fails
//! independently and always delivers a response document to the
//! CloudFormation callback URL, except when the delivery itself is the
//! failing step (`NotificationTransport`), which is logged and does not
//! block invocation completion.

use thiserror::Error;

/// Boxed source error, used where the underlying cause comes from an SDK
/// or serialization layer with its own error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for the provisioning pipeline
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A required environment variable is missing or malformed.
    #[error("invalid process configuration: {0}")]
    Config(String),

    /// A parameter store lookup failed (network, permission, or missing
    /// parameter).
    #[error("failed to fetch parameter '{name}' from the parameter store")]
    SecretFetch {
        /// Name of the parameter that could not be fetched
        name: String,
        #[source]
        source: BoxError,
    },

    /// The resolved credential values were rejected before use.
    #[error("malformed credentials: {0}")]
    CredentialSetup(String),

    /// The create/edit webhook call against the repository hosting API
    /// failed.
    #[error("webhook registration failed: {reason}")]
    Registration {
        /// What went wrong, including the remote status and body when the
        /// API answered with an error
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The response PUT to the callback URL failed at the transport
    /// level. The invocation still completes; this is surfaced for
    /// logging only.
    #[error("failed to deliver the response document to the callback URL")]
    NotificationTransport(#[source] BoxError),
}

impl ProvisionError {
    /// Builds a `Registration` error from a transport-level failure.
    pub fn registration_transport(source: reqwest::Error) -> Self {
        ProvisionError::Registration {
            reason: "request could not be completed".to_string(),
            source: Some(source),
        }
    }

    /// Builds a `Registration` error from an API-level error response.
    pub fn registration_rejected(status: reqwest::StatusCode, body: &str) -> Self {
        ProvisionError::Registration {
            reason: format!("GitHub API returned {status}: {body}"),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_fetch_display_names_the_parameter() {
        let err = ProvisionError::SecretFetch {
            name: "/github/username".to_string(),
            source: "parameter not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch parameter '/github/username' from the parameter store"
        );
    }

    #[test]
    fn registration_rejected_carries_status_and_body() {
        let err = ProvisionError::registration_rejected(
            reqwest::StatusCode::NOT_FOUND,
            "{\"message\":\"Not Found\"}",
        );
        let message = err.to_string();
        assert!(message.contains("404"), "missing status in: {message}");
        assert!(message.contains("Not Found"), "missing body in: {message}");
    }

    #[test]
    fn secret_fetch_exposes_the_underlying_cause() {
        use std::error::Error as _;

        let err = ProvisionError::SecretFetch {
            name: "/github/token".to_string(),
            source: "access denied".into(),
        };
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("access denied"));
    }
}
