//! # Credential Resolution
//!
//! Fetches the GitHub username and access token from AWS Systems Manager
//! Parameter Store, with decryption, and memoizes the result for the
//! lifetime of the process. A warm Lambda process therefore performs at
//! most two parameter lookups, regardless of how many invocations it
//! serves.
//!
//! The lookups are strictly sequential: the token is only fetched after
//! the username lookup succeeded.

use crate::error::ProvisionError;
use async_trait::async_trait;
use aws_sdk_ssm::Client as SsmClient;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Key-value secret lookup with optional at-rest decryption
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch a single parameter value by name.
    async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<String, ProvisionError>;
}

/// Parameter store backed by AWS Systems Manager
pub struct SsmParameterStore {
    client: SsmClient,
}

impl std::fmt::Debug for SsmParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmParameterStore").finish_non_exhaustive()
    }
}

impl SsmParameterStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<String, ProvisionError> {
        debug!("Fetching parameter {} from SSM", name);
        let response = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|e| ProvisionError::SecretFetch {
                name: name.to_string(),
                source: Box::new(e),
            })?;

        response
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(ToString::to_string)
            .ok_or_else(|| ProvisionError::SecretFetch {
                name: name.to_string(),
                source: "parameter has no value".into(),
            })
    }
}

/// Resolved GitHub credentials
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    /// Validates the raw parameter values before they are used for basic
    /// authentication.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::CredentialSetup` when either value is
    /// empty.
    pub fn new(username: String, token: String) -> Result<Self, ProvisionError> {
        if username.is_empty() {
            return Err(ProvisionError::CredentialSetup(
                "username parameter is empty".to_string(),
            ));
        }
        if token.is_empty() {
            return Err(ProvisionError::CredentialSetup(
                "access token parameter is empty".to_string(),
            ));
        }
        Ok(Self { username, token })
    }
}

// The token never appears in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// One-shot memoized credential resolution
///
/// The cache is set exactly once, on success only, and lives as long as
/// the process. There is no invalidation and no refresh; a process
/// restart is the only way to pick up rotated secrets.
pub struct CredentialResolver {
    store: Box<dyn ParameterStore>,
    username_parameter: String,
    token_parameter: String,
    cache: OnceCell<Credentials>,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("username_parameter", &self.username_parameter)
            .field("token_parameter", &self.token_parameter)
            .field("cached", &self.cache.initialized())
            .finish_non_exhaustive()
    }
}

impl CredentialResolver {
    pub fn new(
        store: Box<dyn ParameterStore>,
        username_parameter: String,
        token_parameter: String,
    ) -> Self {
        Self {
            store,
            username_parameter,
            token_parameter,
            cache: OnceCell::new(),
        }
    }

    /// Returns the cached credentials, fetching them on first use.
    ///
    /// The username is fetched before the token; a username failure
    /// short-circuits and the token lookup is never attempted.
    ///
    /// # Errors
    ///
    /// `ProvisionError::SecretFetch` when a lookup fails,
    /// `ProvisionError::CredentialSetup` when a fetched value is unusable.
    pub async fn resolve(&self) -> Result<&Credentials, ProvisionError> {
        if let Some(credentials) = self.cache.get() {
            debug!("Credentials already resolved, skipping parameter store");
            return Ok(credentials);
        }

        self.cache
            .get_or_try_init(|| async {
                info!("Resolving GitHub credentials from the parameter store");
                let username = self
                    .store
                    .get_parameter(&self.username_parameter, true)
                    .await?;
                let token = self.store.get_parameter(&self.token_parameter, true).await?;
                Credentials::new(username, token)
            })
            .await
    }
}
