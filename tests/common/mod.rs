//! Shared helpers for the handler tests: an in-memory parameter store
//! and builders for configuration and invocation events.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use webhook_provisioner::{
    CredentialResolver, CustomResourceRequest, HandlerConfig, ParameterStore, ProvisionError,
};

/// In-memory parameter store that records how many lookups were made.
pub struct FakeParameterStore {
    values: HashMap<String, Result<String, String>>,
    lookups: Arc<AtomicUsize>,
}

impl FakeParameterStore {
    pub fn new(entries: &[(&str, Result<&str, &str>)]) -> Self {
        let values = entries
            .iter()
            .map(|&(name, value)| {
                (
                    name.to_string(),
                    value.map(str::to_string).map_err(str::to_string),
                )
            })
            .collect();
        Self {
            values,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle onto the lookup counter, usable after the store is boxed.
    pub fn lookup_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.lookups)
    }
}

#[async_trait]
impl ParameterStore for FakeParameterStore {
    async fn get_parameter(
        &self,
        name: &str,
        _with_decryption: bool,
    ) -> Result<String, ProvisionError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.values.get(name) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(ProvisionError::SecretFetch {
                name: name.to_string(),
                source: message.clone().into(),
            }),
            None => Err(ProvisionError::SecretFetch {
                name: name.to_string(),
                source: "parameter not found".into(),
            }),
        }
    }
}

pub const USERNAME_PARAMETER: &str = "/github/ci/username";
pub const TOKEN_PARAMETER: &str = "/github/ci/access-token";
pub const LOG_STREAM: &str = "2026/08/29/[$LATEST]0123456789abcdef";

/// Store with both credentials resolvable.
pub fn working_store() -> FakeParameterStore {
    FakeParameterStore::new(&[
        (USERNAME_PARAMETER, Ok("octocat")),
        (TOKEN_PARAMETER, Ok("ghp_secret")),
    ])
}

pub fn resolver_for(store: FakeParameterStore) -> CredentialResolver {
    CredentialResolver::new(
        Box::new(store),
        USERNAME_PARAMETER.to_string(),
        TOKEN_PARAMETER.to_string(),
    )
}

pub fn test_config() -> HandlerConfig {
    HandlerConfig {
        username_parameter: USERNAME_PARAMETER.to_string(),
        token_parameter: TOKEN_PARAMETER.to_string(),
        region: "us-east-1".to_string(),
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        log_stream_name: LOG_STREAM.to_string(),
    }
}

/// Invocation event pointing its callback URL at `callback_url`.
pub fn event(request_type: &str, callback_url: &str) -> CustomResourceRequest {
    serde_json::from_value(serde_json::json!({
        "RequestType": request_type,
        "ResponseURL": callback_url,
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/build/guid",
        "RequestId": "req-1234",
        "LogicalResourceId": "GithubWebhook",
        "ResourceProperties": {
            "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:webhook",
            "Endpoint": "https://ci.example.com/github"
        }
    }))
    .expect("test event must deserialize")
}
