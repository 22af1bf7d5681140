//! # Process Configuration
//!
//! Environment-derived configuration, read once at process start.
//!
//! The handler expects the standard custom-resource deployment variables:
//!
//! - `SSM_GITHUB_USERNAME` - parameter store name of the GitHub username
//! - `SSM_GITHUB_ACCESS_TOKEN` - parameter store name of the access token
//! - `AWS_DEFAULT_REGION` - region the parameter store client targets
//! - `GITHUB_REPOSITORY` - repository URL, e.g. `https://github.com/{owner}/{repo}`
//! - `AWS_LAMBDA_LOG_STREAM_NAME` - set by the Lambda runtime; echoed back
//!   to CloudFormation as the physical resource id

use crate::error::ProvisionError;
use tracing::info;

/// Positional index of the owner segment in a slash-split repository URL.
/// `https://github.com/{owner}/{repo}` splits to
/// `["https:", "", "github.com", owner, repo]`.
const REPOSITORY_OWNER_INDEX: usize = 3;
const REPOSITORY_NAME_INDEX: usize = 4;

/// Configuration for one handler process
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Parameter store name holding the GitHub username
    pub username_parameter: String,
    /// Parameter store name holding the GitHub access token
    pub token_parameter: String,
    /// Region the parameter store client targets
    pub region: String,
    /// Repository owner, extracted from the repository URL
    pub owner: String,
    /// Repository name, extracted from the repository URL
    pub repo: String,
    /// CloudWatch log stream of this process, used as the physical
    /// resource id in response documents
    pub log_stream_name: String,
}

impl HandlerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Config` when a required variable is
    /// missing or the repository URL does not contain owner and repo
    /// segments.
    pub fn from_env() -> Result<Self, ProvisionError> {
        let username_parameter = require_env("SSM_GITHUB_USERNAME")?;
        let token_parameter = require_env("SSM_GITHUB_ACCESS_TOKEN")?;
        let region = require_env("AWS_DEFAULT_REGION")?;
        let repository = require_env("GITHUB_REPOSITORY")?;
        let log_stream_name = require_env("AWS_LAMBDA_LOG_STREAM_NAME")?;

        let (owner, repo) = parse_repository(&repository)?;
        info!("Provisioning webhooks for repository: {}/{}", owner, repo);

        Ok(Self {
            username_parameter,
            token_parameter,
            region,
            owner,
            repo,
            log_stream_name,
        })
    }
}

fn require_env(name: &str) -> Result<String, ProvisionError> {
    std::env::var(name)
        .map_err(|_| ProvisionError::Config(format!("environment variable {name} is not set")))
}

/// Extracts owner and repository name from a repository URL by fixed
/// positional index after splitting on `/`.
fn parse_repository(repository: &str) -> Result<(String, String), ProvisionError> {
    let segments: Vec<&str> = repository.split('/').collect();

    let owner = segments.get(REPOSITORY_OWNER_INDEX).copied();
    let repo = segments.get(REPOSITORY_NAME_INDEX).copied();

    match (owner, repo) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ProvisionError::Config(format!(
            "GITHUB_REPOSITORY '{repository}' does not look like https://github.com/<owner>/<repo>"
        ))),
    }
}
