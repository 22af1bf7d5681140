//! # Custom Resource Wire Types
//!
//! Request and response payloads of the CloudFormation custom-resource
//! contract. Field names follow the wire schema exactly.
//!
//! References:
//! - [Custom resource request objects](https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/crpg-ref-requests.html)
//! - [Custom resource response objects](https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/crpg-ref-responses.html)

use serde::{Deserialize, Serialize};

/// Stack lifecycle operation requested by CloudFormation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// Resource properties supplied by the stack template
///
/// CloudFormation forwards these verbatim from the template; the only
/// property this handler consumes is the endpoint the webhook should
/// deliver to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceProperties {
    /// Target URL the provisioned webhook will POST events to
    #[serde(default)]
    pub endpoint: String,
}

/// Invocation event delivered by CloudFormation through Lambda
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceRequest {
    /// Requested lifecycle operation
    pub request_type: RequestType,
    /// Pre-signed S3 URL the response document must be PUT to
    ///
    /// Note: the wire field is `ResponseURL`, not `ResponseUrl`.
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    /// ARN of the stack that owns the resource
    pub stack_id: String,
    /// Unique id of this request, echoed back in the response
    pub request_id: String,
    /// Template-local name of the resource, echoed back in the response
    pub logical_resource_id: String,
    /// Template-supplied properties; absent on some Delete events
    #[serde(default)]
    pub resource_properties: ResourceProperties,
}

/// Outcome reported back to CloudFormation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// Response document PUT to the pre-signed callback URL
///
/// CloudFormation polls the callback location and parses this document to
/// resolve the stack operation, so the field set and casing must match
/// the response contract exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusDocument {
    /// SUCCESS or FAILED
    pub status: ResponseStatus,
    /// Human-readable pointer to the CloudWatch log stream with details
    pub reason: String,
    /// Physical id of the resource; this handler uses the log stream name
    pub physical_resource_id: String,
    /// Echoed from the request
    pub stack_id: String,
    /// Echoed from the request
    pub request_id: String,
    /// Echoed from the request
    pub logical_resource_id: String,
    /// Opaque payload made available to the template via `Fn::GetAtt`;
    /// omitted entirely when not supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl StatusDocument {
    /// Builds a response document for the given request.
    pub fn new(
        event: &CustomResourceRequest,
        status: ResponseStatus,
        log_stream_name: &str,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            status,
            reason: format!("See the details in CloudWatch Log Stream: {log_stream_name}"),
            physical_resource_id: log_stream_name.to_string(),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data,
        }
    }
}
