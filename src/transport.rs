//! The remote control-plane capability and the payloads exchanged over it.
//!
//! The core only knows four operations across two services. Retries, auth,
//! throttling and timeouts all live beneath [`Transport::request`]; a request
//! that never completes blocks the reconciliation of its pair indefinitely.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::{EventSourceError, TransportError};

/// Remote service addressed by a request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum Service {
    Lambda,
    #[strum(serialize = "SNS")]
    #[serde(rename = "SNS")]
    Sns,
}

/// Remote operation, named the way the control plane names it on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    GetFunction,
    ListSubscriptionsByTopic,
    Subscribe,
    Unsubscribe,
}

impl Operation {
    pub fn service(&self) -> Service {
        match self {
            Operation::GetFunction => Service::Lambda,
            Operation::ListSubscriptionsByTopic | Operation::Subscribe | Operation::Unsubscribe => {
                Service::Sns
            }
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, Operation::Subscribe | Operation::Unsubscribe)
    }
}

/// Capability for issuing requests against the remote control plane.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        service: Service,
        operation: Operation,
        params: Value,
        stage: &str,
        region: &str,
    ) -> Result<Value, TransportError>;
}

/// A typed request payload, bound to the operation it belongs to.
pub trait RemoteRequest: Serialize {
    const OPERATION: Operation;
    type Response: DeserializeOwned;

    fn params(&self) -> Result<Value, EventSourceError> {
        serde_json::to_value(self)
            .map_err(|e| EventSourceError::decode(Self::OPERATION.service(), Self::OPERATION, e))
    }

    fn decode(response: Value) -> Result<Self::Response, EventSourceError> {
        serde_json::from_value(response)
            .map_err(|e| EventSourceError::decode(Self::OPERATION.service(), Self::OPERATION, e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFunction {
    pub function_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFunctionResponse {
    pub configuration: FunctionConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionConfiguration {
    pub function_arn: String,
}

impl RemoteRequest for GetFunction {
    const OPERATION: Operation = Operation::GetFunction;
    type Response = GetFunctionResponse;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListSubscriptionsByTopic {
    pub topic_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListSubscriptionsByTopicResponse {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

/// One entry of a topic's subscription listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscription {
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub subscription_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_arn: Option<String>,
}

impl RemoteRequest for ListSubscriptionsByTopic {
    const OPERATION: Operation = Operation::ListSubscriptionsByTopic;
    type Response = ListSubscriptionsByTopicResponse;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscribe {
    pub topic_arn: String,
    pub protocol: String,
    pub endpoint: String,
}

impl RemoteRequest for Subscribe {
    const OPERATION: Operation = Operation::Subscribe;
    type Response = Value;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Unsubscribe {
    pub subscription_arn: String,
}

impl RemoteRequest for Unsubscribe {
    const OPERATION: Operation = Operation::Unsubscribe;
    type Response = Value;
}
