use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::DeployConfig;
use crate::error::EventSourceError;
use crate::transport::{
    GetFunction, ListSubscriptionsByTopic, RemoteRequest, Subscription, Transport,
};
use crate::types::{Arn, FunctionDefinition, LAMBDA_PROTOCOL, SubscriptionState};

/// Reads the current relationship between a function and a topic.
#[async_trait]
pub trait SubscriptionInspector: Send + Sync {
    async fn subscription_info(
        &self,
        function: &FunctionDefinition,
        topic_name: &str,
    ) -> Result<SubscriptionState, EventSourceError>;
}

/// Inspector backed by the remote control plane.
///
/// Each inspection issues exactly two reads: the function lookup, then the
/// topic's subscription listing. A failed read ends the inspection.
#[derive(Clone)]
pub struct RemoteInspector {
    transport: Arc<dyn Transport>,
    config: DeployConfig,
}

impl RemoteInspector {
    pub fn new(transport: Arc<dyn Transport>, config: DeployConfig) -> Self {
        RemoteInspector { transport, config }
    }

    async fn read<R: RemoteRequest + Sync>(&self, request: &R) -> Result<R::Response, EventSourceError> {
        let operation = R::OPERATION;
        let service = operation.service();
        let response = self
            .transport
            .request(
                service,
                operation,
                request.params()?,
                &self.config.stage,
                &self.config.region,
            )
            .await
            .map_err(|e| {
                warn!(
                    event = "GetSubscriptionInfo",
                    phase = "Lookup",
                    service = %service,
                    operation = %operation,
                    error = %e
                );
                EventSourceError::lookup(service, operation, e)
            })?;
        R::decode(response)
    }

    async fn function_arn(&self, function: &FunctionDefinition) -> Result<Arn, EventSourceError> {
        let response = self
            .read(&GetFunction {
                function_name: function.name.clone(),
            })
            .await?;
        response.configuration.function_arn.parse()
    }

    async fn subscriptions(&self, topic_arn: &Arn) -> Result<Vec<Subscription>, EventSourceError> {
        let response = self
            .read(&ListSubscriptionsByTopic {
                topic_arn: topic_arn.to_string(),
            })
            .await?;
        Ok(response.subscriptions)
    }
}

#[async_trait]
impl SubscriptionInspector for RemoteInspector {
    async fn subscription_info(
        &self,
        function: &FunctionDefinition,
        topic_name: &str,
    ) -> Result<SubscriptionState, EventSourceError> {
        debug!(
            event = "GetSubscriptionInfo",
            phase = "Start",
            function = function.name,
            topic = topic_name
        );

        let function_arn = self.function_arn(function).await?;
        let topic_arn = Arn::topic(
            function_arn.partition(),
            &self.config.region,
            function_arn.account(),
            topic_name,
        );

        debug!(
            event = "GetSubscriptionInfo",
            phase = "Resolved",
            function_arn = %function_arn,
            topic_arn = %topic_arn
        );

        let subscriptions = self.subscriptions(&topic_arn).await?;
        let subscription_arn = find_function_subscription(&subscriptions, &function_arn)
            .map(|s| s.subscription_arn.clone());

        debug!(
            event = "GetSubscriptionInfo",
            phase = "Result",
            subscription_arn = ?subscription_arn
        );

        Ok(SubscriptionState {
            function_arn,
            topic_arn,
            subscription_arn,
        })
    }
}

/// The first listed subscription delivering to `function_arn` by invocation.
pub fn find_function_subscription<'a>(
    subscriptions: &'a [Subscription],
    function_arn: &Arn,
) -> Option<&'a Subscription> {
    let endpoint = function_arn.to_string();
    subscriptions
        .iter()
        .find(|s| s.protocol == LAMBDA_PROTOCOL && s.endpoint == endpoint)
}
