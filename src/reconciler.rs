use std::sync::Arc;

use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::error::EventSourceError;
use crate::inspector::SubscriptionInspector;
use crate::transport::{RemoteRequest, Subscribe, Transport, Unsubscribe};
use crate::types::{
    FunctionDefinition, LAMBDA_PROTOCOL, ReconcileOutcome, ReconciliationIntent,
};

/// Converges the subscription between a function and a topic.
///
/// Each call inspects current state first and then issues at most one
/// mutation. Calls for distinct pairs are independent and may run
/// concurrently; failures are returned, never retried.
#[derive(Clone)]
pub struct Reconciler {
    transport: Arc<dyn Transport>,
    inspector: Arc<dyn SubscriptionInspector>,
    config: DeployConfig,
}

impl Reconciler {
    pub fn new(
        transport: Arc<dyn Transport>,
        inspector: Arc<dyn SubscriptionInspector>,
        config: DeployConfig,
    ) -> Self {
        Reconciler {
            transport,
            inspector,
            config,
        }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub async fn reconcile(
        &self,
        intent: ReconciliationIntent,
        function_key: &str,
        function: &FunctionDefinition,
        topic_name: &str,
    ) -> Result<ReconcileOutcome, EventSourceError> {
        match intent {
            ReconciliationIntent::EnsureSubscribed => {
                self.subscribe_function(function_key, function, topic_name)
                    .await
            }
            ReconciliationIntent::EnsureUnsubscribed => {
                self.unsubscribe_function(function_key, function, topic_name)
                    .await
            }
        }
    }

    /// Make sure `topic_name` delivers to the function.
    ///
    /// In plan-only mode this resolves immediately with
    /// [`ReconcileOutcome::Skipped`] without inspecting anything.
    pub async fn subscribe_function(
        &self,
        function_key: &str,
        function: &FunctionDefinition,
        topic_name: &str,
    ) -> Result<ReconcileOutcome, EventSourceError> {
        if self.config.plan_only() {
            info!(
                event = "SubscribeFunction",
                phase = "Skipped",
                function = function_key,
                topic = topic_name,
                reason = "noDeploy"
            );
            return Ok(ReconcileOutcome::Skipped);
        }

        let state = self.inspector.subscription_info(function, topic_name).await?;

        if let Some(subscription_arn) = &state.subscription_arn {
            info!(
                event = "SubscribeFunction",
                phase = "Exists",
                function = function_key,
                topic = topic_name,
                subscription_arn = subscription_arn.as_str()
            );
            return Ok(ReconcileOutcome::Unchanged);
        }

        info!(
            event = "SubscribeFunction",
            phase = "Subscribe",
            function = function_key,
            topic_arn = %state.topic_arn,
            function_arn = %state.function_arn
        );

        self.mutate(&Subscribe {
            topic_arn: state.topic_arn.to_string(),
            protocol: LAMBDA_PROTOCOL.to_string(),
            endpoint: state.function_arn.to_string(),
        })
        .await?;

        Ok(ReconcileOutcome::Subscribed)
    }

    /// Make sure `topic_name` no longer delivers to the function.
    ///
    /// Always inspects, plan-only mode included.
    pub async fn unsubscribe_function(
        &self,
        function_key: &str,
        function: &FunctionDefinition,
        topic_name: &str,
    ) -> Result<ReconcileOutcome, EventSourceError> {
        let state = self.inspector.subscription_info(function, topic_name).await?;

        let Some(subscription_arn) = state.subscription_arn else {
            info!(
                event = "UnsubscribeFunction",
                phase = "Absent",
                function = function_key,
                topic = topic_name
            );
            return Ok(ReconcileOutcome::Unchanged);
        };

        info!(
            event = "UnsubscribeFunction",
            phase = "Unsubscribe",
            function = function_key,
            topic = topic_name,
            subscription_arn = subscription_arn.as_str()
        );

        self.mutate(&Unsubscribe { subscription_arn }).await?;

        Ok(ReconcileOutcome::Unsubscribed)
    }

    async fn mutate<R: RemoteRequest + Sync>(&self, request: &R) -> Result<(), EventSourceError> {
        let operation = R::OPERATION;
        let service = operation.service();
        self.transport
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
                    event = "Reconcile",
                    phase = "Mutation",
                    service = %service,
                    operation = %operation,
                    error = %e
                );
                EventSourceError::mutation(service, operation, e)
            })?;
        Ok(())
    }
}
