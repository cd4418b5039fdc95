//! Entry point tying synthesis and reconciliation to a service definition.

use std::sync::Arc;

use futures::future::join_all;
use itertools::Itertools;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::error::EventSourceError;
use crate::inspector::{RemoteInspector, SubscriptionInspector};
use crate::reconciler::Reconciler;
use crate::synthesizer::ResourceSynthesizer;
use crate::template::SharedTemplate;
use crate::transport::Transport;
use crate::types::{FunctionDefinition, ReconcileOutcome, ReconciliationIntent, ServiceDefinition};

/// Result of reconciling one declared (function, topic) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairOutcome {
    pub function_key: String,
    pub topic_name: String,
    pub outcome: ReconcileOutcome,
}

/// Wires every `externalSNS` event of a service.
///
/// Collaborators are handed in explicitly: the packaging pipeline's template,
/// the control-plane transport and the deploy configuration.
#[derive(Clone)]
pub struct ExternalSnsEvents {
    synthesizer: ResourceSynthesizer,
    reconciler: Reconciler,
}

impl ExternalSnsEvents {
    pub fn new(template: SharedTemplate, transport: Arc<dyn Transport>, config: DeployConfig) -> Self {
        let inspector = Arc::new(RemoteInspector::new(transport.clone(), config.clone()));
        ExternalSnsEvents::with_inspector(template, transport, inspector, config)
    }

    /// Like [`ExternalSnsEvents::new`], with a caller-supplied inspector.
    pub fn with_inspector(
        template: SharedTemplate,
        transport: Arc<dyn Transport>,
        inspector: Arc<dyn SubscriptionInspector>,
        config: DeployConfig,
    ) -> Self {
        ExternalSnsEvents {
            synthesizer: ResourceSynthesizer::new(template),
            reconciler: Reconciler::new(transport, inspector, config),
        }
    }

    pub fn synthesizer(&self) -> &ResourceSynthesizer {
        &self.synthesizer
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Template-build phase: register a permission for every declared pair.
    pub fn compile_events(&self, service: &ServiceDefinition) -> usize {
        let mut compiled = 0;
        for (key, function, topic) in declared_pairs(service) {
            self.synthesizer.add_event_permission(key, function, topic);
            compiled += 1;
        }
        info!(event = "CompileEvents", phase = "Done", permissions = compiled);
        compiled
    }

    /// Deploy phase: make sure every declared pair is subscribed.
    pub async fn deploy(
        &self,
        service: &ServiceDefinition,
    ) -> Result<Vec<PairOutcome>, EventSourceError> {
        self.reconcile_all(service, ReconciliationIntent::EnsureSubscribed)
            .await
    }

    /// Removal phase: make sure no declared pair is left subscribed.
    pub async fn remove(
        &self,
        service: &ServiceDefinition,
    ) -> Result<Vec<PairOutcome>, EventSourceError> {
        self.reconcile_all(service, ReconciliationIntent::EnsureUnsubscribed)
            .await
    }

    /// Reconcile all pairs concurrently. Every pair settles before the first
    /// failure, in declaration order, is returned.
    ///
    /// A pair declared more than once is reconciled once, so no two pipelines
    /// ever inspect and mutate the same subscription at the same time.
    async fn reconcile_all(
        &self,
        service: &ServiceDefinition,
        intent: ReconciliationIntent,
    ) -> Result<Vec<PairOutcome>, EventSourceError> {
        let pairs: Vec<_> = declared_pairs(service).collect();
        let results = join_all(pairs.iter().map(|(key, function, topic)| {
            self.reconciler.reconcile(intent, key, function, topic)
        }))
        .await;

        let mut outcomes = Vec::with_capacity(pairs.len());
        let mut first_error = None;
        for ((key, _, topic), result) in pairs.into_iter().zip(results) {
            match result {
                Ok(outcome) => outcomes.push(PairOutcome {
                    function_key: key.to_string(),
                    topic_name: topic.to_string(),
                    outcome,
                }),
                Err(err) => {
                    warn!(
                        event = "Reconcile",
                        phase = "Failed",
                        intent = %intent,
                        function = key,
                        topic = topic,
                        error = %err
                    );
                    first_error.get_or_insert(err);
                }
            }
        }

        info!(
            event = "Reconcile",
            phase = "Done",
            intent = %intent,
            desired = %intent.target(),
            plan_only = self.reconciler.config().plan_only(),
            settled = outcomes.len(),
            mutated = outcomes.iter().filter(|p| p.outcome.mutated()).count(),
            failed = first_error.is_some()
        );

        match first_error {
            Some(err) => Err(err),
            None => Ok(outcomes),
        }
    }
}

/// Declared (function key, function, topic) triples, first declaration wins.
fn declared_pairs(
    service: &ServiceDefinition,
) -> impl Iterator<Item = (&str, &FunctionDefinition, &str)> {
    service
        .external_sns_pairs()
        .unique_by(|(key, _, topic)| (*key, *topic))
}
