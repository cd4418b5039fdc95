//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{EventSourceError, TransportError};
use crate::inspector::SubscriptionInspector;
use crate::transport::{Operation, Service, Transport};
use crate::types::{Arn, FunctionDefinition, SubscriptionState};


#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub service: Service,
    pub operation: Operation,
    pub params: Value,
    pub stage: String,
    pub region: String,
}

/// Answers only the exact calls it was primed with and rejects anything else.
pub struct StubTransport {
    stage: String,
    region: String,
    responses: Vec<(Service, Operation, Value, Value)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubTransport {
    pub fn new(stage: &str, region: &str) -> Self {
        StubTransport {
            stage: stage.to_string(),
            region: region.to_string(),
            responses: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(
        mut self,
        service: Service,
        operation: Operation,
        params: Value,
        response: Value,
    ) -> Self {
        self.responses.push((service, operation, params, response));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.operation.is_mutation())
            .count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn request(
        &self,
        service: Service,
        operation: Operation,
        params: Value,
        stage: &str,
        region: &str,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            service,
            operation,
            params: params.clone(),
            stage: stage.to_string(),
            region: region.to_string(),
        });

        if stage == self.stage && region == self.region {
            for (s, o, p, response) in &self.responses {
                if *s == service && *o == operation && *p == params {
                    return Ok(response.clone());
                }
            }
        }

        Err(TransportError::new(format!(
            "Call to request() with unexpected arguments: {service} {operation} {params} {stage} {region}"
        )))
    }
}

/// Inspector returning a fixed state, counting how often it was asked.
pub struct FixedInspector {
    state: SubscriptionState,
    calls: Mutex<Vec<(FunctionDefinition, String)>>,
}

impl FixedInspector {
    pub fn new(subscription_arn: Option<&str>) -> Self {
        FixedInspector {
            state: SubscriptionState {
                function_arn: "arn:aws:lambda:us-west-42:12349:function:some-func"
                    .parse()
                    .unwrap(),
                topic_arn: Arn::topic("aws", "us-west-42", "12349", "some-topic"),
                subscription_arn: subscription_arn.map(str::to_string),
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> &SubscriptionState {
        &self.state
    }

    pub fn calls(&self) -> Vec<(FunctionDefinition, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriptionInspector for FixedInspector {
    async fn subscription_info(
        &self,
        function: &FunctionDefinition,
        topic_name: &str,
    ) -> Result<SubscriptionState, EventSourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((function.clone(), topic_name.to_string()));
        Ok(self.state.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredSubscription {
    pub topic_arn: String,
    pub protocol: String,
    pub endpoint: String,
    pub subscription_arn: String,
}

/// A control plane that actually keeps subscriptions between calls.
pub struct InMemoryControlPlane {
    account: String,
    region: String,
    functions: Vec<String>,
    subscriptions: Mutex<Vec<StoredSubscription>>,
    next_id: AtomicUsize,
    mutations: AtomicUsize,
}

impl InMemoryControlPlane {
    pub fn new(region: &str, account: &str) -> Self {
        InMemoryControlPlane {
            account: account.to_string(),
            region: region.to_string(),
            functions: Vec::new(),
            subscriptions: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            mutations: AtomicUsize::new(0),
        }
    }

    pub fn with_function(mut self, name: &str) -> Self {
        self.functions.push(name.to_string());
        self
    }

    pub fn function_arn(&self, name: &str) -> String {
        format!(
            "arn:aws:lambda:{}:{}:function:{name}",
            self.region, self.account
        )
    }

    pub fn subscriptions(&self) -> Vec<StoredSubscription> {
        self.subscriptions.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn param<'a>(params: &'a Value, key: &str) -> Result<&'a str, TransportError> {
        params[key]
            .as_str()
            .ok_or_else(|| TransportError::new(format!("missing parameter {key}")))
    }
}

#[async_trait]
impl Transport for InMemoryControlPlane {
    async fn request(
        &self,
        _service: Service,
        operation: Operation,
        params: Value,
        _stage: &str,
        _region: &str,
    ) -> Result<Value, TransportError> {
        match operation {
            Operation::GetFunction => {
                let name = Self::param(&params, "FunctionName")?;
                if !self.functions.iter().any(|f| f == name) {
                    return Err(TransportError::new(format!("Function not found: {name}")));
                }
                Ok(json!({ "Configuration": { "FunctionArn": self.function_arn(name) } }))
            }
            Operation::ListSubscriptionsByTopic => {
                let topic_arn = Self::param(&params, "TopicArn")?;
                let listed: Vec<Value> = self
                    .subscriptions
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|s| s.topic_arn == topic_arn)
                    .map(|s| {
                        json!({
                            "Protocol": s.protocol,
                            "Endpoint": s.endpoint,
                            "SubscriptionArn": s.subscription_arn,
                            "TopicArn": s.topic_arn,
                        })
                    })
                    .collect();
                Ok(json!({ "Subscriptions": listed }))
            }
            Operation::Subscribe => {
                self.mutations.fetch_add(1, Ordering::SeqCst);
                let topic_arn = Self::param(&params, "TopicArn")?;
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let subscription_arn = format!("{topic_arn}:sub-{id}");
                self.subscriptions.lock().unwrap().push(StoredSubscription {
                    topic_arn: topic_arn.to_string(),
                    protocol: Self::param(&params, "Protocol")?.to_string(),
                    endpoint: Self::param(&params, "Endpoint")?.to_string(),
                    subscription_arn: subscription_arn.clone(),
                });
                Ok(json!({ "SubscriptionArn": subscription_arn }))
            }
            Operation::Unsubscribe => {
                self.mutations.fetch_add(1, Ordering::SeqCst);
                let subscription_arn = Self::param(&params, "SubscriptionArn")?;
                let mut subscriptions = self.subscriptions.lock().unwrap();
                let before = subscriptions.len();
                subscriptions.retain(|s| s.subscription_arn != subscription_arn);
                if subscriptions.len() == before {
                    return Err(TransportError::new(format!(
                        "Subscription does not exist: {subscription_arn}"
                    )));
                }
                Ok(json!({}))
            }
        }
    }
}

/// Yields to the executor before forwarding each call, so concurrently
/// reconciled pairs interleave the way they do against a real network.
pub struct SuspendingTransport<T> {
    inner: Arc<T>,
}

impl<T: Transport + 'static> SuspendingTransport<T> {
    pub fn wrap(inner: Arc<T>) -> Arc<dyn Transport> {
        Arc::new(SuspendingTransport { inner })
    }
}

#[async_trait]
impl<T: Transport> Transport for SuspendingTransport<T> {
    async fn request(
        &self,
        service: Service,
        operation: Operation,
        params: Value,
        stage: &str,
        region: &str,
    ) -> Result<Value, TransportError> {
        tokio::task::yield_now().await;
        self.inner
            .request(service, operation, params, stage, region)
            .await
    }
}
