//! Function and service definitions as declared in the service configuration.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::naming::function_logical_id;

/// Event key that wires a function to an existing topic.
pub const EXTERNAL_SNS_EVENT: &str = "externalSNS";

/// A single entry of a function's `events` list, e.g. `{ "externalSNS": "orders" }`.
///
/// Other event kinds pass through untouched; they belong to the host tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionEvent(pub Map<String, Value>);

impl FunctionEvent {
    pub fn external_sns(topic_name: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(EXTERNAL_SNS_EVENT.to_string(), Value::String(topic_name.into()));
        FunctionEvent(map)
    }

    /// The topic name if this is a non-empty `externalSNS` event.
    pub fn external_sns_topic(&self) -> Option<&str> {
        self.0
            .get(EXTERNAL_SNS_EVENT)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }
}

/// A deployable function as the user declared it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// The deployed function name, used for remote lookups.
    pub name: String,
    #[serde(default)]
    pub events: Vec<FunctionEvent>,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionDefinition {
            name: name.into(),
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: FunctionEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Topics this function subscribes to, in declaration order.
    pub fn external_sns_topics(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(FunctionEvent::external_sns_topic)
    }
}

/// A function's logical key paired with the template resource the packaging
/// pipeline emits for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRef {
    key: String,
    logical_id: String,
}

impl FunctionRef {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let logical_id = function_logical_id(&key);
        FunctionRef { key, logical_id }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Logical name of the function resource, e.g. `MyFuncLambdaFunction`.
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }
}

impl Display for FunctionRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.key)
    }
}

/// The functions of a service, keyed by their logical key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionDefinition>,
}

impl ServiceDefinition {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_function(mut self, key: impl Into<String>, function: FunctionDefinition) -> Self {
        self.functions.insert(key.into(), function);
        self
    }

    /// Every (function key, function, topic) triple declared by the service.
    pub fn external_sns_pairs(&self) -> impl Iterator<Item = (&str, &FunctionDefinition, &str)> {
        self.functions.iter().flat_map(|(key, function)| {
            function
                .external_sns_topics()
                .map(move |topic| (key.as_str(), function, topic))
        })
    }
}
