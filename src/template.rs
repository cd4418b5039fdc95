//! The shared CloudFormation template and the deferred values written into it.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Value, json};

pub const REGION_PSEUDO_PARAMETER: &str = "AWS::Region";
pub const ACCOUNT_ID_PSEUDO_PARAMETER: &str = "AWS::AccountId";
pub const PARTITION_PSEUDO_PARAMETER: &str = "AWS::Partition";

/// A template value that may only be known once the stack is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(String),
    Ref(String),
    GetAtt { resource: String, attribute: String },
    Join { separator: String, parts: Vec<Expr> },
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Expr::Ref(name.into())
    }

    pub fn get_att(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Expr::GetAtt {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    pub fn join(separator: impl Into<String>, parts: Vec<Expr>) -> Self {
        Expr::Join {
            separator: separator.into(),
            parts,
        }
    }

    /// The CloudFormation JSON form, e.g. `{"Fn::GetAtt": ["MyFuncLambdaFunction", "Arn"]}`.
    pub fn to_value(&self) -> Value {
        match self {
            Expr::Literal(value) => Value::String(value.clone()),
            Expr::Ref(name) => json!({ "Ref": name }),
            Expr::GetAtt {
                resource,
                attribute,
            } => json!({ "Fn::GetAtt": [resource, attribute] }),
            Expr::Join { separator, parts } => {
                let parts: Vec<Value> = parts.iter().map(Expr::to_value).collect();
                json!({ "Fn::Join": [separator, parts] })
            }
        }
    }

    /// Evaluate the expression the way CloudFormation would at deploy time.
    ///
    /// Returns `None` when a reference or attribute is unknown to `ctx`.
    pub fn resolve(&self, ctx: &ResolveContext) -> Option<String> {
        match self {
            Expr::Literal(value) => Some(value.clone()),
            Expr::Ref(name) => ctx.pseudo_parameter(name),
            Expr::GetAtt {
                resource,
                attribute,
            } => ctx.attribute(resource, attribute).map(str::to_string),
            Expr::Join { separator, parts } => {
                let resolved: Option<Vec<String>> = parts.iter().map(|p| p.resolve(ctx)).collect();
                resolved.map(|parts| parts.iter().join(separator))
            }
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Deploy-time facts used to evaluate an [`Expr`].
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    partition: String,
    region: String,
    account: String,
    attributes: BTreeMap<(String, String), String>,
}

impl ResolveContext {
    pub fn new(region: impl Into<String>, account: impl Into<String>) -> Self {
        ResolveContext {
            partition: "aws".to_string(),
            region: region.into(),
            account: account.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        resource: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes
            .insert((resource.into(), attribute.into()), value.into());
        self
    }

    fn pseudo_parameter(&self, name: &str) -> Option<String> {
        match name {
            REGION_PSEUDO_PARAMETER => Some(self.region.clone()),
            ACCOUNT_ID_PSEUDO_PARAMETER => Some(self.account.clone()),
            PARTITION_PSEUDO_PARAMETER => Some(self.partition.clone()),
            _ => None,
        }
    }

    fn attribute(&self, resource: &str, attribute: &str) -> Option<&str> {
        self.attributes
            .get(&(resource.to_string(), attribute.to_string()))
            .map(String::as_str)
    }
}

/// The compiled template's resource collection.
///
/// Owned by the packaging pipeline; this crate only upserts into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(default)]
    resources: BTreeMap<String, Value>,
}

/// Handle through which the packaging pipeline shares its template.
pub type SharedTemplate = Arc<RwLock<Template>>;

impl Template {
    pub fn new() -> Self {
        Template::default()
    }

    pub fn shared(self) -> SharedTemplate {
        Arc::new(RwLock::new(self))
    }

    /// Insert or overwrite the resource registered under `logical_id`.
    pub fn upsert(&mut self, logical_id: impl Into<String>, resource: Value) {
        self.resources.insert(logical_id.into(), resource);
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Value> {
        self.resources.get(logical_id)
    }

    pub fn resources(&self) -> &BTreeMap<String, Value> {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
