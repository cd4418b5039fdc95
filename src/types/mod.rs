//! Data model for wiring functions to existing topics.
//!
//! Canonical string forms:
//! - Function resource: `<Key>LambdaFunction`, e.g. `MyFuncLambdaFunction`
//! - Permission resource: `<Key>LambdaPermission<Topic>`, e.g. `MyFuncLambdaPermissionCoolTopic`
//! - Topic ARN: `arn:aws:sns:<region>:<account>:<topicName>`
//!
//! Topic names are scoped implicitly to the deploying region and account and
//! have no representation beyond their string.

mod arn;
mod function;
mod permission;
mod subscription;

pub use arn::{Arn, SNS_SERVICE};
pub use function::{
    EXTERNAL_SNS_EVENT, FunctionDefinition, FunctionEvent, FunctionRef, ServiceDefinition,
};
pub use permission::{
    INVOKE_FUNCTION_ACTION, LAMBDA_PERMISSION_TYPE, LambdaPermission, SNS_ARN_PREFIX,
    SNS_PRINCIPAL,
};
pub use subscription::{
    LAMBDA_PROTOCOL, ReconcileOutcome, ReconciliationIntent, Relationship, SubscriptionState,
};
