//! The permission resource letting one topic invoke one function.

use serde_json::{Value, json};

use crate::template::{ACCOUNT_ID_PSEUDO_PARAMETER, Expr, REGION_PSEUDO_PARAMETER};

use super::function::FunctionRef;

pub const LAMBDA_PERMISSION_TYPE: &str = "AWS::Lambda::Permission";
pub const INVOKE_FUNCTION_ACTION: &str = "lambda:InvokeFunction";
pub const SNS_PRINCIPAL: &str = "sns.amazonaws.com";
pub const SNS_ARN_PREFIX: &str = "arn:aws:sns";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaPermission {
    pub function_name: Expr,
    pub action: String,
    pub principal: String,
    pub source_arn: Expr,
}

impl LambdaPermission {
    /// Grant `topic_name`, in the deploying region and account, the right to
    /// invoke `function`.
    pub fn for_topic(function: &FunctionRef, topic_name: &str) -> Self {
        LambdaPermission {
            function_name: Expr::get_att(function.logical_id(), "Arn"),
            action: INVOKE_FUNCTION_ACTION.to_string(),
            principal: SNS_PRINCIPAL.to_string(),
            source_arn: Expr::join(
                ":",
                vec![
                    Expr::literal(SNS_ARN_PREFIX),
                    Expr::reference(REGION_PSEUDO_PARAMETER),
                    Expr::reference(ACCOUNT_ID_PSEUDO_PARAMETER),
                    Expr::literal(topic_name),
                ],
            ),
        }
    }

    /// The template entry, `{"Type": ..., "Properties": {...}}`.
    pub fn to_resource(&self) -> Value {
        json!({
            "Type": LAMBDA_PERMISSION_TYPE,
            "Properties": {
                "FunctionName": self.function_name.to_value(),
                "Action": self.action,
                "Principal": self.principal,
                "SourceArn": self.source_arn.to_value(),
            }
        })
    }
}
