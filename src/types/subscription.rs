//! Subscription state as observed on the control plane, and what callers ask for.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumString};
use utoipa::ToSchema;

use super::arn::Arn;

/// Protocol value of a subscription that delivers by invoking a function.
pub const LAMBDA_PROTOCOL: &str = "lambda";

/// Point-in-time view of one (function, topic) pair.
///
/// Rebuilt from the control plane on every inspection and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionState {
    #[schema(value_type = String)]
    pub function_arn: Arn,
    #[schema(value_type = String)]
    pub topic_arn: Arn,
    pub subscription_arn: Option<String>,
}

impl SubscriptionState {
    pub fn relationship(&self) -> Relationship {
        match self.subscription_arn {
            Some(_) => Relationship::Linked,
            None => Relationship::Unlinked,
        }
    }
}

impl Display for SubscriptionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.subscription_arn {
            Some(arn) => write!(f, "{} -> {} ({arn})", self.topic_arn, self.function_arn),
            None => write!(f, "{} -/-> {}", self.topic_arn, self.function_arn),
        }
    }
}

/// Whether a topic currently delivers to a function.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, StrumDisplay,
)]
pub enum Relationship {
    Unlinked,
    Linked,
}

/// Desired state for a pair, supplied by the caller at deploy time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    StrumDisplay,
    EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ReconciliationIntent {
    EnsureSubscribed,
    EnsureUnsubscribed,
}

impl ReconciliationIntent {
    pub fn target(&self) -> Relationship {
        match self {
            ReconciliationIntent::EnsureSubscribed => Relationship::Linked,
            ReconciliationIntent::EnsureUnsubscribed => Relationship::Unlinked,
        }
    }
}

/// What a single reconciliation did.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, StrumDisplay,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Plan-only mode; nothing was inspected or changed.
    Skipped,
    /// The pair was already in the desired state.
    Unchanged,
    Subscribed,
    Unsubscribed,
}

impl ReconcileOutcome {
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::Subscribed | ReconcileOutcome::Unsubscribed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn state(subscription_arn: Option<&str>) -> SubscriptionState {
        SubscriptionState {
            function_arn: "arn:aws:lambda:us-west-42:12349:function:myFunc"
                .parse()
                .unwrap(),
            topic_arn: Arn::topic("aws", "us-west-42", "12349", "cooltopic"),
            subscription_arn: subscription_arn.map(str::to_string),
        }
    }

    #[test]
    fn test_relationship() {
        assert_eq!(state(None).relationship(), Relationship::Unlinked);
        assert_eq!(
            state(Some("arn:aws:sns:correct")).relationship(),
            Relationship::Linked
        );
    }

    #[test]
    fn test_state_serializes_like_the_control_plane() {
        let serialized = serde_json::to_value(state(Some("arn:aws:sns:correct"))).unwrap();
        insta::with_settings!({sort_maps => true}, {
            insta::assert_json_snapshot!(serialized, @r#"
            {
              "FunctionArn": "arn:aws:lambda:us-west-42:12349:function:myFunc",
              "SubscriptionArn": "arn:aws:sns:correct",
              "TopicArn": "arn:aws:sns:us-west-42:12349:cooltopic"
            }
            "#);
        });
    }

    #[test]
    fn test_intent_names() {
        assert_eq!(
            ReconciliationIntent::EnsureSubscribed.to_string(),
            "ensure-subscribed"
        );
        assert_eq!(
            ReconciliationIntent::from_str("ensure-unsubscribed").unwrap(),
            ReconciliationIntent::EnsureUnsubscribed
        );
        assert_eq!(
            ReconciliationIntent::EnsureUnsubscribed.target(),
            Relationship::Unlinked
        );
    }

    #[test]
    fn test_outcome_mutated() {
        assert!(ReconcileOutcome::Subscribed.mutated());
        assert!(ReconcileOutcome::Unsubscribed.mutated());
        assert!(!ReconcileOutcome::Unchanged.mutated());
        assert!(!ReconcileOutcome::Skipped.mutated());
    }
}
