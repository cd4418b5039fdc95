//! # external-sns-events
//!
//! Wires serverless functions to publish/subscribe topics that already exist
//! outside the stack.
//!
//! Two phases:
//! - Template build: [`ResourceSynthesizer`] registers an
//!   `AWS::Lambda::Permission` per (function, topic) pair in the shared
//!   template. No network access.
//! - Deploy / remove: [`Reconciler`] inspects the topic's subscriptions
//!   through a [`Transport`] and creates or deletes the function's
//!   subscription, issuing at most one mutation per pair.
//!
//! [`ExternalSnsEvents`] runs both phases over a [`ServiceDefinition`].
pub use config::DeployConfig;
pub use error::{EventSourceError, TransportError};
pub use inspector::{RemoteInspector, SubscriptionInspector};
pub use naming::{normalize, normalize_topic_name};
pub use plugin::{ExternalSnsEvents, PairOutcome};
pub use reconciler::Reconciler;
pub use synthesizer::ResourceSynthesizer;
pub use template::{Expr, ResolveContext, SharedTemplate, Template};
pub use transport::{Operation, Service, Transport};
pub use types::*;

pub mod config;
mod error;
pub mod inspector;
pub mod naming;
mod plugin;
mod reconciler;
mod synthesizer;
pub mod template;
pub mod transport;
mod types;

#[cfg(test)]
mod tests;
