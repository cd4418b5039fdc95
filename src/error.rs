use thiserror::Error;

use crate::transport::{Operation, Service};

/// Failure reported by the remote control-plane transport.
///
/// The core never inspects the message; it only wraps it into a lookup or
/// mutation failure so the orchestrator can print it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EventSourceError {
    #[error("{service}.{operation} lookup failed: {source}")]
    LookupFailure {
        service: Service,
        operation: Operation,
        #[source]
        source: TransportError,
    },

    #[error("{service}.{operation} mutation failed: {source}")]
    MutationFailure {
        service: Service,
        operation: Operation,
        #[source]
        source: TransportError,
    },

    #[error("{service}.{operation} returned an unexpected response: {message}")]
    Decode {
        service: Service,
        operation: Operation,
        message: String,
    },

    #[error("Invalid ARN: {0}")]
    InvalidArn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EventSourceError {
    pub(crate) fn lookup(service: Service, operation: Operation, source: TransportError) -> Self {
        EventSourceError::LookupFailure {
            service,
            operation,
            source,
        }
    }

    pub(crate) fn mutation(service: Service, operation: Operation, source: TransportError) -> Self {
        EventSourceError::MutationFailure {
            service,
            operation,
            source,
        }
    }

    pub(crate) fn decode(service: Service, operation: Operation, err: serde_json::Error) -> Self {
        EventSourceError::Decode {
            service,
            operation,
            message: err.to_string(),
        }
    }

    /// True for failures of a remote read, including reads whose response
    /// did not carry what the lookup needed.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            EventSourceError::LookupFailure { .. }
                | EventSourceError::Decode { .. }
                | EventSourceError::InvalidArn(_)
        )
    }

    pub fn is_mutation_failure(&self) -> bool {
        matches!(self, EventSourceError::MutationFailure { .. })
    }
}
