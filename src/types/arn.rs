//! Amazon Resource Names.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EventSourceError;

/// `arn:<partition>:<service>:<region>:<account>:<resource>`.
///
/// The resource part keeps any further `:` separators, e.g.
/// `function:myFunc` or `function:myFunc:PROD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Arn {
    partition: String,
    service: String,
    region: String,
    account: String,
    resource: String,
}

impl Arn {
    pub fn new(
        partition: impl Into<String>,
        service: impl Into<String>,
        region: impl Into<String>,
        account: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Arn {
            partition: partition.into(),
            service: service.into(),
            region: region.into(),
            account: account.into(),
            resource: resource.into(),
        }
    }

    /// The ARN of a topic, which is fully determined by its name and scope.
    pub fn topic(partition: &str, region: &str, account: &str, topic_name: &str) -> Self {
        Arn::new(partition, SNS_SERVICE, region, account, topic_name)
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

/// Service segment of every topic ARN.
pub const SNS_SERVICE: &str = "sns";

impl Display for Arn {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}

impl FromStr for Arn {
    type Err = EventSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(6, ':');
        let (Some("arn"), Some(partition), Some(service), Some(region), Some(account), Some(resource)) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(EventSourceError::InvalidArn(format!(
                "'{s}' (expected format: arn:partition:service:region:account:resource)"
            )));
        };

        if partition.is_empty() || service.is_empty() || resource.is_empty() {
            return Err(EventSourceError::InvalidArn(format!(
                "'{s}' has an empty partition, service or resource"
            )));
        }

        Ok(Arn::new(partition, service, region, account, resource))
    }
}

impl TryFrom<String> for Arn {
    type Error = EventSourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Arn> for String {
    fn from(arn: Arn) -> Self {
        arn.to_string()
    }
}
