//! Deploy configuration handed over by the host tool.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EventSourceError;

pub const DEFAULT_STAGE: &str = "dev";
pub const DEFAULT_REGION: &str = "us-east-1";

static REGION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").unwrap());

/// Read-only deploy settings.
///
/// Defaults: stage `dev`, region `us-east-1`, mutations allowed. With
/// `no_deploy` set, subscriptions are never created, but permissions are
/// still synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployConfig {
    pub stage: String,
    pub region: String,
    pub no_deploy: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        DeployConfig {
            stage: DEFAULT_STAGE.to_string(),
            region: DEFAULT_REGION.to_string(),
            no_deploy: false,
        }
    }
}

impl DeployConfig {
    pub fn new(
        stage: impl Into<String>,
        region: impl Into<String>,
        no_deploy: bool,
    ) -> Result<Self, EventSourceError> {
        let config = DeployConfig {
            stage: stage.into(),
            region: region.into(),
            no_deploy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse host options such as `{"stage": "prod", "region": "eu-west-1", "noDeploy": true}`.
    /// Missing keys take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, EventSourceError> {
        let config: DeployConfig = serde_json::from_str(text)
            .map_err(|e| EventSourceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EventSourceError> {
        if self.stage.trim().is_empty() {
            return Err(EventSourceError::InvalidConfig(
                "stage must not be empty".to_string(),
            ));
        }
        if !REGION_PATTERN.is_match(&self.region) {
            return Err(EventSourceError::InvalidConfig(format!(
                "'{}' is not a region name (expected e.g. us-east-1)",
                self.region
            )));
        }
        Ok(())
    }

    /// Plan-only mode: no mutating remote calls are permitted.
    pub fn plan_only(&self) -> bool {
        self.no_deploy
    }
}
