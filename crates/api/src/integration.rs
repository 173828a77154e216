use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeartbeatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub will_expire_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What an enable/disable request applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Integration,
    Policy,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Integration => "integration",
            ResourceKind::Policy => "policy",
        }
    }

    pub(crate) fn path(&self) -> &'static str {
        match self {
            ResourceKind::Integration => "/v1/json/integration",
            ResourceKind::Policy => "/v1/json/alert/policy",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "integration" => Ok(ResourceKind::Integration),
            "policy" => Ok(ResourceKind::Policy),
            other => Err(format!(
                "Invalid type '{other}'. Must be one of: integration, policy"
            )),
        }
    }
}

/// Identifies the integration or policy to enable or disable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToggleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
