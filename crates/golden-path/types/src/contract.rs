//! Cross-zone contracts
//!
//! The platform is split into three zones. Zone 1 (admin back office) is the
//! canonical hub: every hand-off between the portal and the public websites
//! goes through it. A [`ContractRef`] declares one such hand-off together
//! with the keys that correlate the records on both sides.

use crate::GoldenPathError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Platform zone
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    /// Admin back office, the hub
    #[serde(rename = "Z1")]
    Admin,
    /// Tenant portal
    #[serde(rename = "Z2")]
    Portal,
    /// Public websites and landing pages
    #[serde(rename = "Z3")]
    Website,
}

impl Zone {
    /// The zone every cross-boundary hand-off is routed through
    pub const HUB: Zone = Zone::Admin;

    pub fn code(&self) -> &'static str {
        match self {
            Self::Admin => "Z1",
            Self::Portal => "Z2",
            Self::Website => "Z3",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Zone {
    type Err = GoldenPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Z1" => Ok(Self::Admin),
            "Z2" => Ok(Self::Portal),
            "Z3" => Ok(Self::Website),
            other => Err(GoldenPathError::InvalidDirection(format!(
                "unknown zone '{}'",
                other
            ))),
        }
    }
}

// ── Direction ────────────────────────────────────────────────────────

/// Direction of a contract hand-off, written `"Z3->Z1"`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractDirection {
    pub from: Zone,
    pub to: Zone,
}

impl ContractDirection {
    pub const fn new(from: Zone, to: Zone) -> Self {
        Self { from, to }
    }

    /// Exactly one side is the hub
    pub fn routes_through_hub(&self) -> bool {
        self.from != self.to && (self.from == Zone::HUB || self.to == Zone::HUB)
    }

    /// Neither side is the hub: a direct zone-to-zone reference
    pub fn bypasses_hub(&self) -> bool {
        self.from != self.to && self.from != Zone::HUB && self.to != Zone::HUB
    }
}

impl std::fmt::Display for ContractDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

impl FromStr for ContractDirection {
    type Err = GoldenPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once("->")
            .ok_or_else(|| GoldenPathError::InvalidDirection(s.to_string()))?;
        Ok(Self {
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

impl TryFrom<String> for ContractDirection {
    type Error = GoldenPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContractDirection> for String {
    fn from(direction: ContractDirection) -> Self {
        direction.to_string()
    }
}

// ── Contract Reference ───────────────────────────────────────────────

/// A declared cross-boundary data dependency of a step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    /// Contract key, e.g. `CONTRACT_FINANCE_Z3_SUBMIT`
    pub key: String,
    pub direction: ContractDirection,
    /// Keys correlating the records on both sides of the hand-off
    #[serde(default)]
    pub correlation_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ContractRef {
    pub fn new(key: impl Into<String>, direction: ContractDirection) -> Self {
        Self {
            key: key.into(),
            direction,
            correlation_keys: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_correlation_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.correlation_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        let dir: ContractDirection = "Z3->Z1".parse().unwrap();
        assert_eq!(dir, ContractDirection::new(Zone::Website, Zone::Admin));
        assert_eq!(dir.to_string(), "Z3->Z1");
    }

    #[test]
    fn test_parse_direction_invalid() {
        assert!("Z3=>Z1".parse::<ContractDirection>().is_err());
        assert!("Z4->Z1".parse::<ContractDirection>().is_err());
    }

    #[test]
    fn test_hub_routing() {
        assert!(ContractDirection::new(Zone::Portal, Zone::Admin).routes_through_hub());
        assert!(ContractDirection::new(Zone::Admin, Zone::Website).routes_through_hub());
        assert!(ContractDirection::new(Zone::Portal, Zone::Website).bypasses_hub());
        assert!(ContractDirection::new(Zone::Website, Zone::Portal).bypasses_hub());

        let same = ContractDirection::new(Zone::Admin, Zone::Admin);
        assert!(!same.routes_through_hub());
        assert!(!same.bypasses_hub());
    }

    #[test]
    fn test_contract_ref_serde() {
        let json = r#"{
            "key": "CONTRACT_FINANCE_Z3_SUBMIT",
            "direction": "Z3->Z1",
            "correlation_keys": ["finance_request_id", "tenant_id"]
        }"#;
        let contract: ContractRef = serde_json::from_str(json).unwrap();
        assert_eq!(contract.direction.from, Zone::Website);
        assert_eq!(contract.correlation_keys.len(), 2);

        let back = serde_json::to_value(&contract).unwrap();
        assert_eq!(back["direction"], "Z3->Z1");
    }

    #[test]
    fn test_contract_ref_unknown_direction_fails_to_load() {
        let json = r#"{"key": "X", "direction": "Z9->Z1"}"#;
        assert!(serde_json::from_str::<ContractRef>(json).is_err());
    }
}
