//! Serializable manager snapshots
//!
//! The verifier and clock are runtime collaborators and are not part of the
//! snapshot; they are supplied again when the manager is restored.

use std::path::Path;

use relay_ledger::{RootLedger, RootTransited};
use relay_primitives::{Principal, Root};
use serde::{Deserialize, Serialize};

use crate::error::{ManagerError, ManagerResult};

/// Settings fixed at `init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentState {
    pub attester: Principal,
    pub origin_id: Principal,
    pub chain_label: String,
    pub owners: Vec<Principal>,
}

/// Full manager snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerState {
    /// Snapshot format version
    pub version: u8,

    /// `None` until `init`
    pub deployment: Option<DeploymentState>,

    pub ledger: RootLedger,

    #[serde(default)]
    pub events: Vec<RootTransited>,
}

impl ManagerState {
    /// Current snapshot format version
    pub const VERSION: u8 = 1;

    /// Reject snapshots of another version or with a broken history
    ///
    /// A non-empty history has exactly one head record and it is the
    /// latest root.
    pub(crate) fn validate(&self) -> ManagerResult<()> {
        if self.version != Self::VERSION {
            return Err(ManagerError::state(format!(
                "Unsupported state version: {}",
                self.version
            )));
        }

        let heads: Vec<Root> = self
            .ledger
            .records()
            .filter(|(_, record)| record.is_head())
            .map(|(root, _)| *root)
            .collect();
        let latest = self.ledger.latest_root().map(|(root, _)| root);

        match (heads.as_slice(), latest) {
            ([], None) if self.ledger.is_empty() => Ok(()),
            ([head], Some(latest)) if *head == latest => Ok(()),
            _ => Err(ManagerError::state(format!(
                "Inconsistent root history: {} head record(s), latest root {}",
                heads.len(),
                latest.map_or_else(|| "none".to_string(), |root| root.to_string())
            ))),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> ManagerResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ManagerError::state(format!("JSON error: {}", e)))
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> ManagerResult<Self> {
        let state: Self = serde_json::from_str(json)
            .map_err(|e| ManagerError::state(format!("JSON error: {}", e)))?;
        state.validate()?;
        Ok(state)
    }

    pub fn load(path: impl AsRef<Path>) -> ManagerResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ManagerError::state(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ManagerResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| ManagerError::state(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ManagerState {
        let mut ledger = RootLedger::new(60);
        let event = ledger
            .apply_transition(Root::from_u64(1), Root::from_u64(2), 10)
            .unwrap();
        ManagerState {
            version: ManagerState::VERSION,
            deployment: Some(DeploymentState {
                attester: Principal::from_bytes([1u8; 20]),
                origin_id: Principal::from_bytes([2u8; 20]),
                chain_label: "sepolia".into(),
                owners: vec![Principal::from_bytes([3u8; 20])],
            }),
            ledger,
            events: vec![event],
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let state = state();
        let restored = ManagerState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_unsupported_version() {
        let mut state = state();
        state.version = 9;
        let json = serde_json::to_string(&state).unwrap();
        assert!(matches!(
            ManagerState::from_json(&json),
            Err(ManagerError::State(msg)) if msg.contains("version")
        ));
    }

    fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> ManagerResult<ManagerState> {
        let mut value = serde_json::to_value(state()).unwrap();
        edit(&mut value);
        ManagerState::from_json(&value.to_string())
    }

    fn root_value(n: u64) -> serde_json::Value {
        serde_json::to_value(Root::from_u64(n)).unwrap()
    }

    fn assert_inconsistent(result: ManagerResult<ManagerState>) {
        assert!(
            matches!(&result, Err(ManagerError::State(msg)) if msg.contains("Inconsistent")),
            "expected inconsistent history, got {:?}",
            result
        );
    }

    #[test]
    fn test_latest_root_not_the_head() {
        assert_inconsistent(tampered(|v| v["ledger"]["latest_root"] = root_value(1)));
    }

    #[test]
    fn test_latest_root_without_record() {
        assert_inconsistent(tampered(|v| v["ledger"]["latest_root"] = root_value(9)));
    }

    #[test]
    fn test_missing_latest_root() {
        assert_inconsistent(tampered(|v| {
            v["ledger"]["latest_root"] = serde_json::Value::Null;
        }));
    }

    #[test]
    fn test_two_heads() {
        assert_inconsistent(tampered(|v| {
            let key = root_value(1).as_str().unwrap().to_string();
            v["ledger"]["records"][key]["replaced_by"] = serde_json::Value::Null;
        }));
    }

    #[test]
    fn test_empty_history_accepted() {
        let mut state = state();
        state.ledger = RootLedger::new(60);
        state.events.clear();
        let restored = ManagerState::from_json(&state.to_json().unwrap()).unwrap();
        assert!(restored.ledger.is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(ManagerState::load("/nonexistent/relay-state.json").is_err());
    }
}
