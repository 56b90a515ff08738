//! Store state and its persisted snapshot

use crate::session::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage key holding the serialized [`Snapshot`]
pub const STORE_KEY: &str = "data-store";

/// Storage key holding the raw bearer token
pub const TOKEN_KEY: &str = "token";

/// A cached server payload and the sequence number of the request that
/// produced it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cached {
    pub value: Value,
    applied: u64,
}

impl Cached {
    pub fn new(value: Value) -> Self {
        Self { value, applied: 0 }
    }

    /// Apply the response of request `seq`.
    ///
    /// Returns false, leaving the cache alone, when a response from a later
    /// request has already been applied.
    pub fn apply(&mut self, seq: u64, value: Value) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.value = value;
        self.applied = seq;
        true
    }

    /// True while nothing issued after request `seq` has replaced or reset
    /// the value
    pub fn unchanged_since(&self, seq: u64) -> bool {
        self.applied <= seq
    }

    /// Drop the cached value and reject every response older than `seq`
    pub fn reset(&mut self, seq: u64) {
        self.value = Value::Null;
        self.applied = self.applied.max(seq);
    }
}

/// In-memory state owned by the store
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub session: Session,
    pub profile: Cached,
    pub team: Cached,
}

impl StoreState {
    /// Set `role_name` on the cached profile.
    ///
    /// A profile that is not a JSON object is replaced by one holding only
    /// the role.
    pub fn patch_role(&mut self, role: Value) {
        match self.profile.value.as_object_mut() {
            Some(profile) => {
                profile.insert("role_name".to_string(), role);
            }
            None => {
                self.profile.value = serde_json::json!({ "role_name": role });
            }
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            token: self.session.token().unwrap_or_default().to_string(),
            user_info: self.profile.value.clone(),
            user_team: self.team.value.clone(),
            saved_at: Some(Utc::now()),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            session: Session::from_token(snapshot.token),
            profile: Cached::new(snapshot.user_info),
            team: Cached::new(snapshot.user_team),
        }
    }
}

/// Persisted shape of the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub token: String,
    #[serde(rename = "userInfo", default)]
    pub user_info: Value,
    #[serde(rename = "UserTeam", default)]
    pub user_team: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cached_rejects_older_responses() {
        let mut cached = Cached::default();

        assert!(cached.apply(2, json!({"v": 2})));
        assert!(!cached.apply(1, json!({"v": 1})));
        assert_eq!(cached.value, json!({"v": 2}));

        assert!(cached.apply(3, json!({"v": 3})));
        assert_eq!(cached.value, json!({"v": 3}));
    }

    #[test]
    fn test_cached_reset() {
        let mut cached = Cached::default();
        cached.apply(1, json!({"v": 1}));

        cached.reset(5);
        assert_eq!(cached.value, Value::Null);
        assert!(!cached.apply(4, json!({"v": 4})));
        assert!(cached.apply(6, json!({"v": 6})));
    }

    #[test]
    fn test_unchanged_since() {
        let mut cached = Cached::default();
        assert!(cached.unchanged_since(0));

        cached.apply(1, json!({"v": 1}));
        assert!(cached.unchanged_since(1));
        assert!(!cached.unchanged_since(0));

        cached.reset(3);
        assert!(!cached.unchanged_since(1));
    }

    #[test]
    fn test_patch_role_keeps_other_fields() {
        let mut state = StoreState {
            profile: Cached::new(json!({"username": "alice", "role_name": "user"})),
            ..Default::default()
        };

        state.patch_role(json!("admin"));
        assert_eq!(
            state.profile.value,
            json!({"username": "alice", "role_name": "admin"})
        );
    }

    #[test]
    fn test_patch_role_on_empty_profile() {
        let mut state = StoreState::default();
        state.patch_role(json!("jury"));
        assert_eq!(state.profile.value, json!({"role_name": "jury"}));
    }

    #[test]
    fn test_snapshot_field_names() {
        let state = StoreState {
            session: Session::from_token("abc"),
            profile: Cached::new(json!({"role": "member"})),
            team: Cached::new(json!([{"team_name": "alpha"}])),
        };

        let json = serde_json::to_value(state.to_snapshot()).unwrap();
        assert_eq!(json["token"], "abc");
        assert_eq!(json["userInfo"], json!({"role": "member"}));
        assert_eq!(json["UserTeam"], json!([{"team_name": "alpha"}]));
    }

    #[test]
    fn test_snapshot_round_trip_through_state() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "token": "",
            "userInfo": {"role": "member"}
        }))
        .unwrap();

        let state = StoreState::from_snapshot(snapshot);
        assert_eq!(state.session, Session::Anonymous);
        assert_eq!(state.profile.value, json!({"role": "member"}));
        assert_eq!(state.team.value, Value::Null);
    }
}
