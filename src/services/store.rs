use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::models::UserSkillProfile;

/// Errors that can occur while reading member records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid or missing database credentials")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to read seed file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    SeedError(#[from] serde_json::Error),
}

/// Read-only source of member skill profiles
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every member, in store order
    async fn fetch_users(&self) -> Result<Vec<UserSkillProfile>, StoreError>;

    /// One member by id; `None` when the id is unknown
    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserSkillProfile>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;

    /// Short name used in logs and cache keys
    fn backend_name(&self) -> &'static str;
}

/// Decode one stored record, taking the id from its key
pub fn decode_profile(id: &str, record: Value) -> Result<UserSkillProfile, serde_json::Error> {
    let mut profile: UserSkillProfile = serde_json::from_value(record)?;
    profile.id = id.to_string();
    Ok(profile)
}

/// Decode a `users` snapshot as exported by the Realtime Database
///
/// Accepts `null` (no members), an object keyed by member id, or the array
/// form the database returns when every key is a small integer. Records that
/// cannot be decoded are skipped with a warning. Object keys follow the
/// database's ordering: integer keys ascending first, then the rest
/// lexicographically.
pub fn profiles_from_snapshot(snapshot: Value) -> Vec<UserSkillProfile> {
    let records: Vec<(String, Value)> = match snapshot {
        Value::Null => Vec::new(),
        Value::Object(map) => {
            let mut records: Vec<(String, Value)> = map.into_iter().collect();
            records.sort_by(|(a, _), (b, _)| firebase_key_order(a, b));
            records
        }
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, record)| !record.is_null())
            .map(|(idx, record)| (idx.to_string(), record))
            .collect(),
        other => {
            tracing::warn!("Ignoring users snapshot of unexpected type: {}", json_type(&other));
            Vec::new()
        }
    };

    records
        .into_iter()
        .filter(|(id, _)| !id.is_empty())
        .filter_map(|(id, record)| match decode_profile(&id, record) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Skipping malformed user record {}: {}", id, e);
                None
            }
        })
        .collect()
}

fn firebase_key_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<i32>(), b.parse::<i32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Member store held in memory
///
/// Used for local development (seeded from a database export) and tests.
/// Members are unique by id; a repeated id replaces the earlier record in
/// place.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Vec<UserSkillProfile>,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<UserSkillProfile>) -> Self {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut unique: Vec<UserSkillProfile> = Vec::with_capacity(users.len());

        for user in users {
            match positions.get(&user.id) {
                Some(&idx) => unique[idx] = user,
                None => {
                    positions.insert(user.id.clone(), unique.len());
                    unique.push(user);
                }
            }
        }

        Self { users: unique }
    }

    /// Load a JSON export, either the whole database (`{"users": {...}}`)
    /// or just the `users` node
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut root: Value = serde_json::from_str(&raw)?;

        let has_users_node = root
            .get("users")
            .map_or(false, |users| users.is_object() || users.is_array());
        let snapshot = if has_users_node { root["users"].take() } else { root };

        let users = profiles_from_snapshot(snapshot);
        tracing::info!("Loaded {} users from seed file {}", users.len(), path.as_ref().display());

        Ok(Self::new(users))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn fetch_users(&self) -> Result<Vec<UserSkillProfile>, StoreError> {
        Ok(self.users.clone())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserSkillProfile>, StoreError> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_snapshot_object_order() {
        let users = profiles_from_snapshot(json!({
            "zed": { "skillsOffered": ["Rust"] },
            "10": {},
            "2": {},
            "alice": { "skillsWanted": ["Go"] }
        }));

        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "10", "alice", "zed"]);
        assert_eq!(users[3].skills_offered, vec!["Rust"]);
    }

    #[test]
    fn test_snapshot_array_and_null() {
        let users = profiles_from_snapshot(json!([null, { "skillsOffered": ["Yoga"] }]));
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "1");

        assert!(profiles_from_snapshot(Value::Null).is_empty());
        assert!(profiles_from_snapshot(json!("oops")).is_empty());
    }

    #[test]
    fn test_snapshot_skips_only_unreadable_records() {
        let users = profiles_from_snapshot(json!({
            "good": { "skillsOffered": ["Yoga"] },
            "bad": "not a record",
            "worse": { "location": 42, "skillsWanted": ["Yoga"] }
        }));

        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["good", "worse"]);
        assert_eq!(users[1].city(), None);
        assert_eq!(users[1].skills_wanted, vec!["Yoga"]);
    }

    #[test]
    fn test_malformed_fields_keep_member_in_pairing() {
        let users = profiles_from_snapshot(json!({
            "a": { "skillsOffered": ["Python"], "skillsWanted": ["Guitar"], "location": "Denver" },
            "b": { "skillsOffered": ["Guitar"], "skillsWanted": ["Python"], "location": { "city": 80202 } },
            "c": { "id": 7, "skillsOffered": ["Guitar"], "skillsWanted": ["Python"] },
            "d": { "skillsOffered": ["Guitar"], "skillsWanted": ["Python"], "location": { "city": "Denver" } }
        }));

        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);

        let pairs = crate::core::Matcher::with_standard_taxonomy().find_exchange_pairs(&users, 10, 20);
        let partners: Vec<&str> = pairs
            .iter()
            .filter(|p| p.user_a.id == "a")
            .map(|p| p.user_b.id.as_str())
            .collect();
        assert_eq!(partners, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_key_overrides_stored_id() {
        let profile = decode_profile("key-1", json!({ "id": "stale" })).unwrap();
        assert_eq!(profile.id, "key-1");
    }

    #[test]
    fn test_in_memory_dedup_keeps_position() {
        let store = InMemoryUserStore::new(vec![
            UserSkillProfile::new("a").offering(["Old"]),
            UserSkillProfile::new("b"),
            UserSkillProfile::new("a").offering(["New"]),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.users[0].id, "a");
        assert_eq!(store.users[0].skills_offered, vec!["New"]);
    }

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let store = InMemoryUserStore::new(vec![UserSkillProfile::new("a")]);

        assert!(store.fetch_user("a").await.unwrap().is_some());
        assert!(store.fetch_user("missing").await.unwrap().is_none());
        assert_eq!(store.fetch_users().await.unwrap().len(), 1);
        assert!(store.health_check().await.unwrap());
    }

    #[test]
    fn test_seed_file_with_users_node() {
        let path = std::env::temp_dir().join(format!("guru-seed-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"users": {{"u1": {{"skillsOffered": ["Pottery"], "email": "x@y.z"}}}}, "bookings": {{}}}}"#
        )
        .unwrap();

        let store = InMemoryUserStore::from_seed_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(store.len(), 1);
        assert_eq!(store.users[0].skills_offered, vec!["Pottery"]);
    }

    #[test]
    fn test_seed_file_missing() {
        let err = InMemoryUserStore::from_seed_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, StoreError::IoError(_)));
    }
}
