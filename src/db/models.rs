use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub display_name: String,
    pub points: i64,
}

/// Body of an upsert.
///
/// Each field has three states: omitted (`None`) keeps the stored value,
/// `null` (`Some(None)`) resets it to the default, and a value overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, deserialize_with = "present")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub points: Option<Option<i64>>,
}

/// Only called for keys that appear in the body, so a `null` stays distinct
/// from a missing key.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UserPatch {
    /// Merges the patch over `existing`, or over a fresh default record.
    pub fn apply(self, username: &str, existing: Option<User>) -> User {
        let base = existing.unwrap_or_else(|| User {
            username: username.to_string(),
            display_name: String::new(),
            points: 0,
        });

        User {
            username: base.username,
            display_name: match self.display_name {
                Some(value) => value.unwrap_or_default(),
                None => base.display_name,
            },
            points: match self.points {
                Some(value) => value.unwrap_or_default(),
                None => base.points,
            },
        }
    }
}

pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(AppError::validation("username must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            username: "alice".to_string(),
            display_name: "Alice".to_string(),
            points: 10,
        }
    }

    #[test]
    fn test_apply_fills_defaults_on_create() {
        let user = UserPatch::default().apply("bob", None);
        assert_eq!(user.username, "bob");
        assert_eq!(user.display_name, "");
        assert_eq!(user.points, 0);
    }

    #[test]
    fn test_apply_keeps_omitted_fields() {
        let patch = UserPatch {
            display_name: None,
            points: Some(Some(20)),
        };
        let user = patch.apply("alice", Some(alice()));
        assert_eq!(user.display_name, "Alice");
        assert_eq!(user.points, 20);

        let patch = UserPatch {
            display_name: Some(Some("Alicia".to_string())),
            points: None,
        };
        let user = patch.apply("alice", Some(alice()));
        assert_eq!(user.display_name, "Alicia");
        assert_eq!(user.points, 10);
    }

    #[test]
    fn test_explicit_zero_overwrites_points() {
        let patch = UserPatch {
            display_name: None,
            points: Some(Some(0)),
        };
        assert_eq!(patch.apply("alice", Some(alice())).points, 0);
    }

    #[test]
    fn test_null_fields_reset_to_defaults() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"displayName": null, "points": null}"#).unwrap();
        assert_eq!(
            patch,
            UserPatch {
                display_name: Some(None),
                points: Some(None),
            }
        );

        let user = patch.apply("alice", Some(alice()));
        assert_eq!(user.display_name, "");
        assert_eq!(user.points, 0);
    }

    #[test]
    fn test_missing_fields_deserialize_as_absent() {
        let patch: UserPatch = serde_json::from_str(r#"{"points": 5, "extra": true}"#).unwrap();
        assert_eq!(patch.points, Some(Some(5)));
        assert_eq!(patch.display_name, None);

        let patch: UserPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch, UserPatch::default());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let value = serde_json::to_value(alice()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"username": "alice", "displayName": "Alice", "points": 10})
        );
    }

    #[test]
    fn test_username_validation() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username(&"a".repeat(200)).is_ok());
        assert!(validate_username("").is_err());
    }
}
