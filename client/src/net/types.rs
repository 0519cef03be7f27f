//! Wire DTOs for the journal REST API.
//!
//! DESIGN
//! ======
//! Field names follow the server's camelCase JSON (`userName`). Entry ids
//! are kept as strings whatever their JSON type so paths can be built from
//! them verbatim.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Login request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
}

/// Signup request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewUser {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// A stored journal entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Server-assigned creation timestamp, when provided.
    #[serde(default)]
    pub date: Option<String>,
}

/// Title and body for creating or replacing an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
}

/// The signed-in user's profile.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "userName")]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UsernameAvailability {
    pub available: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailUpdate {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordUpdate {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
}

/// Error payload some endpoints return alongside a failure status.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {other}"))),
    }
}
