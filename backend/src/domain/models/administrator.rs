use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::timestamps;
use crate::storage::Stored;

pub const EMAIL_FIELD: &str = "email";
pub const REGISTRATION_FIELD: &str = "registration";

/// Administrator without the credential hash
#[derive(Debug, Clone, PartialEq)]
pub struct Administrator {
    pub id: String,
    pub name: String,
    pub email: String,
    pub registration: String,
    pub role: Option<String>,
    pub unit: Option<String>,
    pub active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministratorRecord {
    pub name: String,
    pub email: String,
    pub registration: String,
    /// argon2 PHC string
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdministratorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// `Some(None)` removes the stored role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl Administrator {
    /// Drops the credential hash on the way out of storage
    pub fn from_stored(stored: Stored<AdministratorRecord>) -> Self {
        let record = stored.record;
        Self {
            id: stored.id,
            name: record.name,
            email: record.email,
            registration: record.registration,
            role: record.role,
            unit: record.unit,
            active: record.active,
            last_login_at: timestamps::resolve_optional(record.last_login_at.as_deref()),
            created_at: timestamps::resolve(stored.created_at.as_deref()),
            updated_at: timestamps::resolve(stored.updated_at.as_deref()),
        }
    }
}
