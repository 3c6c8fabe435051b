use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::timestamps;
use crate::storage::Stored;

pub const REGISTRATION_FIELD: &str = "registration";

/// Staff member who can be made responsible for activities
#[derive(Debug, Clone, PartialEq)]
pub struct Guardian {
    pub id: String,
    pub name: String,
    pub registration: String,
    /// Linked client; stored as given, never checked
    pub client_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianRecord {
    pub name: String,
    pub registration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GuardianPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Option<String>>,
}

impl Guardian {
    pub fn from_stored(stored: Stored<GuardianRecord>) -> Self {
        Self {
            id: stored.id,
            name: stored.record.name,
            registration: stored.record.registration,
            client_id: stored.record.client_id,
            created_at: timestamps::resolve(stored.created_at.as_deref()),
            updated_at: timestamps::resolve(stored.updated_at.as_deref()),
        }
    }
}
