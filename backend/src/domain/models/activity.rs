use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::guardian::Guardian;
use crate::domain::timestamps;
use crate::storage::Stored;

pub const NAME_FIELD: &str = "name";
pub const UNIT_FIELD: &str = "unit";
pub const RESPONSIBLE_ID_FIELD: &str = "responsible_id";

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub responsible_id: String,
    pub capacity: Option<u32>,
    /// Filled only when requested and the guardian still exists
    pub responsible: Option<Guardian>,
    /// Enrollments referencing this activity, counted at read time
    pub total_enrollments: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub responsible_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl Activity {
    pub fn from_stored(
        stored: Stored<ActivityRecord>,
        total_enrollments: usize,
        responsible: Option<Guardian>,
    ) -> Self {
        let record = stored.record;
        Self {
            id: stored.id,
            name: record.name,
            description: record.description,
            unit: record.unit,
            responsible_id: record.responsible_id,
            capacity: record.capacity,
            responsible,
            total_enrollments,
            created_at: timestamps::resolve(stored.created_at.as_deref()),
            updated_at: timestamps::resolve(stored.updated_at.as_deref()),
        }
    }
}
