use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::EvaluationCategory;

use super::activity::Activity;
use super::client::Client;
use crate::domain::timestamps;
use crate::storage::Stored;

pub const CLIENT_ID_FIELD: &str = "client_id";
pub const ACTIVITY_ID_FIELD: &str = "activity_id";
pub const CATEGORY_FIELD: &str = "category";
pub const UNIT_FIELD: &str = "unit";

/// Feedback left by a client, optionally about one activity
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub id: String,
    pub client_id: String,
    pub activity_id: Option<String>,
    pub category: EvaluationCategory,
    pub title: String,
    pub body: String,
    pub rating: Option<u8>,
    pub unit: Option<String>,
    pub response: Option<String>,
    pub responded_by: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub client: Option<Client>,
    pub activity: Option<Activity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evaluation {
    pub fn is_responded(&self) -> bool {
        self.response.as_deref().is_some_and(|r| !r.is_empty())
    }

    pub fn from_stored(stored: Stored<EvaluationRecord>) -> Self {
        let record = stored.record;
        Self {
            id: stored.id,
            client_id: record.client_id,
            activity_id: record.activity_id,
            category: record.category,
            title: record.title,
            body: record.body,
            rating: record.rating,
            unit: record.unit,
            response: record.response,
            responded_by: record.responded_by,
            responded_at: timestamps::resolve_optional(record.responded_at.as_deref()),
            client: None,
            activity: None,
            created_at: timestamps::resolve(stored.created_at.as_deref()),
            updated_at: timestamps::resolve(stored.updated_at.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    pub category: EvaluationCategory,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_by: Option<String>,
    /// RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EvaluationCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub complaints: usize,
    pub suggestions: usize,
    pub compliments: usize,
}

/// Aggregates over the whole evaluation collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationStats {
    pub total: usize,
    pub by_category: CategoryCounts,
    pub responded: usize,
    pub pending: usize,
    pub average_rating: f64,
}
