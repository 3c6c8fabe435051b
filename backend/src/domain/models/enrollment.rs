use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::EnrollmentStatus;

use super::activity::Activity;
use super::client::Client;
use crate::domain::timestamps;
use crate::storage::Stored;

pub const CLIENT_ID_FIELD: &str = "client_id";
pub const ACTIVITY_ID_FIELD: &str = "activity_id";
pub const STATUS_FIELD: &str = "status";

#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub id: String,
    pub client_id: String,
    pub activity_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: EnrollmentStatus,
    pub notes: Option<String>,
    pub client: Option<Client>,
    pub activity: Option<Activity>,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub client_id: String,
    pub activity_id: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EnrollmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrollmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EnrollmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Enrollment {
    pub fn from_stored(stored: Stored<EnrollmentRecord>) -> Self {
        let record = stored.record;
        Self {
            id: stored.id,
            client_id: record.client_id,
            activity_id: record.activity_id,
            start_date: record.start_date,
            end_date: record.end_date,
            status: record.status,
            notes: record.notes,
            client: None,
            activity: None,
            enrolled_at: timestamps::resolve(stored.created_at.as_deref()),
            updated_at: timestamps::resolve(stored.updated_at.as_deref()),
        }
    }
}
