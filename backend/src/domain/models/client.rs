use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::timestamps;
use crate::storage::Stored;

pub const NAME_FIELD: &str = "name";

/// A person registered with the organization
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub complement: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    pub birth_date: NaiveDate,
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// `Some(None)` removes the stored complement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<Option<String>>,
}

impl Client {
    pub fn from_stored(stored: Stored<ClientRecord>) -> Self {
        let record = stored.record;
        Self {
            id: stored.id,
            name: record.name,
            birth_date: record.birth_date,
            street: record.street,
            number: record.number,
            district: record.district,
            city: record.city,
            state: record.state,
            postal_code: record.postal_code,
            complement: record.complement,
            created_at: timestamps::resolve(stored.created_at.as_deref()),
            updated_at: timestamps::resolve(stored.updated_at.as_deref()),
        }
    }
}
