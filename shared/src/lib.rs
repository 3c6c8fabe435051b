//! Wire types shared between the registration backend and its clients.
//!
//! Dates travel as `YYYY-MM-DD` strings and timestamps as RFC 3339 strings;
//! the backend mappers parse them into typed values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Pending,
    Cancelled,
    Completed,
}

impl EnrollmentStatus {
    /// Active and pending enrollments hold the client's seat in an activity
    pub fn is_admitting(&self) -> bool {
        matches!(self, EnrollmentStatus::Active | EnrollmentStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Cancelled => "cancelled",
            EnrollmentStatus::Completed => "completed",
        }
    }
}

impl Default for EnrollmentStatus {
    fn default() -> Self {
        EnrollmentStatus::Active
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of feedback an evaluation carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationCategory {
    Complaint,
    Suggestion,
    Compliment,
}

impl EvaluationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationCategory::Complaint => "complaint",
            EvaluationCategory::Suggestion => "suggestion",
            EvaluationCategory::Compliment => "compliment",
        }
    }
}

impl fmt::Display for EvaluationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: String,
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    /// Two-letter state code, uppercase
    pub state: String,
    /// Postal code, `12345-678` or `12345678`
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateClientRequest {
    pub name: String,
    pub birth_date: String,
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default)]
    pub complement: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateClientRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
}

// ---------------------------------------------------------------------------
// Guardians
// ---------------------------------------------------------------------------

/// Staff member responsible for activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: String,
    pub name: String,
    /// Unique registration code (uppercase letters and digits)
    pub registration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGuardianRequest {
    pub name: String,
    pub registration: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateGuardianRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Facility where the activity takes place
    pub unit: String,
    /// Guardian responsible for the activity
    pub responsible_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Present only when the responsible guardian was requested and exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<Guardian>,
    /// Number of enrollments referencing this activity, any status
    pub total_enrollments: usize,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateActivityRequest {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub responsible_id: String,
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateActivityRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub responsible_id: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

// ---------------------------------------------------------------------------
// Enrollments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub client_id: String,
    pub activity_id: String,
    /// First day of participation (YYYY-MM-DD)
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub status: EnrollmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    /// Creation timestamp of the enrollment (RFC 3339)
    pub enrolled_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEnrollmentRequest {
    pub client_id: String,
    pub activity_id: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Defaults to `active` when omitted
    #[serde(default)]
    pub status: Option<EnrollmentStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEnrollmentRequest {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<EnrollmentStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancelEnrollmentRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Evaluations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    pub category: EvaluationCategory,
    pub title: String,
    pub body: String,
    /// Rating from 1 to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEvaluationRequest {
    pub client_id: String,
    #[serde(default)]
    pub activity_id: Option<String>,
    pub category: EvaluationCategory,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEvaluationRequest {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub category: Option<EvaluationCategory>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondEvaluationRequest {
    pub response: String,
    pub responded_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub complaints: usize,
    pub suggestions: usize,
    pub compliments: usize,
}

/// Aggregate figures over the whole evaluation collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    pub total: usize,
    pub by_category: CategoryCounts,
    pub responded: usize,
    pub pending: usize,
    /// Mean rating over rated evaluations only, 0 when none are rated
    pub average_rating: f64,
}

// ---------------------------------------------------------------------------
// Administrators
// ---------------------------------------------------------------------------

/// Administrator as exposed over the API; the credential hash never leaves the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Administrator {
    pub id: String,
    pub name: String,
    pub email: String,
    pub registration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAdministratorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub registration: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAdministratorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetAdministratorStatusRequest {
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable kind, e.g. `VALIDATION_ERROR`
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_status_wire_format() {
        let json = serde_json::to_string(&EnrollmentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");

        let parsed: EnrollmentStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, EnrollmentStatus::Pending);
    }

    #[test]
    fn test_admitting_statuses() {
        assert!(EnrollmentStatus::Active.is_admitting());
        assert!(EnrollmentStatus::Pending.is_admitting());
        assert!(!EnrollmentStatus::Cancelled.is_admitting());
        assert!(!EnrollmentStatus::Completed.is_admitting());
    }

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let body = r#"{"name":"Ana","registration":"RESP001","nickname":"x"}"#;
        assert!(serde_json::from_str::<CreateGuardianRequest>(body).is_err());
    }

    #[test]
    fn test_update_request_fields_are_optional() {
        let parsed: UpdateEnrollmentRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, UpdateEnrollmentRequest::default());
    }
}
