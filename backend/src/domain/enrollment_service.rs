use std::sync::Arc;

use chrono::{Local, NaiveDate};
use shared::EnrollmentStatus;
use tracing::{info, warn};

use crate::domain::commands::enrollment::{
    CancelEnrollmentCommand, CreateEnrollmentCommand, UpdateEnrollmentCommand,
};
use crate::domain::commands::RelationOptions;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::lookups::{optional_relation, ActivityLookup, ClientLookup};
use crate::domain::models::enrollment::{
    Enrollment, EnrollmentPatch, EnrollmentRecord, ACTIVITY_ID_FIELD, CLIENT_ID_FIELD,
    STATUS_FIELD,
};
use crate::domain::{timestamps, validation};
use crate::storage::{collections, Collection, KeyedLocks, RecordStore, Stored};

/// Service for enrolling clients in activities
///
/// # Admission rule
///
/// A client holds at most one active or pending enrollment per activity.
/// Cancelled and completed enrollments never block a new one. The check and
/// the write run under a lock on the (client, activity) pair.
#[derive(Clone)]
pub struct EnrollmentService {
    enrollments: Collection<EnrollmentRecord>,
    clients: Arc<dyn ClientLookup>,
    activities: Arc<dyn ActivityLookup>,
    locks: KeyedLocks,
}

impl EnrollmentService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        clients: Arc<dyn ClientLookup>,
        activities: Arc<dyn ActivityLookup>,
        locks: KeyedLocks,
    ) -> Self {
        Self {
            enrollments: Collection::new(store, collections::ENROLLMENTS),
            clients,
            activities,
            locks,
        }
    }

    pub async fn create(&self, command: CreateEnrollmentCommand) -> DomainResult<Enrollment> {
        info!(
            "Creating enrollment: client={}, activity={}, start_date={}",
            command.client_id, command.activity_id, command.start_date
        );

        let start_date = timestamps::parse_date("start_date", &command.start_date)?;
        let end_date = command
            .end_date
            .as_deref()
            .map(|v| timestamps::parse_date("end_date", v))
            .transpose()?;
        let status = command.status.unwrap_or_default();

        self.clients.find_client(&command.client_id).await?;
        self.activities.find_activity(&command.activity_id).await?;

        let _guard = self
            .locks
            .acquire(&Self::pair_key(&command.client_id, &command.activity_id))
            .await;
        if status.is_admitting() {
            self.ensure_admissible(&command.client_id, &command.activity_id, None)
                .await?;
        }

        let today = Local::now().date_naive();
        if start_date < today {
            return Err(DomainError::validation(
                "start_date cannot be earlier than today",
            ));
        }
        Self::ensure_date_order(start_date, end_date)?;

        let record = EnrollmentRecord {
            client_id: command.client_id,
            activity_id: command.activity_id,
            start_date,
            end_date,
            status,
            notes: validation::optional_text(command.notes),
        };

        let id = self.enrollments.insert(&record).await?;
        info!("Created enrollment {} with status {}", id, record.status);

        self.find_by_id(&id, RelationOptions::all()).await
    }

    pub async fn find_all(&self, options: RelationOptions) -> DomainResult<Vec<Enrollment>> {
        let stored = self.enrollments.list().await?;
        let enrollments = self.enrich_all(stored, options).await?;

        info!("Found {} enrollments", enrollments.len());
        Ok(enrollments)
    }

    pub async fn find_by_id(
        &self,
        enrollment_id: &str,
        options: RelationOptions,
    ) -> DomainResult<Enrollment> {
        let stored = self.get_stored(enrollment_id).await?;
        self.enrich(stored, options).await
    }

    /// A client's enrollments, each with its activity
    pub async fn find_by_client(&self, client_id: &str) -> DomainResult<Vec<Enrollment>> {
        let stored = self.enrollments.find_where(CLIENT_ID_FIELD, client_id).await?;
        let options = RelationOptions {
            include_client: false,
            include_activity: true,
        };
        self.enrich_all(stored, options).await
    }

    /// An activity's enrollments, each with its client
    pub async fn find_by_activity(&self, activity_id: &str) -> DomainResult<Vec<Enrollment>> {
        let stored = self
            .enrollments
            .find_where(ACTIVITY_ID_FIELD, activity_id)
            .await?;
        let options = RelationOptions {
            include_client: true,
            include_activity: false,
        };
        self.enrich_all(stored, options).await
    }

    pub async fn find_by_status(&self, status: EnrollmentStatus) -> DomainResult<Vec<Enrollment>> {
        let stored = self
            .enrollments
            .find_where(STATUS_FIELD, status.as_str())
            .await?;
        self.enrich_all(stored, RelationOptions::none()).await
    }

    /// Partial update
    ///
    /// Dates are only re-checked for order, never against today. The
    /// admission rule runs again whenever client, activity or status change.
    pub async fn update(&self, command: UpdateEnrollmentCommand) -> DomainResult<Enrollment> {
        info!("Updating enrollment: {}", command.enrollment_id);

        let existing = self.get_stored(&command.enrollment_id).await?;

        let patch = EnrollmentPatch {
            client_id: command.client_id,
            activity_id: command.activity_id,
            start_date: command
                .start_date
                .as_deref()
                .map(|v| timestamps::parse_date("start_date", v))
                .transpose()?,
            end_date: command
                .end_date
                .as_deref()
                .map(|v| timestamps::parse_date("end_date", v))
                .transpose()?,
            status: command.status,
            notes: validation::clearable_text(command.notes),
        };

        if let Some(client_id) = &patch.client_id {
            self.clients.find_client(client_id).await?;
        }
        if let Some(activity_id) = &patch.activity_id {
            self.activities.find_activity(activity_id).await?;
        }

        if patch.start_date.is_some() || patch.end_date.is_some() {
            let start_date = patch.start_date.unwrap_or(existing.record.start_date);
            let end_date = patch.end_date.or(existing.record.end_date);
            Self::ensure_date_order(start_date, end_date)?;
        }

        let _guard = if patch.client_id.is_some()
            || patch.activity_id.is_some()
            || patch.status.is_some()
        {
            let client_id = patch.client_id.as_deref().unwrap_or(&existing.record.client_id);
            let activity_id = patch
                .activity_id
                .as_deref()
                .unwrap_or(&existing.record.activity_id);
            let status = patch.status.unwrap_or(existing.record.status);

            let guard = self.locks.acquire(&Self::pair_key(client_id, activity_id)).await;
            if status.is_admitting() {
                self.ensure_admissible(client_id, activity_id, Some(&existing.id))
                    .await?;
            }
            Some(guard)
        } else {
            None
        };

        self.enrollments.update(&existing.id, &patch).await?;
        info!("Updated enrollment with ID: {}", existing.id);

        self.find_by_id(&existing.id, RelationOptions::all()).await
    }

    /// Mark an enrollment cancelled, recording the reason as its notes
    ///
    /// Cancelling twice leaves it cancelled.
    pub async fn cancel(&self, command: CancelEnrollmentCommand) -> DomainResult<Enrollment> {
        info!("Cancelling enrollment: {}", command.enrollment_id);

        self.update(UpdateEnrollmentCommand {
            enrollment_id: command.enrollment_id,
            status: Some(EnrollmentStatus::Cancelled),
            notes: validation::optional_text(command.reason),
            ..Default::default()
        })
        .await
    }

    pub async fn delete(&self, enrollment_id: &str) -> DomainResult<()> {
        info!("Deleting enrollment: {}", enrollment_id);

        self.get_stored(enrollment_id).await?;
        self.enrollments.delete(enrollment_id).await?;

        info!("Deleted enrollment with ID: {}", enrollment_id);
        Ok(())
    }

    async fn get_stored(&self, enrollment_id: &str) -> DomainResult<Stored<EnrollmentRecord>> {
        match self.enrollments.get(enrollment_id).await? {
            Some(stored) => Ok(stored),
            None => {
                warn!("Enrollment not found: {}", enrollment_id);
                Err(DomainError::not_found(format!(
                    "Enrollment with ID {enrollment_id} not found"
                )))
            }
        }
    }

    fn pair_key(client_id: &str, activity_id: &str) -> String {
        format!("{}:{}|{}", collections::ENROLLMENTS, client_id, activity_id)
    }

    fn ensure_date_order(start_date: NaiveDate, end_date: Option<NaiveDate>) -> DomainResult<()> {
        match end_date {
            Some(end_date) if end_date <= start_date => Err(DomainError::validation(
                "end_date must be after start_date",
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_admissible(
        &self,
        client_id: &str,
        activity_id: &str,
        exclude_id: Option<&str>,
    ) -> DomainResult<()> {
        let blocked = self
            .enrollments
            .find_where(CLIENT_ID_FIELD, client_id)
            .await?
            .iter()
            .any(|stored| {
                stored.record.activity_id == activity_id
                    && stored.record.status.is_admitting()
                    && Some(stored.id.as_str()) != exclude_id
            });

        if blocked {
            warn!("Client {} already admitted to activity {}", client_id, activity_id);
            return Err(DomainError::validation(
                "Client already has an active or pending enrollment in this activity",
            ));
        }
        Ok(())
    }

    async fn enrich(
        &self,
        stored: Stored<EnrollmentRecord>,
        options: RelationOptions,
    ) -> DomainResult<Enrollment> {
        let mut enrollment = Enrollment::from_stored(stored);

        if options.include_client {
            enrollment.client =
                optional_relation(self.clients.find_client(&enrollment.client_id).await)?;
        }
        if options.include_activity {
            enrollment.activity =
                optional_relation(self.activities.find_activity(&enrollment.activity_id).await)?;
        }

        Ok(enrollment)
    }

    async fn enrich_all(
        &self,
        stored: Vec<Stored<EnrollmentRecord>>,
        options: RelationOptions,
    ) -> DomainResult<Vec<Enrollment>> {
        let mut enrollments = Vec::with_capacity(stored.len());
        for item in stored {
            enrollments.push(self.enrich(item, options).await?);
        }
        Ok(enrollments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{
        date_str, days_from_today, enrollment_command, today, TestServices,
    };

    #[tokio::test]
    async fn test_create_defaults_to_active_and_embeds_relations() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;

        let enrollment = services.enroll(&client.id, &activity.id).await;

        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.start_date, today());
        assert_eq!(enrollment.client.as_ref().map(|c| c.name.as_str()), Some("Ana Souza"));
        let embedded = enrollment.activity.as_ref().unwrap();
        assert_eq!(embedded.id, activity.id);
        assert_eq!(embedded.total_enrollments, 1);
    }

    #[tokio::test]
    async fn test_create_round_trip_keeps_submitted_fields() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;

        let mut command = enrollment_command(&client.id, &activity.id, &date_str(days_from_today(3)));
        command.end_date = Some(date_str(days_from_today(30)));
        command.status = Some(EnrollmentStatus::Pending);
        command.notes = Some("Morning group".to_string());
        let created = services.enrollments.create(command).await.unwrap();

        let fetched = services
            .enrollments
            .find_by_id(&created.id, RelationOptions::none())
            .await
            .unwrap();
        assert_eq!(fetched.client_id, client.id);
        assert_eq!(fetched.activity_id, activity.id);
        assert_eq!(fetched.start_date, days_from_today(3));
        assert_eq!(fetched.end_date, Some(days_from_today(30)));
        assert_eq!(fetched.status, EnrollmentStatus::Pending);
        assert_eq!(fetched.notes.as_deref(), Some("Morning group"));
        assert_eq!(fetched.enrolled_at, created.enrolled_at);
        assert!(fetched.client.is_none());
    }

    #[tokio::test]
    async fn test_second_admitting_enrollment_rejected() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;
        services.enroll(&client.id, &activity.id).await;

        let mut pending = enrollment_command(&client.id, &activity.id, &date_str(today()));
        pending.status = Some(EnrollmentStatus::Pending);
        let result = services.enrollments.create(pending).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_reenrollment_allowed_after_cancel_or_complete() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;

        let first = services.enroll(&client.id, &activity.id).await;
        services
            .enrollments
            .cancel(CancelEnrollmentCommand {
                enrollment_id: first.id.clone(),
                reason: Some("Moved away".to_string()),
            })
            .await
            .unwrap();

        let second = services.enroll(&client.id, &activity.id).await;
        services
            .enrollments
            .update(UpdateEnrollmentCommand {
                enrollment_id: second.id.clone(),
                status: Some(EnrollmentStatus::Completed),
                ..Default::default()
            })
            .await
            .unwrap();

        let third = services.enroll(&client.id, &activity.id).await;
        assert_eq!(third.status, EnrollmentStatus::Active);
    }

    #[tokio::test]
    async fn test_non_admitting_create_skips_admission_check() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;
        services.enroll(&client.id, &activity.id).await;

        let mut completed = enrollment_command(&client.id, &activity.id, &date_str(today()));
        completed.status = Some(EnrollmentStatus::Completed);
        assert!(services.enrollments.create(completed).await.is_ok());
    }

    #[tokio::test]
    async fn test_start_date_must_not_precede_today() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;

        let yesterday = enrollment_command(&client.id, &activity.id, &date_str(days_from_today(-1)));
        assert!(matches!(
            services.enrollments.create(yesterday).await,
            Err(DomainError::Validation(_))
        ));

        let starting_today = enrollment_command(&client.id, &activity.id, &date_str(today()));
        assert!(services.enrollments.create(starting_today).await.is_ok());
    }

    #[tokio::test]
    async fn test_end_date_must_follow_start_date() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;
        let start = days_from_today(5);

        let mut same_day = enrollment_command(&client.id, &activity.id, &date_str(start));
        same_day.end_date = Some(date_str(start));
        assert!(matches!(
            services.enrollments.create(same_day).await,
            Err(DomainError::Validation(_))
        ));

        let mut before = enrollment_command(&client.id, &activity.id, &date_str(start));
        before.end_date = Some(date_str(days_from_today(4)));
        assert!(matches!(
            services.enrollments.create(before).await,
            Err(DomainError::Validation(_))
        ));

        let mut next_day = enrollment_command(&client.id, &activity.id, &date_str(start));
        next_day.end_date = Some(date_str(days_from_today(6)));
        assert!(services.enrollments.create(next_day).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_references_are_not_found() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;

        let no_client = enrollment_command("ghost", &activity.id, &date_str(today()));
        assert!(matches!(
            services.enrollments.create(no_client).await,
            Err(DomainError::NotFound(_))
        ));

        let no_activity = enrollment_command(&client.id, "ghost", &date_str(today()));
        assert!(matches!(
            services.enrollments.create(no_activity).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_twice_is_idempotent() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;
        let enrollment = services.enroll(&client.id, &activity.id).await;

        let cancel = || CancelEnrollmentCommand {
            enrollment_id: enrollment.id.clone(),
            reason: Some("Schedule conflict".to_string()),
        };
        let first = services.enrollments.cancel(cancel()).await.unwrap();
        let second = services.enrollments.cancel(cancel()).await.unwrap();

        assert_eq!(first.status, EnrollmentStatus::Cancelled);
        assert_eq!(second.status, EnrollmentStatus::Cancelled);
        assert_eq!(second.notes.as_deref(), Some("Schedule conflict"));
    }

    #[tokio::test]
    async fn test_cancel_missing_enrollment_is_not_found() {
        let services = TestServices::new();
        let result = services
            .enrollments
            .cancel(CancelEnrollmentCommand {
                enrollment_id: "ghost".to_string(),
                reason: None,
            })
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reactivating_blocked_by_other_admitting_enrollment() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;

        let first = services.enroll(&client.id, &activity.id).await;
        services
            .enrollments
            .cancel(CancelEnrollmentCommand {
                enrollment_id: first.id.clone(),
                reason: None,
            })
            .await
            .unwrap();
        services.enroll(&client.id, &activity.id).await;

        let reactivate = services
            .enrollments
            .update(UpdateEnrollmentCommand {
                enrollment_id: first.id.clone(),
                status: Some(EnrollmentStatus::Active),
                ..Default::default()
            })
            .await;
        assert!(matches!(reactivate, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_dates_use_stored_values_as_fallback() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;
        let mut command = enrollment_command(&client.id, &activity.id, &date_str(days_from_today(10)));
        command.end_date = Some(date_str(days_from_today(20)));
        let enrollment = services.enrollments.create(command).await.unwrap();

        // New end before the stored start
        let result = services
            .enrollments
            .update(UpdateEnrollmentCommand {
                enrollment_id: enrollment.id.clone(),
                end_date: Some(date_str(days_from_today(9))),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        // New start after the stored end
        let result = services
            .enrollments
            .update(UpdateEnrollmentCommand {
                enrollment_id: enrollment.id.clone(),
                start_date: Some(date_str(days_from_today(25))),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        // A past start date is accepted on update
        let moved = services
            .enrollments
            .update(UpdateEnrollmentCommand {
                enrollment_id: enrollment.id.clone(),
                start_date: Some(date_str(days_from_today(-2))),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(moved.start_date, days_from_today(-2));
    }

    #[tokio::test]
    async fn test_finders_denormalize_the_other_side() {
        let services = TestServices::new();
        let ana = services.create_client("Ana Souza").await;
        let bia = services.create_client("Bia Souza").await;
        let swimming = services.create_activity("Natacao Infantil").await;
        let judo = services.create_activity("Judo Infantil").await;

        services.enroll(&ana.id, &swimming.id).await;
        services.enroll(&ana.id, &judo.id).await;
        let bia_swimming = services.enroll(&bia.id, &swimming.id).await;
        services
            .enrollments
            .cancel(CancelEnrollmentCommand {
                enrollment_id: bia_swimming.id.clone(),
                reason: None,
            })
            .await
            .unwrap();

        let by_client = services.enrollments.find_by_client(&ana.id).await.unwrap();
        assert_eq!(by_client.len(), 2);
        assert!(by_client.iter().all(|e| e.activity.is_some() && e.client.is_none()));

        let by_activity = services.enrollments.find_by_activity(&swimming.id).await.unwrap();
        assert_eq!(by_activity.len(), 2);
        assert!(by_activity.iter().all(|e| e.client.is_some() && e.activity.is_none()));

        let cancelled = services
            .enrollments
            .find_by_status(EnrollmentStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, bia_swimming.id);
        assert!(cancelled[0].client.is_none() && cancelled[0].activity.is_none());

        let all = services.enrollments.find_all(RelationOptions::none()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_enrollments_admit_one() {
        let services = TestServices::new();
        let client = services.create_client("Ana Souza").await;
        let activity = services.create_activity("Natacao Infantil").await;
        let start = date_str(today());

        let (a, b) = tokio::join!(
            services.enrollments.create(enrollment_command(&client.id, &activity.id, &start)),
            services.enrollments.create(enrollment_command(&client.id, &activity.id, &start)),
        );

        assert!(a.is_ok() != b.is_ok());
    }
}
