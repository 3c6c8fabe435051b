use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::commands::activity::{
    ActivityReadOptions, CreateActivityCommand, UpdateActivityCommand,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::lookups::{optional_relation, ActivityLookup, GuardianLookup};
use crate::domain::models::activity::{
    Activity, ActivityPatch, ActivityRecord, NAME_FIELD, RESPONSIBLE_ID_FIELD, UNIT_FIELD,
};
use crate::domain::models::enrollment::{EnrollmentRecord, ACTIVITY_ID_FIELD};
use crate::domain::validation;
use crate::storage::{collections, Collection, KeyedLocks, RecordStore, Stored};

/// Service for managing activities offered at the organization's units
///
/// Every activity read carries a live count of the enrollments pointing at
/// it. The responsible guardian is embedded only on request.
#[derive(Clone)]
pub struct ActivityService {
    activities: Collection<ActivityRecord>,
    enrollments: Collection<EnrollmentRecord>,
    guardians: Arc<dyn GuardianLookup>,
    locks: KeyedLocks,
}

impl ActivityService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        guardians: Arc<dyn GuardianLookup>,
        locks: KeyedLocks,
    ) -> Self {
        Self {
            activities: Collection::new(store.clone(), collections::ACTIVITIES),
            enrollments: Collection::new(store, collections::ENROLLMENTS),
            guardians,
            locks,
        }
    }

    /// Create an activity; its guardian must exist and (name, unit) must be free
    pub async fn create(&self, command: CreateActivityCommand) -> DomainResult<Activity> {
        info!("Creating activity: name={}, unit={}", command.name, command.unit);

        let record = ActivityRecord {
            name: validation::text("name", &command.name, 2, 100)?,
            description: validation::text("description", &command.description, 10, 500)?,
            unit: validation::text("unit", &command.unit, 5, 100)?,
            responsible_id: validation::non_empty("responsible_id", &command.responsible_id)?,
            capacity: command.capacity.map(Self::validate_capacity).transpose()?,
        };

        self.guardians.find_guardian(&record.responsible_id).await?;

        let _guard = self.locks.acquire(&Self::identity_key(&record.name, &record.unit)).await;
        self.ensure_unique(&record.name, &record.unit, None).await?;

        let id = self.activities.insert(&record).await?;
        info!("Created activity: {} with ID: {}", record.name, id);

        self.find_by_id(&id, ActivityReadOptions { include_responsible: true })
            .await
    }

    pub async fn find_all(&self, options: ActivityReadOptions) -> DomainResult<Vec<Activity>> {
        let stored = self.activities.list().await?;
        let activities = self.enrich_all(stored, options).await?;

        info!("Found {} activities", activities.len());
        Ok(activities)
    }

    pub async fn find_by_id(
        &self,
        activity_id: &str,
        options: ActivityReadOptions,
    ) -> DomainResult<Activity> {
        match self.activities.get(activity_id).await? {
            Some(stored) => self.enrich(stored, options).await,
            None => {
                warn!("Activity not found: {}", activity_id);
                Err(DomainError::not_found(format!(
                    "Activity with ID {activity_id} not found"
                )))
            }
        }
    }

    pub async fn find_by_unit(
        &self,
        unit: &str,
        options: ActivityReadOptions,
    ) -> DomainResult<Vec<Activity>> {
        let stored = self.activities.find_where(UNIT_FIELD, unit).await?;
        self.enrich_all(stored, options).await
    }

    pub async fn find_by_responsible(
        &self,
        responsible_id: &str,
        options: ActivityReadOptions,
    ) -> DomainResult<Vec<Activity>> {
        let stored = self
            .activities
            .find_where(RESPONSIBLE_ID_FIELD, responsible_id)
            .await?;
        self.enrich_all(stored, options).await
    }

    /// Case-insensitive substring match over every activity name
    pub async fn find_by_name(
        &self,
        name: &str,
        options: ActivityReadOptions,
    ) -> DomainResult<Vec<Activity>> {
        let needle = name.trim().to_lowercase();
        let stored = self
            .activities
            .list()
            .await?
            .into_iter()
            .filter(|stored| stored.record.name.to_lowercase().contains(&needle))
            .collect();
        self.enrich_all(stored, options).await
    }

    pub async fn update(&self, command: UpdateActivityCommand) -> DomainResult<Activity> {
        info!("Updating activity: {}", command.activity_id);

        let existing = self
            .activities
            .get(&command.activity_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Activity with ID {} not found",
                    command.activity_id
                ))
            })?;

        let patch = ActivityPatch {
            name: command
                .name
                .as_deref()
                .map(|v| validation::text("name", v, 2, 100))
                .transpose()?,
            description: command
                .description
                .as_deref()
                .map(|v| validation::text("description", v, 10, 500))
                .transpose()?,
            unit: command
                .unit
                .as_deref()
                .map(|v| validation::text("unit", v, 5, 100))
                .transpose()?,
            responsible_id: command
                .responsible_id
                .as_deref()
                .map(|v| validation::non_empty("responsible_id", v))
                .transpose()?,
            capacity: command.capacity.map(Self::validate_capacity).transpose()?,
        };

        if let Some(responsible_id) = &patch.responsible_id {
            self.guardians.find_guardian(responsible_id).await?;
        }

        let _guard = if patch.name.is_some() || patch.unit.is_some() {
            let name = patch.name.as_deref().unwrap_or(&existing.record.name);
            let unit = patch.unit.as_deref().unwrap_or(&existing.record.unit);

            let guard = self.locks.acquire(&Self::identity_key(name, unit)).await;
            self.ensure_unique(name, unit, Some(&existing.id)).await?;
            Some(guard)
        } else {
            None
        };

        self.activities.update(&existing.id, &patch).await?;
        info!("Updated activity with ID: {}", existing.id);

        self.find_by_id(&existing.id, ActivityReadOptions { include_responsible: true })
            .await
    }

    /// Remove an activity nobody is enrolled in, whatever the enrollment status
    pub async fn delete(&self, activity_id: &str) -> DomainResult<()> {
        info!("Deleting activity: {}", activity_id);

        let activity = self.find_by_id(activity_id, ActivityReadOptions::default()).await?;

        let enrollments = self
            .enrollments
            .count_where(ACTIVITY_ID_FIELD, activity_id)
            .await?;
        if enrollments > 0 {
            warn!("Refusing to delete activity {} with {} enrollments", activity_id, enrollments);
            return Err(DomainError::validation(
                "Cannot delete activity with existing enrollments",
            ));
        }

        self.activities.delete(activity_id).await?;
        info!("Deleted activity: {} with ID: {}", activity.name, activity.id);
        Ok(())
    }

    fn validate_capacity(capacity: u32) -> DomainResult<u32> {
        if capacity == 0 {
            return Err(DomainError::validation("capacity must be a positive number"));
        }
        Ok(capacity)
    }

    fn identity_key(name: &str, unit: &str) -> String {
        format!("{}:{}|{}", collections::ACTIVITIES, name, unit)
    }

    async fn ensure_unique(&self, name: &str, unit: &str, exclude_id: Option<&str>) -> DomainResult<()> {
        let duplicate = self
            .activities
            .find_where(NAME_FIELD, name)
            .await?
            .iter()
            .any(|stored| stored.record.unit == unit && Some(stored.id.as_str()) != exclude_id);

        if duplicate {
            return Err(DomainError::validation(
                "An activity with this name already exists in this unit",
            ));
        }
        Ok(())
    }

    async fn enrich(
        &self,
        stored: Stored<ActivityRecord>,
        options: ActivityReadOptions,
    ) -> DomainResult<Activity> {
        let total_enrollments = self
            .enrollments
            .count_where(ACTIVITY_ID_FIELD, stored.id.as_str())
            .await?;

        let responsible = if options.include_responsible {
            optional_relation(self.guardians.find_guardian(&stored.record.responsible_id).await)?
        } else {
            None
        };

        Ok(Activity::from_stored(stored, total_enrollments, responsible))
    }

    async fn enrich_all(
        &self,
        stored: Vec<Stored<ActivityRecord>>,
        options: ActivityReadOptions,
    ) -> DomainResult<Vec<Activity>> {
        let mut activities = Vec::with_capacity(stored.len());
        for item in stored {
            activities.push(self.enrich(item, options).await?);
        }
        Ok(activities)
    }
}

#[async_trait]
impl ActivityLookup for ActivityService {
    async fn find_activity(&self, activity_id: &str) -> DomainResult<Activity> {
        self.find_by_id(activity_id, ActivityReadOptions::default()).await
    }
}
