use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::commands::guardian::{CreateGuardianCommand, UpdateGuardianCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::lookups::GuardianLookup;
use crate::domain::models::activity::{ActivityRecord, RESPONSIBLE_ID_FIELD};
use crate::domain::models::guardian::{Guardian, GuardianPatch, GuardianRecord, REGISTRATION_FIELD};
use crate::domain::validation;
use crate::storage::{collections, Collection, KeyedLocks, RecordStore};

/// Service for managing guardians, the staff responsible for activities
#[derive(Clone)]
pub struct GuardianService {
    guardians: Collection<GuardianRecord>,
    activities: Collection<ActivityRecord>,
    locks: KeyedLocks,
}

impl GuardianService {
    pub fn new(store: Arc<dyn RecordStore>, locks: KeyedLocks) -> Self {
        Self {
            guardians: Collection::new(store.clone(), collections::GUARDIANS),
            activities: Collection::new(store, collections::ACTIVITIES),
            locks,
        }
    }

    pub async fn create(&self, command: CreateGuardianCommand) -> DomainResult<Guardian> {
        info!("Creating guardian: name={}, registration={}", command.name, command.registration);

        let record = GuardianRecord {
            name: validation::text("name", &command.name, 2, 100)?,
            registration: validation::registration("registration", &command.registration, 3, 20)?,
            client_id: validation::optional_text(command.client_id),
        };

        let _guard = self.locks.acquire(&Self::registration_key(&record.registration)).await;
        self.ensure_registration_free(&record.registration, None).await?;

        let id = self.guardians.insert(&record).await?;
        info!("Created guardian: {} with ID: {}", record.name, id);

        self.find_by_id(&id).await
    }

    pub async fn find_all(&self) -> DomainResult<Vec<Guardian>> {
        let guardians: Vec<Guardian> = self
            .guardians
            .list()
            .await?
            .into_iter()
            .map(Guardian::from_stored)
            .collect();

        info!("Found {} guardians", guardians.len());
        Ok(guardians)
    }

    pub async fn find_by_id(&self, guardian_id: &str) -> DomainResult<Guardian> {
        match self.guardians.get(guardian_id).await? {
            Some(stored) => Ok(Guardian::from_stored(stored)),
            None => {
                warn!("Guardian not found: {}", guardian_id);
                Err(DomainError::not_found(format!(
                    "Guardian with ID {guardian_id} not found"
                )))
            }
        }
    }

    /// Case-insensitive substring match over every guardian
    pub async fn find_by_name(&self, name: &str) -> DomainResult<Vec<Guardian>> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|guardian| guardian.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn find_by_registration(&self, registration: &str) -> DomainResult<Vec<Guardian>> {
        Ok(self
            .guardians
            .find_where(REGISTRATION_FIELD, registration)
            .await?
            .into_iter()
            .map(Guardian::from_stored)
            .collect())
    }

    pub async fn update(&self, command: UpdateGuardianCommand) -> DomainResult<Guardian> {
        info!("Updating guardian: {}", command.guardian_id);

        let existing = self.find_by_id(&command.guardian_id).await?;

        let patch = GuardianPatch {
            name: command
                .name
                .as_deref()
                .map(|v| validation::text("name", v, 2, 100))
                .transpose()?,
            registration: command
                .registration
                .as_deref()
                .map(|v| validation::registration("registration", v, 3, 20))
                .transpose()?,
            client_id: validation::clearable_text(command.client_id),
        };

        let _guard = match &patch.registration {
            Some(registration) => {
                let guard = self.locks.acquire(&Self::registration_key(registration)).await;
                self.ensure_registration_free(registration, Some(&existing.id)).await?;
                Some(guard)
            }
            None => None,
        };

        self.guardians.update(&existing.id, &patch).await?;
        info!("Updated guardian with ID: {}", existing.id);

        self.find_by_id(&existing.id).await
    }

    /// Remove a guardian no activity points to
    pub async fn delete(&self, guardian_id: &str) -> DomainResult<()> {
        info!("Deleting guardian: {}", guardian_id);

        let guardian = self.find_by_id(guardian_id).await?;

        let activities = self
            .activities
            .count_where(RESPONSIBLE_ID_FIELD, guardian_id)
            .await?;
        if activities > 0 {
            warn!("Refusing to delete guardian {} responsible for {} activities", guardian_id, activities);
            return Err(DomainError::validation(
                "Cannot delete guardian responsible for existing activities",
            ));
        }

        self.guardians.delete(guardian_id).await?;
        info!("Deleted guardian: {} with ID: {}", guardian.name, guardian.id);
        Ok(())
    }

    fn registration_key(registration: &str) -> String {
        format!("{}:registration:{}", collections::GUARDIANS, registration)
    }

    async fn ensure_registration_free(
        &self,
        registration: &str,
        exclude_id: Option<&str>,
    ) -> DomainResult<()> {
        let taken = self
            .guardians
            .find_where(REGISTRATION_FIELD, registration)
            .await?
            .iter()
            .any(|stored| Some(stored.id.as_str()) != exclude_id);

        if taken {
            return Err(DomainError::validation(
                "A guardian with this registration already exists",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl GuardianLookup for GuardianService {
    async fn find_guardian(&self, guardian_id: &str) -> DomainResult<Guardian> {
        self.find_by_id(guardian_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::TestServices;

    fn command(name: &str, registration: &str) -> CreateGuardianCommand {
        CreateGuardianCommand {
            name: name.to_string(),
            registration: registration.to_string(),
            client_id: Some("client-123".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_guardian_round_trip() {
        let services = TestServices::new();

        let created = services.guardians.create(command("Carlos Lima", "RESP001")).await.unwrap();
        let fetched = services.guardians.find_by_id(&created.id).await.unwrap();

        assert_eq!(fetched.name, "Carlos Lima");
        assert_eq!(fetched.registration, "RESP001");
        // Linked client is stored without being checked
        assert_eq!(fetched.client_id.as_deref(), Some("client-123"));
    }

    #[tokio::test]
    async fn test_registration_must_be_unique() {
        let services = TestServices::new();
        services.guardians.create(command("Carlos Lima", "RESP001")).await.unwrap();

        let duplicate = services.guardians.create(command("Ana Costa", "RESP001")).await;
        assert!(matches!(duplicate, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_registration_format_enforced() {
        let services = TestServices::new();
        let result = services.guardians.create(command("Carlos Lima", "resp-001")).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_registration_admit_one() {
        let services = TestServices::new();

        let (a, b) = tokio::join!(
            services.guardians.create(command("Carlos Lima", "RESP777")),
            services.guardians.create(command("Ana Costa", "RESP777")),
        );

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(services.guardians.find_by_registration("RESP777").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_registration_excludes_self() {
        let services = TestServices::new();
        let carlos = services.guardians.create(command("Carlos Lima", "RESP001")).await.unwrap();
        services.guardians.create(command("Ana Costa", "RESP002")).await.unwrap();

        let same = services
            .guardians
            .update(UpdateGuardianCommand {
                guardian_id: carlos.id.clone(),
                registration: Some("RESP001".to_string()),
                ..Default::default()
            })
            .await;
        assert!(same.is_ok());

        let taken = services
            .guardians
            .update(UpdateGuardianCommand {
                guardian_id: carlos.id.clone(),
                registration: Some("RESP002".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(taken, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_find_by_name_and_registration() {
        let services = TestServices::new();
        services.guardians.create(command("Carlos Lima", "RESP001")).await.unwrap();
        services.guardians.create(command("Ana Costa", "RESP002")).await.unwrap();

        let by_name = services.guardians.find_by_name("LIMA").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].registration, "RESP001");

        let by_registration = services.guardians.find_by_registration("RESP002").await.unwrap();
        assert_eq!(by_registration.len(), 1);
        assert_eq!(by_registration[0].name, "Ana Costa");
    }

    #[tokio::test]
    async fn test_delete_blocked_while_responsible_for_activity() {
        let services = TestServices::new();
        let activity = services.create_activity("Natacao Infantil").await;

        let blocked = services.guardians.delete(&activity.responsible_id).await;
        assert!(matches!(blocked, Err(DomainError::Validation(_))));

        services.activities.delete(&activity.id).await.unwrap();
        services.guardians.delete(&activity.responsible_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_guardian_is_not_found() {
        let services = TestServices::new();
        let result = services.guardians.delete("ghost").await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
