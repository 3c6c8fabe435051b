use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::commands::admin::{
    CreateAdministratorCommand, LoginCommand, SetAdministratorStatusCommand,
    UpdateAdministratorCommand,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::administrator::{
    Administrator, AdministratorPatch, AdministratorRecord, EMAIL_FIELD, REGISTRATION_FIELD,
};
use crate::domain::{password, timestamps, validation};
use crate::storage::{collections, Collection, KeyGuard, KeyedLocks, RecordStore, Stored};

/// Service for administrator accounts and their credentials
///
/// Email and registration are unique across accounts. Passwords are stored
/// only as argon2 hashes and never leave this service.
#[derive(Clone)]
pub struct AdminService {
    admins: Collection<AdministratorRecord>,
    locks: KeyedLocks,
}

impl AdminService {
    pub fn new(store: Arc<dyn RecordStore>, locks: KeyedLocks) -> Self {
        Self {
            admins: Collection::new(store, collections::ADMINISTRATORS),
            locks,
        }
    }

    pub async fn create(&self, command: CreateAdministratorCommand) -> DomainResult<Administrator> {
        info!("Creating administrator: email={}", command.email);

        let name = validation::non_empty("name", &command.name)?;
        let email = validation::email(&command.email)?;
        let registration = validation::registration("registration", &command.registration, 3, 20)?;
        let password = validation::password(&command.password)?;

        let _guards = self.lock_identity(Some(&email), Some(&registration)).await;
        self.ensure_email_free(&email, None).await?;
        self.ensure_registration_free(&registration, None).await?;

        let record = AdministratorRecord {
            name,
            email,
            registration,
            password_hash: password::hash_password(password)?,
            role: validation::optional_text(command.role),
            unit: validation::optional_text(command.unit),
            active: true,
            last_login_at: None,
        };

        let id = self.admins.insert(&record).await?;
        info!("Created administrator: {} with ID: {}", record.email, id);

        self.find_by_id(&id).await
    }

    pub async fn find_all(&self) -> DomainResult<Vec<Administrator>> {
        let admins: Vec<Administrator> = self
            .admins
            .list()
            .await?
            .into_iter()
            .map(Administrator::from_stored)
            .collect();

        info!("Found {} administrators", admins.len());
        Ok(admins)
    }

    pub async fn find_by_id(&self, admin_id: &str) -> DomainResult<Administrator> {
        Ok(Administrator::from_stored(self.get_stored(admin_id).await?))
    }

    /// Case-insensitive substring match over every administrator name
    pub async fn find_by_name(&self, name: &str) -> DomainResult<Vec<Administrator>> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|admin| admin.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn find_by_registration(&self, registration: &str) -> DomainResult<Vec<Administrator>> {
        Ok(self
            .admins
            .find_where(REGISTRATION_FIELD, registration)
            .await?
            .into_iter()
            .map(Administrator::from_stored)
            .collect())
    }

    pub async fn update(&self, command: UpdateAdministratorCommand) -> DomainResult<Administrator> {
        info!("Updating administrator: {}", command.admin_id);

        let existing = self.get_stored(&command.admin_id).await?;

        let mut patch = AdministratorPatch {
            name: command
                .name
                .as_deref()
                .map(|v| validation::non_empty("name", v))
                .transpose()?,
            email: command.email.as_deref().map(validation::email).transpose()?,
            registration: command
                .registration
                .as_deref()
                .map(|v| validation::registration("registration", v, 3, 20))
                .transpose()?,
            role: validation::clearable_text(command.role),
            unit: validation::clearable_text(command.unit),
            ..Default::default()
        };

        if let Some(new_password) = command.password.as_deref() {
            patch.password_hash = Some(password::hash_password(validation::password(new_password)?)?);
        }

        let _guards = self
            .lock_identity(patch.email.as_deref(), patch.registration.as_deref())
            .await;
        if let Some(email) = &patch.email {
            self.ensure_email_free(email, Some(&existing.id)).await?;
        }
        if let Some(registration) = &patch.registration {
            self.ensure_registration_free(registration, Some(&existing.id)).await?;
        }

        self.admins.update(&existing.id, &patch).await?;
        info!("Updated administrator with ID: {}", existing.id);

        self.find_by_id(&existing.id).await
    }

    pub async fn delete(&self, admin_id: &str) -> DomainResult<()> {
        info!("Deleting administrator: {}", admin_id);

        self.get_stored(admin_id).await?;
        self.admins.delete(admin_id).await?;

        info!("Deleted administrator with ID: {}", admin_id);
        Ok(())
    }

    /// Activate or deactivate an account; inactive accounts cannot log in
    pub async fn set_status(&self, command: SetAdministratorStatusCommand) -> DomainResult<Administrator> {
        info!("Setting administrator {} active={}", command.admin_id, command.active);

        let existing = self.get_stored(&command.admin_id).await?;
        let patch = AdministratorPatch {
            active: Some(command.active),
            ..Default::default()
        };
        self.admins.update(&existing.id, &patch).await?;

        self.find_by_id(&existing.id).await
    }

    /// Check credentials and stamp the login time
    ///
    /// `None` for an unknown email, a wrong password or an inactive account;
    /// callers cannot tell which.
    pub async fn login(&self, command: LoginCommand) -> DomainResult<Option<Administrator>> {
        info!("Login attempt for {}", command.email);

        let stored = self
            .admins
            .find_where(EMAIL_FIELD, command.email.as_str())
            .await?
            .into_iter()
            .next();

        let stored = match stored {
            Some(stored) => stored,
            None => {
                warn!("Login rejected: unknown email {}", command.email);
                return Ok(None);
            }
        };

        if !stored.record.active {
            warn!("Login rejected: administrator {} is inactive", stored.id);
            return Ok(None);
        }
        if !password::verify_password(&command.password, &stored.record.password_hash) {
            warn!("Login rejected: wrong password for administrator {}", stored.id);
            return Ok(None);
        }

        let patch = AdministratorPatch {
            last_login_at: Some(timestamps::now_rfc3339()),
            ..Default::default()
        };
        self.admins.update(&stored.id, &patch).await?;
        info!("Administrator {} logged in", stored.id);

        self.find_by_id(&stored.id).await.map(Some)
    }

    async fn get_stored(&self, admin_id: &str) -> DomainResult<Stored<AdministratorRecord>> {
        match self.admins.get(admin_id).await? {
            Some(stored) => Ok(stored),
            None => {
                warn!("Administrator not found: {}", admin_id);
                Err(DomainError::not_found(format!(
                    "Administrator with ID {admin_id} not found"
                )))
            }
        }
    }

    async fn lock_identity(&self, email: Option<&str>, registration: Option<&str>) -> Vec<KeyGuard> {
        let mut keys = Vec::new();
        if let Some(email) = email {
            keys.push(format!("{}:email:{}", collections::ADMINISTRATORS, email));
        }
        if let Some(registration) = registration {
            keys.push(format!("{}:registration:{}", collections::ADMINISTRATORS, registration));
        }
        self.locks.acquire_many(&keys).await
    }

    async fn ensure_email_free(&self, email: &str, exclude_id: Option<&str>) -> DomainResult<()> {
        let taken = self
            .admins
            .find_where(EMAIL_FIELD, email)
            .await?
            .iter()
            .any(|stored| Some(stored.id.as_str()) != exclude_id);

        if taken {
            return Err(DomainError::validation(
                "An administrator with this email already exists",
            ));
        }
        Ok(())
    }

    async fn ensure_registration_free(
        &self,
        registration: &str,
        exclude_id: Option<&str>,
    ) -> DomainResult<()> {
        let taken = self
            .admins
            .find_where(REGISTRATION_FIELD, registration)
            .await?
            .iter()
            .any(|stored| Some(stored.id.as_str()) != exclude_id);

        if taken {
            return Err(DomainError::validation(
                "An administrator with this registration already exists",
            ));
        }
        Ok(())
    }
}
