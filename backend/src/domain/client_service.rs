use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::commands::client::{CreateClientCommand, UpdateClientCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::lookups::ClientLookup;
use crate::domain::models::client::{Client, ClientPatch, ClientRecord, NAME_FIELD};
use crate::domain::models::enrollment::{EnrollmentRecord, CLIENT_ID_FIELD};
use crate::domain::{timestamps, validation};
use crate::storage::{collections, Collection, KeyedLocks, RecordStore};

/// Service for managing registered clients
#[derive(Clone)]
pub struct ClientService {
    clients: Collection<ClientRecord>,
    enrollments: Collection<EnrollmentRecord>,
    locks: KeyedLocks,
}

impl ClientService {
    pub fn new(store: Arc<dyn RecordStore>, locks: KeyedLocks) -> Self {
        Self {
            clients: Collection::new(store.clone(), collections::CLIENTS),
            enrollments: Collection::new(store, collections::ENROLLMENTS),
            locks,
        }
    }

    /// Register a new client; (name, birth date) must not already be taken
    pub async fn create(&self, command: CreateClientCommand) -> DomainResult<Client> {
        info!("Creating client: name={}, birth_date={}", command.name, command.birth_date);

        let record = ClientRecord {
            name: validation::text("name", &command.name, 2, 100)?,
            birth_date: timestamps::parse_date("birth_date", &command.birth_date)?,
            street: validation::text("street", &command.street, 5, 100)?,
            number: validation::non_empty("number", &command.number)?,
            district: validation::text("district", &command.district, 2, 50)?,
            city: validation::text("city", &command.city, 2, 50)?,
            state: validation::state(&command.state)?,
            postal_code: validation::postal_code(&command.postal_code)?,
            complement: validation::optional_text(command.complement),
        };

        let _guard = self
            .locks
            .acquire(&Self::identity_key(&record.name, &record.birth_date.to_string()))
            .await;
        self.ensure_unique(&record.name, &record.birth_date.to_string(), None)
            .await?;

        let id = self.clients.insert(&record).await?;
        info!("Created client: {} with ID: {}", record.name, id);

        self.find_by_id(&id).await
    }

    pub async fn find_all(&self) -> DomainResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .clients
            .list()
            .await?
            .into_iter()
            .map(Client::from_stored)
            .collect();

        info!("Found {} clients", clients.len());
        Ok(clients)
    }

    pub async fn find_by_id(&self, client_id: &str) -> DomainResult<Client> {
        match self.clients.get(client_id).await? {
            Some(stored) => Ok(Client::from_stored(stored)),
            None => {
                warn!("Client not found: {}", client_id);
                Err(DomainError::not_found(format!("Client with ID {client_id} not found")))
            }
        }
    }

    /// Case-insensitive substring match over every client
    pub async fn find_by_name(&self, name: &str) -> DomainResult<Vec<Client>> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|client| client.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn update(&self, command: UpdateClientCommand) -> DomainResult<Client> {
        info!("Updating client: {}", command.client_id);

        let existing = self.find_by_id(&command.client_id).await?;

        let patch = ClientPatch {
            name: command
                .name
                .as_deref()
                .map(|v| validation::text("name", v, 2, 100))
                .transpose()?,
            birth_date: command
                .birth_date
                .as_deref()
                .map(|v| timestamps::parse_date("birth_date", v))
                .transpose()?,
            street: command
                .street
                .as_deref()
                .map(|v| validation::text("street", v, 5, 100))
                .transpose()?,
            number: command
                .number
                .as_deref()
                .map(|v| validation::non_empty("number", v))
                .transpose()?,
            district: command
                .district
                .as_deref()
                .map(|v| validation::text("district", v, 2, 50))
                .transpose()?,
            city: command
                .city
                .as_deref()
                .map(|v| validation::text("city", v, 2, 50))
                .transpose()?,
            state: command.state.as_deref().map(validation::state).transpose()?,
            postal_code: command
                .postal_code
                .as_deref()
                .map(validation::postal_code)
                .transpose()?,
            complement: validation::clearable_text(command.complement),
        };

        let _guard = if patch.name.is_some() || patch.birth_date.is_some() {
            let name = patch.name.clone().unwrap_or(existing.name.clone());
            let birth_date = patch.birth_date.unwrap_or(existing.birth_date).to_string();

            let guard = self.locks.acquire(&Self::identity_key(&name, &birth_date)).await;
            self.ensure_unique(&name, &birth_date, Some(&existing.id)).await?;
            Some(guard)
        } else {
            None
        };

        self.clients.update(&existing.id, &patch).await?;
        info!("Updated client with ID: {}", existing.id);

        self.find_by_id(&existing.id).await
    }

    /// Remove a client that no enrollment references
    pub async fn delete(&self, client_id: &str) -> DomainResult<()> {
        info!("Deleting client: {}", client_id);

        let client = self.find_by_id(client_id).await?;

        let enrollments = self.enrollments.count_where(CLIENT_ID_FIELD, client_id).await?;
        if enrollments > 0 {
            warn!("Refusing to delete client {} with {} enrollments", client_id, enrollments);
            return Err(DomainError::validation(
                "Cannot delete client with existing enrollments",
            ));
        }

        self.clients.delete(client_id).await?;
        info!("Deleted client: {} with ID: {}", client.name, client.id);
        Ok(())
    }

    fn identity_key(name: &str, birth_date: &str) -> String {
        format!("{}:{}|{}", collections::CLIENTS, name, birth_date)
    }

    async fn ensure_unique(
        &self,
        name: &str,
        birth_date: &str,
        exclude_id: Option<&str>,
    ) -> DomainResult<()> {
        let duplicate = self
            .clients
            .find_where(NAME_FIELD, name)
            .await?
            .into_iter()
            .any(|stored| {
                stored.record.birth_date.to_string() == birth_date
                    && Some(stored.id.as_str()) != exclude_id
            });

        if duplicate {
            return Err(DomainError::validation(
                "A client with this name and birth_date already exists",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ClientLookup for ClientService {
    async fn find_client(&self, client_id: &str) -> DomainResult<Client> {
        self.find_by_id(client_id).await
    }
}
