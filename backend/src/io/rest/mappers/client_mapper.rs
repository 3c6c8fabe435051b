use crate::domain::commands::client::{CreateClientCommand, UpdateClientCommand};
use crate::domain::models::client::Client as DomainClient;
use crate::domain::timestamps::DATE_FORMAT;
use shared::{Client as SharedClient, CreateClientRequest, UpdateClientRequest};

/// Mapper between shared Client DTOs and domain Client models.
pub struct ClientMapper;

impl ClientMapper {
    pub fn to_create_command(request: CreateClientRequest) -> CreateClientCommand {
        CreateClientCommand {
            name: request.name,
            birth_date: request.birth_date,
            street: request.street,
            number: request.number,
            district: request.district,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            complement: request.complement,
        }
    }

    pub fn to_update_command(client_id: String, request: UpdateClientRequest) -> UpdateClientCommand {
        UpdateClientCommand {
            client_id,
            name: request.name,
            birth_date: request.birth_date,
            street: request.street,
            number: request.number,
            district: request.district,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            complement: request.complement,
        }
    }

    /// Converts a domain Client model to a shared Client DTO.
    pub fn to_dto(domain: DomainClient) -> SharedClient {
        SharedClient {
            id: domain.id,
            name: domain.name,
            birth_date: domain.birth_date.format(DATE_FORMAT).to_string(),
            street: domain.street,
            number: domain.number,
            district: domain.district,
            city: domain.city,
            state: domain.state,
            postal_code: domain.postal_code,
            complement: domain.complement,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainClient>) -> Vec<SharedClient> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
