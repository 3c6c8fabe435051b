use crate::domain::commands::activity::{CreateActivityCommand, UpdateActivityCommand};
use crate::domain::models::activity::Activity as DomainActivity;
use crate::io::rest::mappers::guardian_mapper::GuardianMapper;
use shared::{Activity as SharedActivity, CreateActivityRequest, UpdateActivityRequest};

/// Mapper between shared Activity DTOs and domain Activity models.
pub struct ActivityMapper;

impl ActivityMapper {
    pub fn to_create_command(request: CreateActivityRequest) -> CreateActivityCommand {
        CreateActivityCommand {
            name: request.name,
            description: request.description,
            unit: request.unit,
            responsible_id: request.responsible_id,
            capacity: request.capacity,
        }
    }

    pub fn to_update_command(activity_id: String, request: UpdateActivityRequest) -> UpdateActivityCommand {
        UpdateActivityCommand {
            activity_id,
            name: request.name,
            description: request.description,
            unit: request.unit,
            responsible_id: request.responsible_id,
            capacity: request.capacity,
        }
    }

    /// Converts a domain Activity, with its embedded guardian if any, to the shared DTO.
    pub fn to_dto(domain: DomainActivity) -> SharedActivity {
        SharedActivity {
            id: domain.id,
            name: domain.name,
            description: domain.description,
            unit: domain.unit,
            responsible_id: domain.responsible_id,
            capacity: domain.capacity,
            responsible: domain.responsible.map(GuardianMapper::to_dto),
            total_enrollments: domain.total_enrollments,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainActivity>) -> Vec<SharedActivity> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
