use crate::domain::commands::guardian::{CreateGuardianCommand, UpdateGuardianCommand};
use crate::domain::models::guardian::Guardian as DomainGuardian;
use shared::{CreateGuardianRequest, Guardian as SharedGuardian, UpdateGuardianRequest};

pub struct GuardianMapper;

impl GuardianMapper {
    pub fn to_create_command(request: CreateGuardianRequest) -> CreateGuardianCommand {
        CreateGuardianCommand {
            name: request.name,
            registration: request.registration,
            client_id: request.client_id,
        }
    }

    pub fn to_update_command(guardian_id: String, request: UpdateGuardianRequest) -> UpdateGuardianCommand {
        UpdateGuardianCommand {
            guardian_id,
            name: request.name,
            registration: request.registration,
            client_id: request.client_id,
        }
    }

    pub fn to_dto(domain: DomainGuardian) -> SharedGuardian {
        SharedGuardian {
            id: domain.id,
            name: domain.name,
            registration: domain.registration,
            client_id: domain.client_id,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainGuardian>) -> Vec<SharedGuardian> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
