use crate::domain::commands::admin::{
    CreateAdministratorCommand, LoginCommand, SetAdministratorStatusCommand,
    UpdateAdministratorCommand,
};
use crate::domain::models::administrator::Administrator as DomainAdministrator;
use shared::{
    Administrator as SharedAdministrator, CreateAdministratorRequest, LoginRequest,
    SetAdministratorStatusRequest, UpdateAdministratorRequest,
};

/// Mapper between shared Administrator DTOs and domain models.
///
/// The domain model carries no credential hash, so nothing here can leak one.
pub struct AdminMapper;

impl AdminMapper {
    pub fn to_create_command(request: CreateAdministratorRequest) -> CreateAdministratorCommand {
        CreateAdministratorCommand {
            name: request.name,
            email: request.email,
            password: request.password,
            registration: request.registration,
            role: request.role,
            unit: request.unit,
        }
    }

    pub fn to_update_command(
        admin_id: String,
        request: UpdateAdministratorRequest,
    ) -> UpdateAdministratorCommand {
        UpdateAdministratorCommand {
            admin_id,
            name: request.name,
            email: request.email,
            password: request.password,
            registration: request.registration,
            role: request.role,
            unit: request.unit,
        }
    }

    pub fn to_login_command(request: LoginRequest) -> LoginCommand {
        LoginCommand {
            email: request.email,
            password: request.password,
        }
    }

    pub fn to_status_command(
        admin_id: String,
        request: SetAdministratorStatusRequest,
    ) -> SetAdministratorStatusCommand {
        SetAdministratorStatusCommand {
            admin_id,
            active: request.active,
        }
    }

    pub fn to_dto(domain: DomainAdministrator) -> SharedAdministrator {
        SharedAdministrator {
            id: domain.id,
            name: domain.name,
            email: domain.email,
            registration: domain.registration,
            role: domain.role,
            unit: domain.unit,
            active: domain.active,
            last_login_at: domain.last_login_at.map(|at| at.to_rfc3339()),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainAdministrator>) -> Vec<SharedAdministrator> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
