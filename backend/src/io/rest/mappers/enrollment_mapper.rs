use crate::domain::commands::enrollment::{
    CancelEnrollmentCommand, CreateEnrollmentCommand, UpdateEnrollmentCommand,
};
use crate::domain::models::enrollment::Enrollment as DomainEnrollment;
use crate::domain::timestamps::DATE_FORMAT;
use crate::io::rest::mappers::activity_mapper::ActivityMapper;
use crate::io::rest::mappers::client_mapper::ClientMapper;
use shared::{
    CancelEnrollmentRequest, CreateEnrollmentRequest, Enrollment as SharedEnrollment,
    UpdateEnrollmentRequest,
};

/// Mapper between shared Enrollment DTOs and domain Enrollment models.
pub struct EnrollmentMapper;

impl EnrollmentMapper {
    pub fn to_create_command(request: CreateEnrollmentRequest) -> CreateEnrollmentCommand {
        CreateEnrollmentCommand {
            client_id: request.client_id,
            activity_id: request.activity_id,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            notes: request.notes,
        }
    }

    pub fn to_update_command(
        enrollment_id: String,
        request: UpdateEnrollmentRequest,
    ) -> UpdateEnrollmentCommand {
        UpdateEnrollmentCommand {
            enrollment_id,
            client_id: request.client_id,
            activity_id: request.activity_id,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            notes: request.notes,
        }
    }

    pub fn to_cancel_command(
        enrollment_id: String,
        request: CancelEnrollmentRequest,
    ) -> CancelEnrollmentCommand {
        CancelEnrollmentCommand {
            enrollment_id,
            reason: request.reason,
        }
    }

    pub fn to_dto(domain: DomainEnrollment) -> SharedEnrollment {
        SharedEnrollment {
            id: domain.id,
            client_id: domain.client_id,
            activity_id: domain.activity_id,
            start_date: domain.start_date.format(DATE_FORMAT).to_string(),
            end_date: domain.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
            status: domain.status,
            notes: domain.notes,
            client: domain.client.map(ClientMapper::to_dto),
            activity: domain.activity.map(ActivityMapper::to_dto),
            enrolled_at: domain.enrolled_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainEnrollment>) -> Vec<SharedEnrollment> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
