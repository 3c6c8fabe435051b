use crate::domain::commands::evaluation::{
    CreateEvaluationCommand, RespondEvaluationCommand, UpdateEvaluationCommand,
};
use crate::domain::models::evaluation::{
    CategoryCounts as DomainCategoryCounts, Evaluation as DomainEvaluation,
    EvaluationStats as DomainEvaluationStats,
};
use crate::io::rest::mappers::activity_mapper::ActivityMapper;
use crate::io::rest::mappers::client_mapper::ClientMapper;
use shared::{
    CategoryCounts, CreateEvaluationRequest, Evaluation as SharedEvaluation, EvaluationStats,
    RespondEvaluationRequest, UpdateEvaluationRequest,
};

/// Mapper between shared Evaluation DTOs and domain Evaluation models.
pub struct EvaluationMapper;

impl EvaluationMapper {
    pub fn to_create_command(request: CreateEvaluationRequest) -> CreateEvaluationCommand {
        CreateEvaluationCommand {
            client_id: request.client_id,
            activity_id: request.activity_id,
            category: request.category,
            title: request.title,
            body: request.body,
            rating: request.rating,
            unit: request.unit,
        }
    }

    pub fn to_update_command(
        evaluation_id: String,
        request: UpdateEvaluationRequest,
    ) -> UpdateEvaluationCommand {
        UpdateEvaluationCommand {
            evaluation_id,
            client_id: request.client_id,
            activity_id: request.activity_id,
            category: request.category,
            title: request.title,
            body: request.body,
            rating: request.rating,
            unit: request.unit,
        }
    }

    pub fn to_respond_command(
        evaluation_id: String,
        request: RespondEvaluationRequest,
    ) -> RespondEvaluationCommand {
        RespondEvaluationCommand {
            evaluation_id,
            response: request.response,
            responded_by: request.responded_by,
        }
    }

    pub fn to_dto(domain: DomainEvaluation) -> SharedEvaluation {
        SharedEvaluation {
            id: domain.id,
            client_id: domain.client_id,
            activity_id: domain.activity_id,
            category: domain.category,
            title: domain.title,
            body: domain.body,
            rating: domain.rating,
            unit: domain.unit,
            response: domain.response,
            responded_by: domain.responded_by,
            responded_at: domain.responded_at.map(|at| at.to_rfc3339()),
            client: domain.client.map(ClientMapper::to_dto),
            activity: domain.activity.map(ActivityMapper::to_dto),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainEvaluation>) -> Vec<SharedEvaluation> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_stats_dto(domain: DomainEvaluationStats) -> EvaluationStats {
        let DomainCategoryCounts {
            complaints,
            suggestions,
            compliments,
        } = domain.by_category;

        EvaluationStats {
            total: domain.total,
            by_category: CategoryCounts {
                complaints,
                suggestions,
                compliments,
            },
            responded: domain.responded,
            pending: domain.pending,
            average_rating: domain.average_rating,
        }
    }
}
