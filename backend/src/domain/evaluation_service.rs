use std::sync::Arc;

use shared::EvaluationCategory;
use tracing::{info, warn};

use crate::domain::commands::evaluation::{
    CreateEvaluationCommand, RespondEvaluationCommand, UpdateEvaluationCommand,
};
use crate::domain::commands::RelationOptions;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::lookups::{optional_relation, ActivityLookup, ClientLookup};
use crate::domain::models::evaluation::{
    CategoryCounts, Evaluation, EvaluationPatch, EvaluationRecord, EvaluationStats,
    ACTIVITY_ID_FIELD, CATEGORY_FIELD, CLIENT_ID_FIELD, UNIT_FIELD,
};
use crate::domain::{timestamps, validation};
use crate::storage::{collections, Collection, RecordStore, Stored};

/// Service for client feedback: complaints, suggestions and compliments
#[derive(Clone)]
pub struct EvaluationService {
    evaluations: Collection<EvaluationRecord>,
    clients: Arc<dyn ClientLookup>,
    activities: Arc<dyn ActivityLookup>,
}

impl EvaluationService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        clients: Arc<dyn ClientLookup>,
        activities: Arc<dyn ActivityLookup>,
    ) -> Self {
        Self {
            evaluations: Collection::new(store, collections::EVALUATIONS),
            clients,
            activities,
        }
    }

    pub async fn create(&self, command: CreateEvaluationCommand) -> DomainResult<Evaluation> {
        info!(
            "Creating evaluation: client={}, category={}",
            command.client_id, command.category
        );

        let record = EvaluationRecord {
            client_id: command.client_id,
            activity_id: validation::optional_text(command.activity_id),
            category: command.category,
            title: validation::text("title", &command.title, 5, 100)?,
            body: validation::text("body", &command.body, 10, 1000)?,
            rating: command.rating.map(validation::rating).transpose()?,
            unit: command
                .unit
                .as_deref()
                .map(|v| validation::text("unit", v, 5, 100))
                .transpose()?,
            response: None,
            responded_by: None,
            responded_at: None,
        };

        self.clients.find_client(&record.client_id).await?;
        if let Some(activity_id) = &record.activity_id {
            self.activities.find_activity(activity_id).await?;
        }

        let id = self.evaluations.insert(&record).await?;
        info!("Created evaluation: {} with ID: {}", record.title, id);

        self.find_by_id(&id, RelationOptions::all()).await
    }

    pub async fn find_all(&self, options: RelationOptions) -> DomainResult<Vec<Evaluation>> {
        let stored = self.evaluations.list().await?;
        let evaluations = self.enrich_all(stored, options).await?;

        info!("Found {} evaluations", evaluations.len());
        Ok(evaluations)
    }

    pub async fn find_by_id(
        &self,
        evaluation_id: &str,
        options: RelationOptions,
    ) -> DomainResult<Evaluation> {
        let stored = self.get_stored(evaluation_id).await?;
        self.enrich(stored, options).await
    }

    /// A client's evaluations, each with the activity it refers to
    pub async fn find_by_client(&self, client_id: &str) -> DomainResult<Vec<Evaluation>> {
        let stored = self.evaluations.find_where(CLIENT_ID_FIELD, client_id).await?;
        let options = RelationOptions {
            include_client: false,
            include_activity: true,
        };
        self.enrich_all(stored, options).await
    }

    /// An activity's evaluations, each with its author
    pub async fn find_by_activity(&self, activity_id: &str) -> DomainResult<Vec<Evaluation>> {
        let stored = self
            .evaluations
            .find_where(ACTIVITY_ID_FIELD, activity_id)
            .await?;
        let options = RelationOptions {
            include_client: true,
            include_activity: false,
        };
        self.enrich_all(stored, options).await
    }

    pub async fn find_by_category(&self, category: EvaluationCategory) -> DomainResult<Vec<Evaluation>> {
        let stored = self
            .evaluations
            .find_where(CATEGORY_FIELD, category.as_str())
            .await?;
        self.enrich_all(stored, RelationOptions::none()).await
    }

    pub async fn find_by_unit(&self, unit: &str) -> DomainResult<Vec<Evaluation>> {
        let stored = self.evaluations.find_where(UNIT_FIELD, unit).await?;
        self.enrich_all(stored, RelationOptions::none()).await
    }

    /// Evaluations still waiting for a response
    pub async fn find_unanswered(&self) -> DomainResult<Vec<Evaluation>> {
        Ok(self
            .find_all(RelationOptions::none())
            .await?
            .into_iter()
            .filter(|evaluation| !evaluation.is_responded())
            .collect())
    }

    pub async fn update(&self, command: UpdateEvaluationCommand) -> DomainResult<Evaluation> {
        info!("Updating evaluation: {}", command.evaluation_id);

        let existing = self.get_stored(&command.evaluation_id).await?;

        let patch = EvaluationPatch {
            client_id: command.client_id,
            activity_id: validation::clearable_text(command.activity_id),
            category: command.category,
            title: command
                .title
                .as_deref()
                .map(|v| validation::text("title", v, 5, 100))
                .transpose()?,
            body: command
                .body
                .as_deref()
                .map(|v| validation::text("body", v, 10, 1000))
                .transpose()?,
            rating: command.rating.map(validation::rating).transpose()?,
            unit: command
                .unit
                .as_deref()
                .map(|v| validation::text("unit", v, 5, 100))
                .transpose()?,
            ..Default::default()
        };

        if let Some(client_id) = &patch.client_id {
            self.clients.find_client(client_id).await?;
        }
        if let Some(Some(activity_id)) = &patch.activity_id {
            self.activities.find_activity(activity_id).await?;
        }

        self.evaluations.update(&existing.id, &patch).await?;
        info!("Updated evaluation with ID: {}", existing.id);

        self.find_by_id(&existing.id, RelationOptions::all()).await
    }

    /// Record a staff response and stamp when it was given
    pub async fn respond(&self, command: RespondEvaluationCommand) -> DomainResult<Evaluation> {
        info!(
            "Responding to evaluation {} as {}",
            command.evaluation_id, command.responded_by
        );

        let existing = self.get_stored(&command.evaluation_id).await?;

        let patch = EvaluationPatch {
            response: Some(validation::non_empty("response", &command.response)?),
            responded_by: Some(validation::non_empty("responded_by", &command.responded_by)?),
            responded_at: Some(timestamps::now_rfc3339()),
            ..Default::default()
        };

        self.evaluations.update(&existing.id, &patch).await?;
        info!("Responded to evaluation with ID: {}", existing.id);

        self.find_by_id(&existing.id, RelationOptions::all()).await
    }

    pub async fn delete(&self, evaluation_id: &str) -> DomainResult<()> {
        info!("Deleting evaluation: {}", evaluation_id);

        self.get_stored(evaluation_id).await?;
        self.evaluations.delete(evaluation_id).await?;

        info!("Deleted evaluation with ID: {}", evaluation_id);
        Ok(())
    }

    /// Totals over the whole collection; the rating average ignores unrated evaluations
    pub async fn stats(&self) -> DomainResult<EvaluationStats> {
        let evaluations = self.find_all(RelationOptions::none()).await?;

        let mut stats = EvaluationStats {
            total: evaluations.len(),
            ..Default::default()
        };
        let mut by_category = CategoryCounts::default();
        let mut rating_sum = 0u32;
        let mut rated = 0u32;

        for evaluation in &evaluations {
            match evaluation.category {
                EvaluationCategory::Complaint => by_category.complaints += 1,
                EvaluationCategory::Suggestion => by_category.suggestions += 1,
                EvaluationCategory::Compliment => by_category.compliments += 1,
            }
            if evaluation.is_responded() {
                stats.responded += 1;
            }
            if let Some(rating) = evaluation.rating {
                rating_sum += u32::from(rating);
                rated += 1;
            }
        }

        stats.by_category = by_category;
        stats.pending = stats.total - stats.responded;
        stats.average_rating = if rated == 0 {
            0.0
        } else {
            f64::from(rating_sum) / f64::from(rated)
        };

        Ok(stats)
    }

    async fn get_stored(&self, evaluation_id: &str) -> DomainResult<Stored<EvaluationRecord>> {
        match self.evaluations.get(evaluation_id).await? {
            Some(stored) => Ok(stored),
            None => {
                warn!("Evaluation not found: {}", evaluation_id);
                Err(DomainError::not_found(format!(
                    "Evaluation with ID {evaluation_id} not found"
                )))
            }
        }
    }

    async fn enrich(
        &self,
        stored: Stored<EvaluationRecord>,
        options: RelationOptions,
    ) -> DomainResult<Evaluation> {
        let mut evaluation = Evaluation::from_stored(stored);

        if options.include_client {
            evaluation.client =
                optional_relation(self.clients.find_client(&evaluation.client_id).await)?;
        }
        if options.include_activity {
            if let Some(activity_id) = &evaluation.activity_id {
                evaluation.activity =
                    optional_relation(self.activities.find_activity(activity_id).await)?;
            }
        }

        Ok(evaluation)
    }

    async fn enrich_all(
        &self,
        stored: Vec<Stored<EvaluationRecord>>,
        options: RelationOptions,
    ) -> DomainResult<Vec<Evaluation>> {
        let mut evaluations = Vec::with_capacity(stored.len());
        for item in stored {
            evaluations.push(self.enrich(item, options).await?);
        }
        Ok(evaluations)
    }
}
