//! Fixtures for service tests: a temp-dir store with every service wired up.

use std::ops::Deref;

use chrono::{Duration, Local, NaiveDate};

use crate::domain::commands::activity::CreateActivityCommand;
use crate::domain::commands::client::CreateClientCommand;
use crate::domain::commands::enrollment::CreateEnrollmentCommand;
use crate::domain::commands::guardian::CreateGuardianCommand;
use crate::domain::models::activity::Activity;
use crate::domain::models::client::Client;
use crate::domain::models::enrollment::Enrollment;
use crate::domain::models::guardian::Guardian;
use crate::domain::DomainServices;
use crate::storage::yaml::test_utils::TestEnvironment;
use crate::storage::KeyedLocks;

/// Services over a throwaway data directory, removed on drop
pub struct TestServices {
    pub env: TestEnvironment,
    services: DomainServices,
}

impl Deref for TestServices {
    type Target = DomainServices;

    fn deref(&self) -> &Self::Target {
        &self.services
    }
}

impl TestServices {
    pub fn new() -> Self {
        let env = TestEnvironment::new().unwrap();
        let services = DomainServices::new(env.record_store(), KeyedLocks::new());
        Self { env, services }
    }

    pub async fn create_client(&self, name: &str) -> Client {
        self.clients
            .create(client_command(name, "2010-05-20"))
            .await
            .unwrap()
    }

    pub async fn create_guardian(&self, name: &str, registration: &str) -> Guardian {
        self.guardians
            .create(CreateGuardianCommand {
                name: name.to_string(),
                registration: registration.to_string(),
                client_id: None,
            })
            .await
            .unwrap()
    }

    /// Activity in the default unit with a fresh responsible guardian
    pub async fn create_activity(&self, name: &str) -> Activity {
        let registration = format!("G{}", uuid::Uuid::new_v4().simple())[..12].to_uppercase();
        let guardian = self.create_guardian("Carlos Lima", &registration).await;
        self.activities
            .create(activity_command(name, "Unidade Centro", &guardian.id))
            .await
            .unwrap()
    }

    /// Active enrollment starting today
    pub async fn enroll(&self, client_id: &str, activity_id: &str) -> Enrollment {
        self.enrollments
            .create(enrollment_command(client_id, activity_id, &date_str(today())))
            .await
            .unwrap()
    }
}

pub fn client_command(name: &str, birth_date: &str) -> CreateClientCommand {
    CreateClientCommand {
        name: name.to_string(),
        birth_date: birth_date.to_string(),
        street: "Rua das Flores".to_string(),
        number: "123".to_string(),
        district: "Boa Vista".to_string(),
        city: "Recife".to_string(),
        state: "PE".to_string(),
        postal_code: "50000-000".to_string(),
        complement: Some("Apto 101".to_string()),
    }
}

pub fn activity_command(name: &str, unit: &str, responsible_id: &str) -> CreateActivityCommand {
    CreateActivityCommand {
        name: name.to_string(),
        description: "Weekly sessions for beginners".to_string(),
        unit: unit.to_string(),
        responsible_id: responsible_id.to_string(),
        capacity: Some(20),
    }
}

pub fn enrollment_command(client_id: &str, activity_id: &str, start_date: &str) -> CreateEnrollmentCommand {
    CreateEnrollmentCommand {
        client_id: client_id.to_string(),
        activity_id: activity_id.to_string(),
        start_date: start_date.to_string(),
        end_date: None,
        status: None,
        notes: None,
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn date_str(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
