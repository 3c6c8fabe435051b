//! End-to-end tests driving the router over a temp-dir record store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Local};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use registration_backend::storage::{RecordStore, YamlConnection, YamlDocumentStore};
use registration_backend::{create_router, AppState};

struct TestApp {
    router: Router,
    _temp_dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let connection = YamlConnection::new(temp_dir.path()).unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(YamlDocumentStore::new(connection));
        let origins = vec!["http://localhost:4200".to_string()];
        let router = create_router(AppState::new(store), &origins).unwrap();
        Self {
            router,
            _temp_dir: temp_dir,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_guardian(&self, registration: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/guardians",
                Some(json!({"name": "Carlos Lima", "registration": registration})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn create_activity(&self, responsible_id: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/activities",
                Some(json!({
                    "name": "Natacao Infantil",
                    "description": "Weekly sessions for beginners",
                    "unit": "Unidade Centro",
                    "responsible_id": responsible_id,
                    "capacity": 20
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn create_client(&self, name: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/clients",
                Some(json!({
                    "name": name,
                    "birth_date": "2010-05-20",
                    "street": "Rua das Flores",
                    "number": "123",
                    "district": "Boa Vista",
                    "city": "Recife",
                    "state": "PE",
                    "postal_code": "50000-000"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.send("GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_activity_create_embeds_responsible_and_rejects_missing_guardian() {
    let app = TestApp::new();
    let guardian = app.create_guardian("RESP001").await;
    let activity = app.create_activity(guardian["id"].as_str().unwrap()).await;

    assert_eq!(activity["responsible"]["registration"], "RESP001");
    assert_eq!(activity["total_enrollments"], 0);

    let (status, body) = app
        .send(
            "POST",
            "/api/activities",
            Some(json!({
                "name": "Judo Adulto",
                "description": "Evening classes",
                "unit": "Unidade Centro",
                "responsible_id": "ghost"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_enrollment_admission_and_cancel_flow() {
    let app = TestApp::new();
    let guardian = app.create_guardian("RESP001").await;
    let activity = app.create_activity(guardian["id"].as_str().unwrap()).await;
    let client = app.create_client("Maria Souza").await;

    let enrollment_body = json!({
        "client_id": client["id"],
        "activity_id": activity["id"],
        "start_date": today()
    });

    let (status, enrollment) = app
        .send("POST", "/api/enrollments", Some(enrollment_body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrollment["status"], "active");
    assert_eq!(enrollment["client"]["name"], "Maria Souza");

    let (status, body) = app
        .send("POST", "/api/enrollments", Some(enrollment_body.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let enrollment_id = enrollment["id"].as_str().unwrap();
    let (status, cancelled) = app
        .send(
            "PATCH",
            &format!("/api/enrollments/{enrollment_id}/cancel"),
            Some(json!({"reason": "Moved away"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(cancelled["notes"], "Moved away");

    let (status, _) = app.send("POST", "/api/enrollments", Some(enrollment_body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = app
        .send("GET", "/api/enrollments?status=cancelled", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, fetched) = app
        .send("GET", &format!("/api/activities/{}", activity["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(fetched["total_enrollments"], 2);
}

#[tokio::test]
async fn test_enrollment_date_guards() {
    let app = TestApp::new();
    let guardian = app.create_guardian("RESP001").await;
    let activity = app.create_activity(guardian["id"].as_str().unwrap()).await;
    let client = app.create_client("Maria Souza").await;

    let yesterday = (Local::now().date_naive() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    let (status, _) = app
        .send(
            "POST",
            "/api/enrollments",
            Some(json!({
                "client_id": client["id"],
                "activity_id": activity["id"],
                "start_date": yesterday
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            "/api/enrollments",
            Some(json!({
                "client_id": client["id"],
                "activity_id": activity["id"],
                "start_date": today(),
                "end_date": today()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_guards() {
    let app = TestApp::new();
    let guardian = app.create_guardian("RESP001").await;
    let guardian_id = guardian["id"].as_str().unwrap().to_string();
    let activity = app.create_activity(&guardian_id).await;
    let client = app.create_client("Maria Souza").await;
    let client_id = client["id"].as_str().unwrap().to_string();

    let (status, enrollment) = app
        .send(
            "POST",
            "/api/enrollments",
            Some(json!({
                "client_id": client_id,
                "activity_id": activity["id"],
                "start_date": today()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.send("DELETE", &format!("/api/clients/{client_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send("DELETE", &format!("/api/guardians/{guardian_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let enrollment_id = enrollment["id"].as_str().unwrap();
    let (status, _) = app
        .send("DELETE", &format!("/api/enrollments/{enrollment_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send("DELETE", &format!("/api/clients/{client_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = app.send("GET", &format!("/api/clients/{client_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_evaluation_respond_and_stats() {
    let app = TestApp::new();
    let client = app.create_client("Maria Souza").await;

    let (status, evaluation) = app
        .send(
            "POST",
            "/api/evaluations",
            Some(json!({
                "client_id": client["id"],
                "category": "complaint",
                "title": "Cold water",
                "body": "The pool water was too cold on Monday",
                "rating": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            "POST",
            "/api/evaluations",
            Some(json!({
                "client_id": client["id"],
                "category": "compliment",
                "title": "Great coach",
                "body": "The coach was patient with the kids",
                "rating": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let evaluation_id = evaluation["id"].as_str().unwrap();
    let (status, responded) = app
        .send(
            "PUT",
            &format!("/api/evaluations/{evaluation_id}/respond"),
            Some(json!({"response": "Heater fixed", "responded_by": "Paula Reis"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(responded["responded_at"].is_string());

    let (status, stats) = app.send("GET", "/api/evaluations/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["by_category"]["complaints"], 1);
    assert_eq!(stats["responded"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["average_rating"], 3.5);

    let (_, unanswered) = app.send("GET", "/api/evaluations?unanswered=true", None).await;
    assert_eq!(unanswered.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_login() {
    let app = TestApp::new();
    let (status, admin) = app
        .send(
            "POST",
            "/api/admins",
            Some(json!({
                "name": "Paula Reis",
                "email": "paula@example.com",
                "password": "secret123",
                "registration": "ADM001"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(admin.get("password").is_none());
    assert!(admin.get("password_hash").is_none());

    let (status, body) = app
        .send(
            "POST",
            "/api/admins/login",
            Some(json!({"email": "paula@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, logged_in) = app
        .send(
            "POST",
            "/api/admins/login",
            Some(json!({"email": "paula@example.com", "password": "secret123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(logged_in["last_login_at"].is_string());

    let admin_id = admin["id"].as_str().unwrap();
    let (status, _) = app
        .send("PUT", &format!("/api/admins/{admin_id}/status"), Some(json!({"active": false})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            "POST",
            "/api/admins/login",
            Some(json!({"email": "paula@example.com", "password": "secret123"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_fields_are_rejected_before_the_domain() {
    let app = TestApp::new();
    let (status, _) = app
        .send(
            "POST",
            "/api/guardians",
            Some(json!({"name": "Carlos Lima", "registration": "RESP001", "nickname": "Cal"})),
        )
        .await;
    assert!(status.is_client_error());

    let (_, guardians) = app.send("GET", "/api/guardians", None).await;
    assert!(guardians.as_array().unwrap().is_empty());
}
