//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use campusflow_api::{AppState, home, middleware::auth_middleware, router as api_router};
use campusflow_common::{AppError, AppResult};
use campusflow_core::{
    AdminCodeService, DirectoryService, DisruptionService, IdentityClaims, IdentityVerifier,
    MockToneAnnotator, ToneAnnotator,
};
use campusflow_db::entities::disruption::{Priority, Status};
use campusflow_db::entities::{audit_log, department, disruption, disruption_image, user};
use campusflow_db::repositories::{
    AdminCodeRepository, AuditLogRepository, DepartmentRepository, DisruptionRepository,
    NotificationRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use tower::ServiceExt;

/// Verifier that accepts two fixed test tokens.
struct TestVerifier;

#[async_trait]
impl IdentityVerifier for TestVerifier {
    async fn verify(&self, token: &str) -> AppResult<IdentityClaims> {
        match token {
            "student-token" => Ok(IdentityClaims {
                sub: "uid-student".to_string(),
                email: Some("alice@college.edu".to_string()),
                name: Some("Alice".to_string()),
                role: None,
                admin: None,
                exp: None,
            }),
            "admin-token" => Ok(IdentityClaims {
                sub: "uid-admin".to_string(),
                email: Some("admin@college.edu".to_string()),
                name: Some("Pat".to_string()),
                role: Some("admin".to_string()),
                admin: None,
                exp: None,
            }),
            _ => Err(AppError::Unauthorized),
        }
    }
}

fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

fn test_student() -> user::Model {
    user::Model {
        id: "student1".to_string(),
        auth_uid: Some("uid-student".to_string()),
        email: "alice@college.edu".to_string(),
        role: user::Role::Student,
        admin_department: None,
        name: Some("Alice".to_string()),
        is_active: true,
        created_at: chrono::Utc::now().into(),
        last_login: None,
    }
}

fn test_admin() -> user::Model {
    user::Model {
        id: "admin1".to_string(),
        auth_uid: Some("uid-admin".to_string()),
        email: "admin@college.edu".to_string(),
        role: user::Role::Admin,
        admin_department: Some("it".to_string()),
        name: Some("Pat".to_string()),
        is_active: true,
        created_at: chrono::Utc::now().into(),
        last_login: None,
    }
}

fn test_department() -> department::Model {
    department::Model {
        id: "it".to_string(),
        name: "IT Department".to_string(),
    }
}

fn test_disruption(status: Status) -> disruption::Model {
    disruption::Model {
        id: "d1".to_string(),
        disruption_id: "DIS-100".to_string(),
        student_id: "student1".to_string(),
        student_name: Some("Alice".to_string()),
        student_email: Some("alice@college.edu".to_string()),
        category: "it".to_string(),
        priority: Priority::Low,
        description: "printer broken".to_string(),
        status,
        ai_tone: None,
        ai_confidence: None,
        ai_recommendation: None,
        created_at: chrono::Utc::now().into(),
        updated_at: None,
        resolved_at: None,
        resolved_by: None,
        is_deleted: false,
    }
}

fn test_audit_row() -> audit_log::Model {
    audit_log::Model {
        id: "a1".to_string(),
        actor_id: Some("student1".to_string()),
        action: "disruption.create".to_string(),
        target_table: Some("disruption".to_string()),
        target_id: Some("DIS-100".to_string()),
        meta: None,
        created_at: chrono::Utc::now().into(),
    }
}

/// Build the app against a mock database.
fn build_app(db: Arc<DatabaseConnection>) -> Router {
    let user_repo = UserRepository::new(Arc::clone(&db));
    let disruption_repo = DisruptionRepository::new(Arc::clone(&db));
    let department_repo = DepartmentRepository::new(Arc::clone(&db));
    let audit_repo = AuditLogRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let admin_code_repo = AdminCodeRepository::new(Arc::clone(&db));

    let directory_service = DirectoryService::new(user_repo.clone());
    let annotator: Arc<dyn ToneAnnotator> = Arc::new(MockToneAnnotator::new());

    let disruption_service = DisruptionService::new(
        disruption_repo,
        department_repo,
        audit_repo,
        notification_repo,
        directory_service.clone(),
        Arc::clone(&annotator),
        Duration::from_millis(100),
    );
    let admin_code_service = AdminCodeService::new(admin_code_repo, user_repo);

    let state = AppState {
        disruption_service,
        directory_service,
        admin_code_service,
        annotator,
        identity_verifier: Arc::new(TestVerifier),
    };

    Router::new()
        .route("/", get(home))
        .nest("/api", api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_home_banner() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let app = build_app(db);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "CampusFlow API is running");
}

#[tokio::test]
async fn test_create_disruption_requires_auth() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/disruptions")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"disruptionId":"DIS-100"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_disruption_invalid_token_is_unauthorized() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/disruptions")
                .header("Authorization", "Bearer forged-token")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"disruptionId":"DIS-100"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_disruption_returns_201_with_business_id() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor by auth_uid
            .append_query_results([[test_student()]])
            // service: category exists
            .append_query_results([[test_department()]])
            // no duplicate business id
            .append_query_results([Vec::<disruption::Model>::new()])
            // directory: found by auth_uid
            .append_query_results([[test_student()]])
            // disruption insert returning
            .append_query_results([[test_disruption(Status::Pending)]])
            // audit insert returning
            .append_query_results([[test_audit_row()]])
            .append_exec_results([exec_ok(), exec_ok(), exec_ok(), exec_ok()])
            .into_connection(),
    );
    let app = build_app(db);

    let payload = serde_json::json!({
        "disruptionId": "DIS-100",
        "studentName": "Alice",
        "studentEmail": "alice@college.edu",
        "category": "it",
        "priority": "low",
        "description": "printer broken",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/disruptions")
                .header("Authorization", "Bearer student-token")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["disruptionId"], "DIS-100");
    // The mock annotator always answers in time
    assert!(body["aiToneAnalysis"]["tone"].is_string());
}

#[tokio::test]
async fn test_create_disruption_missing_field_is_400() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor
            .append_query_results([[test_student()]])
            .into_connection(),
    );
    let app = build_app(db);

    let payload = serde_json::json!({
        "disruptionId": "DIS-100",
        "studentName": "Alice",
        // studentEmail, category, priority, description missing
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/disruptions")
                .header("Authorization", "Bearer student-token")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_disruption_is_public() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_disruption(Status::Pending)]])
            .append_query_results([Vec::<disruption_image::Model>::new()])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/disruptions/DIS-100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["disruptionId"], "DIS-100");
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn test_get_unknown_disruption_is_404() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<disruption::Model>::new()])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/disruptions/DIS-404")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_cannot_list_another_students_disruptions() {
    let other = user::Model {
        id: "student2".to_string(),
        auth_uid: Some("uid-other".to_string()),
        email: "bob@college.edu".to_string(),
        ..test_student()
    };

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor
            .append_query_results([[test_student()]])
            // service: target resolves by local id
            .append_query_results([[other]])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/disruptions/student/student2")
                .header("Authorization", "Bearer student-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_lists_own_disruptions() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor
            .append_query_results([[test_student()]])
            // service: target resolves by local id
            .append_query_results([[test_student()]])
            // listing
            .append_query_results([[test_disruption(Status::Pending)]])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/disruptions/student/student1")
                .header("Authorization", "Bearer student-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["disruptionId"], "DIS-100");
}

#[tokio::test]
async fn test_category_listing_requires_admin() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor (a student)
            .append_query_results([[test_student()]])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/disruptions/admin/it")
                .header("Authorization", "Bearer student-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_category_listing_as_admin() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor
            .append_query_results([[test_admin()]])
            // listing
            .append_query_results([[test_disruption(Status::Pending)]])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/disruptions/admin/it")
                .header("Authorization", "Bearer admin-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["studentName"], "Alice");
}

#[tokio::test]
async fn test_resolve_as_student_is_forbidden() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor (a student)
            .append_query_results([[test_student()]])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/disruptions/DIS-100/resolve")
                .header("Authorization", "Bearer student-token")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"resolutionDescription":"done"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_resolve_already_resolved_is_409() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor
            .append_query_results([[test_admin()]])
            // transactional resolve finds an already-resolved row
            .append_query_results([[test_disruption(Status::Resolved)]])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/disruptions/DIS-100/resolve")
                .header("Authorization", "Bearer admin-token")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"resolutionDescription":"again"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_analyze_tone_is_public() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze-tone")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"description":"water leak near the library"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["tone"].is_string());
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn test_upload_resolution_image_requires_admin() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor (a student)
            .append_query_results([[test_student()]])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload/resolution-image")
                .header("Authorization", "Bearer student-token")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"filename":"fixed.jpg"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upload_disruption_image_synthesizes_url() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            // middleware: resolve actor
            .append_query_results([[test_student()]])
            .into_connection(),
    );
    let app = build_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload/disruption-image")
                .header("Authorization", "Bearer student-token")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"filename":"leak.jpg"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("https://storage.campusflow.example/disruption/"));
    assert!(url.ends_with("-leak.jpg"));
}
