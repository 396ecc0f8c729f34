use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Multipart;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use jobboard::{CvAnalysisClient, CvAnalysisError};
use jobboard_common::config::CvAnalysisConfig;
use jobboard_common::identity::IdentityProvider;
use jobboard_common::identity::local::LocalIdentityProvider;
use jobboard_common::models::JobSkills;
use serde_json::{Value, json};

use crate::common::cv_file;

/// Echoes the bearer token and the multipart fields back with a fixed score.
async fn echo(headers: HeaderMap, mut multipart: Multipart) -> Json<Value> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();

    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap();
            fields.insert("file_name".into(), file_name.into());
            fields.insert("file_size".into(), bytes.len().into());
        } else {
            fields.insert(name, field.text().await.unwrap().into());
        }
    }

    Json(json!({"score": 87.5, "token": token, "fields": fields}))
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn signed_in_identity() -> Arc<LocalIdentityProvider> {
    let identity = Arc::new(LocalIdentityProvider::in_memory());
    identity
        .create_user("ana@example.com", "secret-password")
        .await
        .unwrap();
    identity
}

fn client(addr: SocketAddr, identity: Arc<LocalIdentityProvider>) -> CvAnalysisClient {
    let config = CvAnalysisConfig {
        base_url: format!("http://{addr}/"),
        timeout_secs: 5,
    };
    CvAnalysisClient::new(&config, identity).unwrap()
}

fn skills() -> JobSkills {
    JobSkills {
        programming_languages: vec!["Rust".into()],
        frameworks: vec!["Any".into()],
        certifications: vec!["Any".into()],
        tools: vec!["Docker".into()],
    }
}

#[tokio::test]
async fn posts_the_cv_and_job_requirements() {
    let addr = spawn(Router::new().route("/upload_cv", post(echo))).await;
    let identity = signed_in_identity().await;
    let uid = identity.current_user().unwrap().uid;

    let analysis = client(addr, identity.clone())
        .analyze(&cv_file(), &skills(), "1-2 years", "Backend Engineer")
        .await
        .unwrap();

    assert_eq!(analysis.score, Some(87.5));
    let token = analysis.details["token"].as_str().unwrap();
    assert_eq!(identity.verify_token(token).unwrap().sub, uid);

    let fields = &analysis.details["fields"];
    assert_eq!(fields["file_name"], "cv.pdf");
    assert_eq!(fields["file_size"], cv_file().bytes.len());
    assert_eq!(fields["job_required_experience"], "1-2 years");
    assert_eq!(fields["job_title"], "Backend Engineer");
    let requirements: JobSkills =
        serde_json::from_str(fields["job_requirements"].as_str().unwrap()).unwrap();
    assert_eq!(requirements, skills());
}

#[tokio::test]
async fn signed_out_session_is_refused_locally() {
    let addr = spawn(Router::new().route("/upload_cv", post(echo))).await;
    let identity = Arc::new(LocalIdentityProvider::in_memory());

    let result = client(addr, identity)
        .analyze(&cv_file(), &skills(), "1 year", "Backend Engineer")
        .await;

    assert!(matches!(result, Err(CvAnalysisError::NotAuthenticated)));
}

#[tokio::test]
async fn error_envelope_message_is_surfaced() {
    let router = Router::new().route(
        "/upload_cv",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Unsupported file type"})),
            )
        }),
    );
    let addr = spawn(router).await;

    let result = client(addr, signed_in_identity().await)
        .analyze(&cv_file(), &skills(), "1 year", "Backend Engineer")
        .await;

    match result {
        Err(CvAnalysisError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Unsupported file type");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn error_field_and_empty_bodies_are_handled() {
    let router = Router::new()
        .route(
            "/upload_cv",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))) }),
        );
    let addr = spawn(router).await;
    let result = client(addr, signed_in_identity().await)
        .analyze(&cv_file(), &skills(), "1 year", "Backend Engineer")
        .await;
    assert!(matches!(
        result,
        Err(CvAnalysisError::Rejected { status: 401, ref message }) if message == "Unauthorized"
    ));

    let router = Router::new().route("/upload_cv", post(|| async { StatusCode::BAD_GATEWAY }));
    let addr = spawn(router).await;
    let result = client(addr, signed_in_identity().await)
        .analyze(&cv_file(), &skills(), "1 year", "Backend Engineer")
        .await;
    assert!(matches!(
        result,
        Err(CvAnalysisError::Rejected { status: 502, ref message }) if message == "Failed to analyze CV"
    ));
}
