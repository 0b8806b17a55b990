use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use fieldops_application::{
    PermissionSource, PermissionStore, RedirectReason, RouteGuard, RouteOutcome, SessionRepository,
};
use fieldops_core::{AppError, NonEmptyString, RoleId, RoleReference, UserSession};
use fieldops_domain::{ConsoleComponent, PermissionAction, PermissionStatus};
use serde_json::json;
use url::Url;

use super::HttpPermissionSource;
use crate::{ConsoleNotifier, DurableStorage};

#[derive(Clone, Default)]
struct BackendState {
    calls: Arc<AtomicUsize>,
}

async fn role_permissions(
    State(state): State<BackendState>,
    Path(role_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some("Bearer token-1");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing bearer token").into_response();
    }

    match role_id.as_str() {
        "R1" => Json(json!({
            "features": [
                {"component": "User", "read": true, "write": false, "_id": "f1"},
                {"component": "Dealer", "read": true}
            ]
        }))
        .into_response(),
        "bare" => Json(json!([{"component": "Equipment", "read": true}])).into_response(),
        "field tech" => Json(json!({"features": [{"component": "On Call", "read": true}]}))
            .into_response(),
        "broken" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "{\"features\": [",
        )
            .into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "database offline").into_response(),
    }
}

async fn spawn_backend() -> (Url, BackendState) {
    let state = BackendState::default();
    let router = Router::new()
        .route("/api/roles/{role_id}/permissions", get(role_permissions))
        .with_state(state.clone());

    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind stub backend: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read stub backend address: {error}"),
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let base_url = match Url::parse(format!("http://{address}/api/").as_str()) {
        Ok(url) => url,
        Err(error) => panic!("invalid stub backend url: {error}"),
    };
    (base_url, state)
}

fn source_for(base_url: Url) -> HttpPermissionSource {
    HttpPermissionSource::new(reqwest::Client::new(), base_url)
        .unwrap_or_else(|_| unreachable!())
}

fn role(value: &str) -> RoleId {
    RoleId::new(value).unwrap_or_else(|_| unreachable!())
}

fn session_for(role_id: &str) -> UserSession {
    UserSession::new(
        "token-1",
        "Dana",
        Some(RoleReference {
            id: role_id.to_owned(),
            name: "Dispatcher".to_owned(),
        }),
    )
}

#[tokio::test]
async fn fetches_wrapped_payload_with_bearer_token() {
    let (base_url, _) = spawn_backend().await;
    let source = source_for(base_url);

    let records = source
        .fetch_permissions(&role("R1"), &session_for("R1"))
        .await
        .unwrap_or_default();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].component(), "User");
    assert!(records[0].allows("read"));
    assert!(!records[0].allows("write"));
    assert!(!records[1].allows("write"));
}

#[tokio::test]
async fn accepts_bare_array_payload() {
    let (base_url, _) = spawn_backend().await;
    let source = source_for(base_url);

    let records = source
        .fetch_permissions(&role("bare"), &session_for("bare"))
        .await
        .unwrap_or_default();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].component(), "Equipment");
}

#[tokio::test]
async fn role_ids_are_path_encoded() {
    let (base_url, _) = spawn_backend().await;
    let source = source_for(base_url);

    let records = source
        .fetch_permissions(&role("field tech"), &session_for("field tech"))
        .await
        .unwrap_or_default();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].component(), "On Call");
}

#[tokio::test]
async fn server_error_is_reported_as_unavailable() {
    let (base_url, _) = spawn_backend().await;
    let source = source_for(base_url);

    let result = source
        .fetch_permissions(&role("R9"), &session_for("R9"))
        .await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
}

#[tokio::test]
async fn missing_token_is_reported_as_unauthorized() {
    let (base_url, _) = spawn_backend().await;
    let source = source_for(base_url);
    let anonymous = UserSession::new(
        "",
        "Dana",
        Some(RoleReference {
            id: "R1".to_owned(),
            name: "Dispatcher".to_owned(),
        }),
    );

    let result = source.fetch_permissions(&role("R1"), &anonymous).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn malformed_body_is_reported_as_validation_error() {
    let (base_url, _) = spawn_backend().await;
    let source = source_for(base_url);

    let result = source
        .fetch_permissions(&role("broken"), &session_for("broken"))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn unreachable_backend_is_reported_as_unavailable() {
    let base_url = Url::parse("http://127.0.0.1:9/api").unwrap_or_else(|_| unreachable!());
    let source = source_for(base_url);

    let result = source
        .fetch_permissions(&role("R1"), &session_for("R1"))
        .await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
}

#[tokio::test]
async fn store_reuses_durable_cache_across_restarts() {
    let (base_url, backend) = spawn_backend().await;
    let storage = Arc::new(DurableStorage::in_memory());
    assert!(storage.save_session(&session_for("R1")).await.is_ok());

    let first_run = PermissionStore::new(
        Arc::new(source_for(base_url.clone())),
        storage.clone(),
        storage.clone(),
    );
    let first = first_run.initialize().await;
    assert_eq!(first.status(), PermissionStatus::ReadyOk);

    let second_run = PermissionStore::new(
        Arc::new(source_for(base_url)),
        storage.clone(),
        storage.clone(),
    );
    let second = second_run.initialize().await;

    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    assert!(second.has_permission(ConsoleComponent::User, PermissionAction::Read));
    assert!(!second.has_permission(ConsoleComponent::User, PermissionAction::Write));
    assert!(!second.has_permission(ConsoleComponent::Dealer, PermissionAction::Write));
    assert!(!second.has_permission(ConsoleComponent::Equipment, PermissionAction::Read));
}

#[tokio::test]
async fn server_error_fails_closed_and_guard_redirects() {
    let (base_url, _) = spawn_backend().await;
    let storage = Arc::new(DurableStorage::in_memory());
    assert!(storage.save_session(&session_for("R500")).await.is_ok());
    let store = PermissionStore::new(
        Arc::new(source_for(base_url)),
        storage.clone(),
        storage.clone(),
    );

    let state = store.initialize().await;
    assert_eq!(state.status(), PermissionStatus::ReadyError);
    assert!(!state.has_permission(ConsoleComponent::User, PermissionAction::Read));

    let notifier = Arc::new(ConsoleNotifier::new());
    let guard = RouteGuard::new(
        ConsoleComponent::User,
        NonEmptyString::new("/dashboard").unwrap_or_else(|_| unreachable!()),
        notifier.clone(),
    );
    let outcome = guard.resolve(&state, (), |()| "user page");

    assert!(matches!(
        outcome,
        RouteOutcome::Redirect(redirect)
            if redirect.to == "/dashboard"
                && redirect.reason == RedirectReason::PermissionsUnavailable
    ));
    assert_eq!(notifier.displayed().len(), 1);
}
