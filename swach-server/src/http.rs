//! HTTP surface over the command layer. The authenticated identity arrives
//! in the `x-user-id` / `x-user-email` headers, standing in for the hosted
//! auth layer; user-scoped routes reject requests without it.

use crate::commands::{self, ProfileFormDto, SessionDto};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use swach_core::report::ReportDraft;
use swach_core::session::{Identity, SessionState};

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/session", get(handle_session).post(handle_sign_in))
        .route("/api/dashboard", get(handle_dashboard))
        .route("/api/training", get(handle_training))
        .route("/api/training/:module_id/start", post(handle_start_module))
        .route(
            "/api/training/:module_id/complete",
            post(handle_complete_module),
        )
        .route("/api/reports", post(handle_submit_report))
        .route("/api/facilities", get(handle_facilities))
        .route("/api/incentives", get(handle_incentives))
        .route("/api/profile", get(handle_get_profile))
        .route("/api/profile", put(handle_update_profile))
        .with_state(state)
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

fn identity(headers: &HeaderMap) -> Option<Identity> {
    header_value(headers, "x-user-id").map(|user_id| Identity {
        user_id,
        email: header_value(headers, "x-user-email"),
    })
}

fn to_response(result: Result<impl serde::Serialize, String>) -> Response {
    match result {
        Ok(dto) => Json(dto).into_response(),
        Err(message) => (StatusCode::BAD_REQUEST, message).into_response(),
    }
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "sign in required").into_response()
}

/// Read-only echo of the caller's identity. Profile creation happens on
/// the sign-in POST, never on a GET.
async fn handle_session(headers: HeaderMap) -> Response {
    let mut session = SessionState::default();
    session.resolve(identity(&headers));

    match session.identity() {
        Some(identity) => Json(SessionDto {
            user_id: Some(identity.user_id.clone()),
            email: identity.email.clone(),
        })
        .into_response(),
        None => Json(SessionDto {
            user_id: None,
            email: None,
        })
        .into_response(),
    }
}

async fn handle_sign_in(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(ident) = identity(&headers) else {
        return unauthorized();
    };
    if let Err(message) = commands::ensure_profile(&state, &ident.user_id, ident.email.as_deref())
    {
        return (StatusCode::BAD_REQUEST, message).into_response();
    }
    Json(SessionDto {
        user_id: Some(ident.user_id),
        email: ident.email,
    })
    .into_response()
}

async fn handle_dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(ident) = identity(&headers) else {
        return unauthorized();
    };
    to_response(commands::dashboard_summary(&state, &ident.user_id))
}

async fn handle_training(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user_id = identity(&headers).map(|ident| ident.user_id);
    to_response(commands::training_overview(&state, user_id.as_deref()))
}

async fn handle_start_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(ident) = identity(&headers) else {
        return unauthorized();
    };
    to_response(commands::start_module(&state, &ident.user_id, &module_id))
}

async fn handle_complete_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(ident) = identity(&headers) else {
        return unauthorized();
    };
    to_response(commands::complete_module(&state, &ident.user_id, &module_id))
}

async fn handle_submit_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<ReportDraft>,
) -> Response {
    let Some(ident) = identity(&headers) else {
        return unauthorized();
    };
    to_response(commands::submit_report(&state, &ident.user_id, &draft))
}

async fn handle_facilities(State(state): State<AppState>) -> Response {
    to_response(commands::list_facilities(&state))
}

async fn handle_incentives(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(ident) = identity(&headers) else {
        return unauthorized();
    };
    to_response(commands::list_incentives(&state, &ident.user_id))
}

async fn handle_get_profile(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(ident) = identity(&headers) else {
        return unauthorized();
    };
    to_response(commands::get_profile(&state, &ident.user_id))
}

async fn handle_update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<ProfileFormDto>,
) -> Response {
    let Some(ident) = identity(&headers) else {
        return unauthorized();
    };
    to_response(
        commands::update_profile(&state, &ident.user_id, &form)
            .and_then(|()| commands::get_profile(&state, &ident.user_id)),
    )
}
