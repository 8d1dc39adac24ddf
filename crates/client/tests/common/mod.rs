//! In-process fake of the wizard platform backend.
//!
//! Serves a small subset of the real routes under `/api/v1` on an ephemeral
//! port and records every request so tests can assert on what the client
//! actually sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, Request, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use wizplat_client::{ApiClient, AuthSession, ClientConfig};
use wizplat_core::models::user::TokenPair;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "correct-horse";

/// A request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Debug, Default)]
pub struct BackendState {
    /// Access token currently accepted by protected routes.
    pub valid_access: String,
    /// Refresh token currently accepted by `/auth/refresh`.
    pub valid_refresh: String,
    pub token_generation: u32,
    pub refresh_calls: u32,
    pub requests: Vec<Recorded>,
    pub runs: Vec<Value>,
    pub option_set_bodies: Vec<Value>,
    pub cleared_runs: Vec<Uuid>,
}

pub type Shared = Arc<Mutex<BackendState>>;

pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    /// Start the fake backend on `127.0.0.1:0`.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            valid_access: "access-1".into(),
            valid_refresh: "refresh-1".into(),
            token_generation: 1,
            ..BackendState::default()
        }));

        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/refresh", post(refresh))
            .route("/auth/me", get(me))
            .route("/wizard-runs", get(list_runs).post(create_run))
            .route("/wizard-runs/{id}", get(get_run))
            .route("/wizard-runs/{id}/complete", post(complete_run))
            .route("/wizard-runs/{id}/responses", delete(clear_responses))
            .route("/wizard-runs/{id}/option-sets", post(create_option_set))
            .route("/users", get(forbidden));

        let app = Router::new()
            .nest("/api/v1", api)
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve fake backend");
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            state,
        }
    }

    /// A client with an empty session pointing at this backend.
    pub fn client(&self) -> ApiClient {
        self.client_with(AuthSession::new())
    }

    pub fn client_with(&self, session: AuthSession) -> ApiClient {
        ApiClient::new(&ClientConfig::with_api_url(&self.base_url), session)
            .expect("build client")
    }

    /// Requests whose path ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<Recorded> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.path.ends_with(suffix))
            .cloned()
            .collect()
    }

    /// Invalidate the current access token, as if it expired.
    pub fn expire_access_token(&self) {
        self.state.lock().unwrap().valid_access = "expired".into();
    }

    /// Seed `count` stored runs for the listing endpoints.
    pub fn seed_runs(&self, count: usize) {
        let mut state = self.state.lock().unwrap();
        for i in 0..count {
            state.runs.push(run_json(Uuid::new_v4(), Some(&format!("run {i}")), "completed"));
        }
    }
}

pub fn tokens(access: &str, refresh: &str) -> TokenPair {
    TokenPair {
        access_token: access.into(),
        refresh_token: refresh.into(),
        token_type: "bearer".into(),
    }
}

pub fn run_json(id: Uuid, name: Option<&str>, status: &str) -> Value {
    json!({
        "id": id,
        "wizard_id": Uuid::nil(),
        "user_id": null,
        "run_name": name,
        "status": status,
        "current_step_index": 0,
        "total_steps": 3,
        "progress_percentage": 0.0,
        "started_at": "2024-05-01T10:00:00Z",
        "last_accessed_at": "2024-05-01T10:00:00Z",
        "is_stored": status == "completed",
        "is_favorite": false,
        "tags": []
    })
}

// ---- middleware ----

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    state.lock().unwrap().requests.push(Recorded {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        bearer,
    });
    next.run(request).await
}

fn authorize(state: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", state.lock().unwrap().valid_access);
    let presented = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if presented == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
    }
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

// ---- handlers ----

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    if form.username != USERNAME || form.password != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }
    let state = state.lock().unwrap();
    Json(json!({
        "access_token": state.valid_access,
        "refresh_token": state.valid_refresh,
        "token_type": "bearer"
    }))
    .into_response()
}

async fn refresh(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.refresh_calls += 1;
    if params.get("refresh_token") != Some(&state.valid_refresh) {
        return error(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    }
    state.token_generation += 1;
    state.valid_access = format!("access-{}", state.token_generation);
    state.valid_refresh = format!("refresh-{}", state.token_generation);
    Json(json!({
        "access_token": state.valid_access,
        "refresh_token": state.valid_refresh,
    }))
    .into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    Json(json!({
        "id": Uuid::nil(),
        "email": "alice@example.com",
        "username": USERNAME,
        "role": { "id": Uuid::nil(), "name": "admin" },
        "is_active": true
    }))
    .into_response()
}

async fn list_runs(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let skip: usize = params.get("skip").and_then(|s| s.parse().ok()).unwrap_or(0);
    let limit: usize = params.get("limit").and_then(|s| s.parse().ok()).unwrap_or(20);
    let state = state.lock().unwrap();
    let page: Vec<Value> = state.runs.iter().skip(skip).take(limit).cloned().collect();
    Json(json!({
        "runs": page,
        "total": state.runs.len(),
        "page": skip / limit.max(1) + 1,
        "page_size": limit,
        "total_pages": state.runs.len().div_ceil(limit.max(1)),
    }))
    .into_response()
}

async fn create_run(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let run = run_json(Uuid::new_v4(), body["run_name"].as_str(), "in_progress");
    state.lock().unwrap().runs.push(run.clone());
    (StatusCode::CREATED, Json(run)).into_response()
}

async fn get_run(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let state = state.lock().unwrap();
    match state.runs.iter().find(|r| r["id"] == json!(id)) {
        Some(run) => {
            let mut detail = run.clone();
            detail["step_responses"] = json!([]);
            detail["option_set_responses"] = json!([]);
            Json(detail).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Wizard run not found"),
    }
}

async fn complete_run(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let mut run = run_json(id, body["run_name"].as_str(), "completed");
    run["is_stored"] = body["save_to_store"].clone();
    run["progress_percentage"] = json!(100.0);
    Json(run).into_response()
}

async fn clear_responses(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    state.lock().unwrap().cleared_runs.push(id);
    StatusCode::NO_CONTENT.into_response()
}

async fn create_option_set(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    state.lock().unwrap().option_set_bodies.push(body.clone());
    Json(json!({
        "id": Uuid::new_v4(),
        "run_id": id,
        "step_response_id": body["step_response_id"],
        "option_set_id": body["option_set_id"],
        "response_value": body["response_value"],
        "selected_options": body.get("selected_options").cloned().unwrap_or(json!([])),
    }))
    .into_response()
}

async fn forbidden(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    error(StatusCode::FORBIDDEN, "Not enough permissions")
}
