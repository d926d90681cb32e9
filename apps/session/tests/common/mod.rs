//! In-process mock of the auth backend, served with axum on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

const COOKIE_NAME: &str = "sid";

#[derive(Default)]
pub struct MockState {
    /// email -> (password, principal JSON)
    accounts: HashMap<String, (String, Value)>,
    /// session token -> email
    sessions: HashMap<String, String>,
    pub fail_me: bool,
    pub bare_error_bodies: bool,
    pub seen_bearer: Vec<String>,
}

#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<Mutex<MockState>>,
    server: Arc<Mutex<Option<(oneshot::Sender<()>, JoinHandle<()>)>>>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new()
            .route("/api/v1/auth/me", get(me))
            .route("/api/v1/auth/signin", post(sign_in))
            .route("/api/v1/auth/signup", post(sign_up))
            .route("/api/v1/auth/signout", post(sign_out))
            .route("/api/auth/refresh", post(refresh))
            .route("/api/v1/auth/:kind/profile", post(complete_profile))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            server: Arc::new(Mutex::new(Some((stop_tx, handle)))),
        }
    }

    /// Stops listening and waits until every open connection is closed.
    pub async fn shutdown(&self) {
        let server = self.server.lock().unwrap().take();
        if let Some((stop_tx, handle)) = server {
            let _ = stop_tx.send(());
            handle.await.unwrap();
        }
    }

    pub fn add_account(&self, email: &str, password: &str) {
        let principal = json!({
            "id": Uuid::new_v4().to_string(),
            "email": email,
            "role": null,
            "isProfileCompleted": false,
            "profile": null,
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        });
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(email.to_lowercase(), (password.to_string(), principal));
    }

    pub fn set(&self, update: impl FnOnce(&mut MockState)) {
        update(&mut self.state.lock().unwrap());
    }

    pub fn seen_bearer(&self) -> Vec<String> {
        self.state.lock().unwrap().seen_bearer.clone()
    }
}

type Shared = State<Arc<Mutex<MockState>>>;

fn error(state: &MockState, status: StatusCode, message: &str) -> Response {
    if state.bare_error_bodies {
        (status, "upstream exploded").into_response()
    } else {
        (status, Json(json!({ "message": message }))).into_response()
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value.to_string())
}

fn record_bearer(state: &mut MockState, headers: &HeaderMap) {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.seen_bearer.push(token.to_string());
    }
}

fn current_principal(state: &MockState, headers: &HeaderMap) -> Option<Value> {
    let token = session_token(headers)?;
    let email = state.sessions.get(&token)?;
    state.accounts.get(email).map(|(_, p)| p.clone())
}

fn open_session(state: &mut MockState, email: &str) -> Response {
    let token = Uuid::new_v4().to_string();
    state.sessions.insert(token.clone(), email.to_string());
    (
        StatusCode::OK,
        [(header::SET_COOKIE, format!("{COOKIE_NAME}={token}; Path=/; HttpOnly"))],
        // Deliberately not the canonical principal.
        Json(json!({ "success": true, "user": { "id": "stale", "email": "stale@example.com" } })),
    )
        .into_response()
}

async fn me(State(state): Shared, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    record_bearer(&mut state, &headers);
    if state.fail_me {
        return error(&state, StatusCode::INTERNAL_SERVER_ERROR, "Profile service down");
    }
    match current_principal(&state, &headers) {
        Some(principal) => Json(json!({ "data": principal })).into_response(),
        None => error(&state, StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

async fn sign_in(State(state): Shared, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_lowercase();
    let password = body["password"].as_str().unwrap_or_default();
    let valid = matches!(state.accounts.get(&email), Some((stored, _)) if stored == password);
    if !valid {
        return error(&state, StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    open_session(&mut state, &email)
}

async fn sign_up(State(state): Shared, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_lowercase();
    if state.accounts.contains_key(&email) {
        return error(&state, StatusCode::CONFLICT, "Email already registered");
    }
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let principal = json!({
        "id": Uuid::new_v4().to_string(),
        "email": email,
        "role": body.get("role").cloned().unwrap_or(Value::Null),
        "isProfileCompleted": false,
        "profile": null
    });
    state.accounts.insert(email.clone(), (password, principal));
    open_session(&mut state, &email)
}

async fn sign_out(State(state): Shared, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn refresh(State(state): Shared, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    match current_principal(&state, &headers) {
        // Refresh answers with a bare principal, unlike /me.
        Some(principal) => Json(principal).into_response(),
        None => error(&state, StatusCode::UNAUTHORIZED, "Refresh token expired"),
    }
}

async fn complete_profile(
    State(state): Shared,
    Path(kind): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let role = match kind.as_str() {
        "job-seeker" => "jobseeker",
        "recruiter" => "recruiter",
        "mentor" => "mentor",
        _ => return error(&state, StatusCode::NOT_FOUND, "Not found"),
    };
    let Some(email) = session_token(&headers).and_then(|t| state.sessions.get(&t).cloned()) else {
        return error(&state, StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    if let Some((_, principal)) = state.accounts.get_mut(&email) {
        principal["role"] = json!(role);
        principal["isProfileCompleted"] = json!(true);
        principal["profile"] = json!({
            "fullName": body.get("fullName").cloned().unwrap_or(Value::Null),
            "bio": body.get("bio").cloned().unwrap_or(Value::Null),
        });
    }
    StatusCode::CREATED.into_response()
}
