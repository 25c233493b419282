//! Web host for memochat.
//!
//! Thin plumbing around the turn pipeline: a connect form, the chat page,
//! reset, and a health check. Conversation state lives in an in-memory
//! session store keyed by a cookie; each request for a session holds that
//! session's lock until it finishes.
//!
//! Built on Axum for high performance async HTTP.

pub mod frontend;
pub mod pages;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use memochat_agent::{ConversationState, TurnRunner};
use memochat_config::AppConfig;
use memochat_core::{ConnectionParams, Connector, Error};
use memochat_providers::OpenAiConnector;

use crate::session::{SessionHandle, SessionStore, session_cookie, session_id};

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self' https:; object-src 'none'; base-uri 'none'; form-action 'self'";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub runner: TurnRunner,
    pub sessions: SessionStore,
}

impl GatewayState {
    pub fn new(config: AppConfig, connector: Arc<dyn Connector>) -> Self {
        let runner = TurnRunner::from_config(connector, &config.conversation);
        let sessions = SessionStore::from_config(&config.gateway);
        Self {
            config,
            runner,
            sessions,
        }
    }

    fn session(&self, headers: &HeaderMap) -> Option<SessionHandle> {
        session_id(headers).and_then(|id| self.sessions.get(&id))
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all routes.
///
/// Layers applied:
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(connect_form_handler).post(connect_handler))
        .route("/chat", get(chat_handler).post(submit_handler))
        .route("/reset", get(reset_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the web host and serve until the process exits.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(GatewayState::new(config, Arc::new(OpenAiConnector::new())));

    // Periodic sweep so abandoned sessions do not wait for the next insert.
    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let evicted = sweeper.sessions.evict_expired();
            if evicted > 0 {
                info!(evicted, remaining = sweeper.sessions.len(), "Expired sessions evicted");
            }
        }
    });

    let app = build_router(state);

    info!(addr = %addr, "memochat listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn page(status: StatusCode, html: String) -> Response {
    (
        status,
        [(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        )],
        Html(html),
    )
        .into_response()
}

// --- Handlers ---

async fn connect_form_handler(State(state): State<SharedState>) -> Response {
    page(StatusCode::OK, pages::connect_page(&state.config.connection, None))
}

#[derive(Deserialize)]
struct ConnectForm {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    base_url: String,
    #[serde(default)]
    model_name: String,
}

/// Start a fresh session. Any previous session for this browser is dropped.
async fn connect_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ConnectForm>,
) -> Response {
    let params = ConnectionParams::new(&form.api_key, &form.base_url, &form.model_name);
    if !params.is_complete() {
        return page(
            StatusCode::UNPROCESSABLE_ENTITY,
            pages::connect_page(
                &state.config.connection,
                Some("API key, base URL and model are all required."),
            ),
        );
    }

    if let Some(old) = session_id(&headers) {
        state.sessions.remove(&old);
    }

    info!(base_url = %params.base_url, model = %params.model_name, "Session connected");
    let id = state.sessions.insert(ConversationState::new(params));

    let mut response = Redirect::to("/chat").into_response();
    match HeaderValue::from_str(&session_cookie(&id)) {
        Ok(cookie) => {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
        Err(e) => {
            error!(error = %e, "Session cookie rejected");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    response
}

async fn chat_handler(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let Some(handle) = state.session(&headers) else {
        return Redirect::to("/").into_response();
    };

    let conversation = handle.lock().await;
    if !conversation.is_configured() {
        return Redirect::to("/").into_response();
    }
    page(StatusCode::OK, pages::chat_page(&conversation, None, None))
}

#[derive(Deserialize)]
struct MessageForm {
    #[serde(default)]
    message: String,
}

async fn submit_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<MessageForm>,
) -> Response {
    let Some(handle) = state.session(&headers) else {
        return Redirect::to("/").into_response();
    };

    // Held across the provider call: one turn at a time per session.
    let mut conversation = handle.lock().await;

    match state.runner.submit_turn(&mut conversation, &form.message).await {
        Ok(_) => Redirect::to("/chat").into_response(),
        Err(Error::SessionNotConfigured) => Redirect::to("/").into_response(),
        Err(e @ Error::CompletionRequestFailed(_)) => {
            warn!(error = %e, "Turn failed");
            page(
                StatusCode::BAD_GATEWAY,
                pages::chat_page(&conversation, Some(&e.to_string()), Some(&form.message)),
            )
        }
    }
}

/// Clear history and memory, keeping the connection if it is complete.
async fn reset_handler(State(state): State<SharedState>, headers: HeaderMap) -> Redirect {
    if let Some(handle) = state.session(&headers) {
        let mut conversation = handle.lock().await;
        let preserve = conversation.is_configured();
        conversation.reset(preserve);
        info!(preserve_connection = preserve, "Session reset");
    }
    Redirect::to("/chat")
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sessions: usize,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.sessions.len(),
    })
}
