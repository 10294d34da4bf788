use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::colleges::CollegeCatalog;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::ollama::OllamaCli;
use crate::recommend::{ModelChoice, Preferences, Recommendations, Recommender};
use crate::ui::{ChatEntry, ChatPage};

/// Request bodies are small: a profile paragraph or a preferences object.
const BODY_LIMIT: usize = 64 * 1024;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "ollama.config.loaded",
        binary = %config.ollama.binary,
        preference_model = %config.ollama.preference_model,
        profile_model = %config.ollama.profile_model,
        "Ollama configuration loaded"
    );

    let catalog =
        CollegeCatalog::load_or_empty(&config.data.colleges_path, config.data.context_limit)
            .await
            .context("failed to load college dataset")?;

    let runner = Arc::new(OllamaCli::new(
        config.ollama.binary.clone(),
        config.ollama.timeout(),
    ));
    let recommender = Arc::new(Recommender::new(
        runner,
        ModelChoice {
            preference_model: config.ollama.preference_model.clone(),
            profile_model: config.ollama.profile_model.clone(),
        },
        catalog,
    ));

    let state = AppState {
        config: Arc::clone(&config),
        recommender,
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Routes, static assets and middleware for the given state.
pub fn build_router(state: AppState) -> Router {
    let timeout_duration = state.config.resilience.request_timeout();

    Router::new()
        .route("/", get(index_handler).post(profile_handler))
        .route("/recommend", post(recommend_handler))
        .nest_service("/static", ServeDir::new(&state.config.server.static_dir))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Empty conversation.
async fn index_handler() -> Html<String> {
    Html(ChatPage::default().render())
}

/// Chat form body.
#[derive(Debug, Deserialize)]
struct ProfileForm {
    #[serde(default)]
    profile: String,
}

/// POST / - Answer a profile and render it as a conversation.
async fn profile_handler(
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Html<String> {
    let profile = form.profile.trim();
    if profile.is_empty() {
        return Html(
            ChatPage {
                notice: Some("Please tell me a little about yourself first.".to_string()),
                ..ChatPage::default()
            }
            .render(),
        );
    }

    info!(profile_len = profile.len(), "Received profile");
    let reply = state.recommender.for_profile(profile).await;

    Html(
        ChatPage {
            entries: vec![
                ChatEntry::Student(profile.to_string()),
                ChatEntry::Counselor(reply),
            ],
            ..ChatPage::default()
        }
        .render(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /recommend - Preferences in, recommendations out.
async fn recommend_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Recommendations>, AppError> {
    let Json(value) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let is_empty = match &value {
        Value::Object(map) => map.is_empty(),
        _ => true,
    };
    if is_empty {
        return Err(AppError::InvalidRequest(
            "expected a non-empty JSON object".to_string(),
        ));
    }

    let prefs =
        Preferences::deserialize(value).map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    tracing::info!(
        college_preference = %prefs.college_preference,
        career_focus = %prefs.career_focus,
        "Received recommendation request"
    );

    state.recommender.for_preferences(&prefs).await.map(Json)
}
