use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use newsroom_common::{EvaluationResult, Issue, Mutation, PrimitiveWeights};
use newsroom_core::{evaluate, learn, EpisodeRequest, EpisodeRunner};

pub const MAX_TOPIC_CHARS: usize = 2000;
pub const DEFAULT_TOPIC: &str = "unknown";

#[derive(Clone)]
pub struct AppState {
    runner: Arc<EpisodeRunner>,
    default_primitives: PrimitiveWeights,
}

impl AppState {
    pub fn new(runner: EpisodeRunner, default_primitives: PrimitiveWeights) -> Self {
        Self {
            runner: Arc::new(runner),
            default_primitives: default_primitives.clamped(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/trace", post(trace_episode))
        .route("/evaluate", post(evaluate_text))
        .route("/learn", post(learn_weights))
        .layer(cors)
        // method + path + status + latency only
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message.into()})),
    )
        .into_response()
}

async fn health() -> &'static str {
    "ok"
}

// ---------------------------------------------------------------------------
// POST /trace
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TraceRequest {
    pub episode_num: Option<u32>,
    pub episode_id: Option<String>,
    pub boot_id: Option<String>,
    pub topic: Option<String>,
    pub primitives: Option<PrimitiveWeights>,
}

/// Content type is not checked and an empty body means all defaults.
async fn trace_episode(State(state): State<AppState>, raw: Bytes) -> Response {
    let body = if raw.iter().all(u8::is_ascii_whitespace) {
        TraceRequest::default()
    } else {
        match serde_json::from_slice::<TraceRequest>(&raw) {
            Ok(body) => body,
            Err(e) => return bad_request(format!("Invalid JSON body: {e}")),
        }
    };

    let topic = body.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string());
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return bad_request(format!(
            "Topic too long (max {MAX_TOPIC_CHARS} characters)"
        ));
    }

    let primitives = body.primitives.unwrap_or(state.default_primitives);
    let mut request = EpisodeRequest::new(body.episode_num.unwrap_or(1), topic, primitives);
    if let Some(episode_id) = body.episode_id {
        request.episode_id = episode_id;
    }
    if let Some(boot_id) = body.boot_id {
        request = request.with_boot_id(boot_id);
    }

    info!(
        episode_num = request.episode_num,
        episode_id = %request.episode_id,
        "Trace requested"
    );
    let episode = state.runner.run(request).await;
    Json(episode).into_response()
}

// ---------------------------------------------------------------------------
// POST /evaluate
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub text: String,
    #[serde(default)]
    pub primitives: Option<PrimitiveWeights>,
}

async fn evaluate_text(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let weights = body.primitives.unwrap_or(state.default_primitives);
    let result: EvaluationResult = evaluate(&body.text, &weights, state.runner.evaluator());
    Json(result).into_response()
}

// ---------------------------------------------------------------------------
// POST /learn
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LearnRequest {
    #[serde(default)]
    pub primitives: Option<PrimitiveWeights>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Serialize)]
pub struct LearnResponse {
    pub primitives: PrimitiveWeights,
    pub mutations: Vec<Mutation>,
}

async fn learn_weights(
    State(state): State<AppState>,
    payload: Result<Json<LearnRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let weights = body.primitives.unwrap_or(state.default_primitives);
    let (primitives, mutations) = learn(&weights, &body.issues);
    Json(LearnResponse {
        primitives,
        mutations,
    })
    .into_response()
}
