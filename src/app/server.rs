use crate::app::error::ApiError;
use crate::app::functions::EdgeFunction;
use crate::app::state::AppState;
use crate::core::catalog::{
    ExamQuery, JobQuery, LocationQuery, RoadmapQuery, SchemeQuery, SearchQuery,
};
use crate::core::quiz::QUIZ_QUESTIONS;
use crate::core::stress::STRESS_QUESTIONS;
use crate::utils::error::{CatalystError, Result};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

type Shared = State<Arc<AppState>>;
type ApiResult = std::result::Result<Json<Value>, ApiError>;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        .route("/functions/v1/smart-timetable", post(smart_timetable))
        .route("/functions/v1/recommend-course", post(recommend_course))
        .route("/functions/v1/ai-mentor-chat", post(mentor_chat))
        .route("/functions/v1/generate-detailed-roadmap", post(detailed_roadmap))
        .route("/functions/v1/stress-check", post(stress_check))
        .route("/api/quiz/questions", get(quiz_questions))
        .route("/api/stress/questions", get(stress_questions))
        .route("/api/colleges", get(colleges))
        .route("/api/scholarships", get(scholarships))
        .route("/api/jobs", get(jobs))
        .route("/api/schemes", get(schemes))
        .route("/api/exams", get(exams))
        .route("/api/locations", get(locations))
        .route("/api/roadmaps", get(roadmaps))
        .route("/api/mentors", get(mentors))
        .route("/api/progress/{user_id}/{timetable_id}", get(progress))
        .route(
            "/api/progress/{user_id}/tasks/{task_id}/toggle",
            post(toggle_task),
        )
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Serves until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let address = listener.local_addr()?;
    tracing::info!("🚀 Server running on http://{}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(err) => tracing::error!("Failed to listen for Ctrl+C: {}", err),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn run<F: EdgeFunction>(function: &F, body: Bytes) -> ApiResult {
    tracing::debug!("Invoking {}", F::NAME);
    Ok(Json(function.invoke(&body).await?))
}

async fn smart_timetable(State(state): Shared, body: Bytes) -> ApiResult {
    run(&state.smart_timetable, body).await
}

async fn recommend_course(State(state): Shared, body: Bytes) -> ApiResult {
    run(&state.recommend_course, body).await
}

async fn mentor_chat(State(state): Shared, body: Bytes) -> ApiResult {
    run(&state.mentor_chat, body).await
}

async fn detailed_roadmap(State(state): Shared, body: Bytes) -> ApiResult {
    run(&state.detailed_roadmap, body).await
}

async fn stress_check(State(state): Shared, body: Bytes) -> ApiResult {
    run(&state.stress_check, body).await
}

async fn quiz_questions() -> Json<Value> {
    Json(json!({ "success": true, "questions": QUIZ_QUESTIONS }))
}

async fn stress_questions() -> Json<Value> {
    Json(json!({ "success": true, "questions": STRESS_QUESTIONS }))
}

type QueryParams<T> = std::result::Result<Query<T>, QueryRejection>;

/// Unwraps query parameters, reporting malformed ones as a JSON 400.
fn params<T>(extracted: QueryParams<T>) -> std::result::Result<T, ApiError> {
    extracted
        .map(|Query(query)| query)
        .map_err(|rejection| ApiError(CatalystError::validation(rejection.body_text())))
}

async fn colleges(State(state): Shared, query: QueryParams<SearchQuery>) -> ApiResult {
    let colleges = state.catalog.colleges(&params(query)?).await?;
    Ok(Json(json!({ "success": true, "count": colleges.len(), "colleges": colleges })))
}

async fn scholarships(State(state): Shared, query: QueryParams<SearchQuery>) -> ApiResult {
    let scholarships = state.catalog.scholarships(&params(query)?).await?;
    Ok(Json(json!({
        "success": true,
        "count": scholarships.len(),
        "scholarships": scholarships
    })))
}

async fn jobs(State(state): Shared, query: QueryParams<JobQuery>) -> ApiResult {
    let jobs = state.catalog.jobs(&params(query)?).await?;
    Ok(Json(json!({ "success": true, "count": jobs.len(), "jobs": jobs })))
}

async fn schemes(State(state): Shared, query: QueryParams<SchemeQuery>) -> ApiResult {
    let schemes = state.catalog.schemes(&params(query)?).await?;
    Ok(Json(json!({ "success": true, "count": schemes.len(), "schemes": schemes })))
}

async fn exams(State(state): Shared, query: QueryParams<ExamQuery>) -> ApiResult {
    let exams = state.catalog.exams(&params(query)?).await?;
    Ok(Json(json!({ "success": true, "count": exams.len(), "exams": exams })))
}

async fn locations(State(state): Shared, query: QueryParams<LocationQuery>) -> ApiResult {
    let locations = state.catalog.locations(&params(query)?).await?;
    Ok(Json(json!({ "success": true, "count": locations.len(), "locations": locations })))
}

async fn roadmaps(State(state): Shared, query: QueryParams<RoadmapQuery>) -> ApiResult {
    let roadmaps = state.catalog.roadmaps(&params(query)?).await?;
    Ok(Json(json!({ "success": true, "count": roadmaps.len(), "roadmaps": roadmaps })))
}

async fn mentors(State(state): Shared, query: QueryParams<SearchQuery>) -> ApiResult {
    let mentors = state.catalog.mentors(&params(query)?).await?;
    Ok(Json(json!({ "success": true, "count": mentors.len(), "mentors": mentors })))
}

async fn progress(
    State(state): Shared,
    Path((user_id, timetable_id)): Path<(String, String)>,
) -> ApiResult {
    let today = Utc::now().date_naive();
    let summary = state.progress.summary(&user_id, &timetable_id, today).await?;
    Ok(Json(serde_json::to_value(summary).map_err(CatalystError::from)?))
}

async fn toggle_task(
    State(state): Shared,
    Path((user_id, task_id)): Path<(String, String)>,
) -> ApiResult {
    let task = state.progress.toggle(&user_id, &task_id, Utc::now()).await?;
    Ok(Json(json!({ "success": true, "task": task })))
}

async fn health(State(state): Shared) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.backend_kind,
        "llm": state.llm_enabled,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
