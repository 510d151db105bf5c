//! HTTP Endpoints
//!
//! REST API for the lead pipeline.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use leadflow_core::{
    ActivationReceipt, Lead, NewLead, ProspectingProfile, QualificationOutcome,
};
use leadflow_engine::DispatchSummary;

use crate::metrics::{
    metrics_handler, record_activation, record_dispatch, record_lead_ingested,
    record_qualification, record_quota_rejection, record_report_duration,
};
use crate::state::AppState;
use crate::ApiError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        // Inbound webhooks
        .route("/api/webhooks/leads", post(ingest_lead))
        .route("/api/webhooks/qualification", post(qualification_result))

        // Operator actions
        .route("/api/leads/activate", post(activate_leads))
        .route("/api/companies/:id/prospect", post(trigger_prospecting))

        // Onboarding profile
        .route("/api/companies/:id/profile", put(upsert_profile))
        .route("/api/companies/:id/profile", get(get_profile))

        // Dashboard reads
        .route("/api/companies/:id/funnel", get(funnel_report))
        .route("/api/companies/:id/insights", get(insights_report))
        .route("/api/companies/:id/conversations", get(conversations_report))

        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))

        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))

        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return localhost_cors();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        return localhost_cors();
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(true)
}

fn localhost_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:3000"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
}

/// Lead ingestion webhook
async fn ingest_lead(
    State(state): State<AppState>,
    Json(payload): Json<NewLead>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let lead = state.ingestion.ingest(payload).await?;
    record_lead_ingested();
    Ok((StatusCode::CREATED, Json(lead)))
}

/// Qualification-result webhook payload
#[derive(Debug, Deserialize)]
struct QualificationWebhook {
    lead_id: Uuid,
    company_id: Uuid,
    #[serde(flatten)]
    outcome: QualificationOutcome,
}

/// Qualification-result webhook
async fn qualification_result(
    State(state): State<AppState>,
    Json(payload): Json<QualificationWebhook>,
) -> Result<Json<Lead>, ApiError> {
    let lead = state
        .ingestion
        .record_qualification(payload.company_id, payload.lead_id, payload.outcome)
        .await?;
    record_qualification(lead.status.display_name());
    Ok(Json(lead))
}

/// Activation request
#[derive(Debug, Deserialize)]
struct ActivateRequest {
    company_id: Uuid,
    lead_ids: Vec<Uuid>,
    operator: String,
}

/// Activate a batch of available leads
async fn activate_leads(
    State(state): State<AppState>,
    Json(request): Json<ActivateRequest>,
) -> Result<Json<ActivationReceipt>, ApiError> {
    let result = state
        .activation
        .activate(request.company_id, &request.lead_ids, &request.operator)
        .await;

    match &result {
        Ok(receipt) => record_activation(receipt.activated.len() as u64),
        Err(leadflow_core::Error::QuotaExceeded { .. }) => record_quota_rejection(),
        Err(_) => {}
    }

    let receipt = result?;
    Ok(Json(receipt))
}

/// Trigger one prospecting batch for the company
async fn trigger_prospecting(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<DispatchSummary>, ApiError> {
    let summary = state.prospecting.dispatch(company_id).await?;
    record_dispatch(summary.dispatched.len() as u64, summary.reverted.len() as u64);
    Ok(Json(summary))
}

/// Onboarding profile payload; `company_id` comes from the path
#[derive(Debug, Deserialize)]
struct ProfilePayload {
    niche: String,
    #[serde(default)]
    client_type: Option<leadflow_core::ClientType>,
    #[serde(default)]
    target_cities: Vec<String>,
    min_ticket: f64,
    #[serde(default)]
    needs_decision_maker: bool,
    #[serde(default)]
    min_urgency: Option<leadflow_core::Urgency>,
    #[serde(default)]
    daily_capacity: Option<u32>,
}

/// Create or replace the company's prospecting profile
async fn upsert_profile(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<ProfilePayload>,
) -> Result<StatusCode, ApiError> {
    if payload.niche.trim().is_empty() {
        return Err(leadflow_core::Error::validation("niche", "is required").into());
    }

    let mut profile = ProspectingProfile::new(company_id, payload.niche, payload.min_ticket)
        .with_target_cities(payload.target_cities);
    profile.needs_decision_maker = payload.needs_decision_maker;
    if let Some(client_type) = payload.client_type {
        profile.client_type = client_type;
    }
    if let Some(min_urgency) = payload.min_urgency {
        profile.min_urgency = min_urgency;
    }
    if let Some(capacity) = payload.daily_capacity {
        profile = profile.with_daily_capacity(capacity);
    }

    state.profiles.upsert(profile).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch the company's prospecting profile
async fn get_profile(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ProspectingProfile>, ApiError> {
    let profile = state
        .profiles
        .find(company_id)
        .await?
        .ok_or_else(|| leadflow_core::Error::not_found("prospecting profile"))?;
    Ok(Json(profile))
}

/// Funnel metrics report
async fn funnel_report(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<leadflow_analytics::FunnelMetrics>, ApiError> {
    let started = std::time::Instant::now();
    let metrics = state.funnel.report(company_id).await?;
    record_report_duration("funnel", started.elapsed().as_secs_f64());
    Ok(Json(metrics))
}

/// Insight list, truncated to the configured maximum
async fn insights_report(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<leadflow_analytics::Insight>>, ApiError> {
    let started = std::time::Instant::now();
    let insights = state.insights.report(company_id).await?;
    record_report_duration("insights", started.elapsed().as_secs_f64());
    Ok(Json(insights))
}

/// Conversation analysis report
async fn conversations_report(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<leadflow_analytics::ConversationAnalysis>, ApiError> {
    let started = std::time::Instant::now();
    let analysis = state.conversations.report(company_id).await?;
    record_report_duration("conversations", started.elapsed().as_secs_f64());
    Ok(Json(analysis))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness response
#[derive(Debug, Serialize)]
struct ReadyResponse {
    status: &'static str,
    contact_webhook_configured: bool,
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ready",
        contact_webhook_configured: state.settings.prospecting.webhook_url.is_some(),
    })
}
