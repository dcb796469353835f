//! HTTP surface for computing and reading back recommendation shortlists.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use treatmatch_core::{
    ApplicationError, InterfaceError, RecommendationResult, SessionId, StoredRecommendation,
    WizardStepRecord, WizardSteps,
};
use uuid::Uuid;

use crate::bootstrap::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub steps: Vec<WizardStepRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub session_id: String,
    pub recommendations: Vec<RecommendationResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredRecommendationsResponse {
    pub session_id: String,
    pub recommendations: Vec<StoredRecommendation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl From<InterfaceError> for ApiError {
    fn from(error: InterfaceError) -> Self {
        let (status, detail) = match &error {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, Some(message.clone()))
            }
            InterfaceError::ServiceUnavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, None),
            InterfaceError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };
        Self {
            status,
            body: ApiErrorBody {
                error: error.user_message().to_string(),
                detail,
                correlation_id: error.correlation_id().to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recommendations", post(create_recommendations))
        .route("/recommendations/{session_id}", get(stored_recommendations))
}

pub async fn create_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let prepared = prepare(&request);
    let (session_id, steps) = prepared.map_err(|error| reject(error, &correlation_id))?;

    let recommendations = state.service.recommend_and_record(&session_id, &steps).await;
    info!(
        event_name = "http.recommendations.created",
        correlation_id = %correlation_id,
        session_id = %session_id,
        recommendation_count = recommendations.len(),
        "recommendations served"
    );

    Ok(Json(RecommendationResponse { session_id: session_id.to_string(), recommendations }))
}

pub async fn stored_recommendations(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<StoredRecommendationsResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let session_id = SessionId::parse(&session_id)
        .map_err(|error| reject(ApplicationError::from(error), &correlation_id))?;
    let recommendations = state
        .service
        .sink()
        .load(&session_id)
        .await
        .map_err(|error| reject(error, &correlation_id))?;

    Ok(Json(StoredRecommendationsResponse {
        session_id: session_id.to_string(),
        recommendations,
    }))
}

fn prepare(request: &RecommendationRequest) -> Result<(SessionId, WizardSteps), ApplicationError> {
    let session_id = match request.session_id.as_deref() {
        Some(raw) => SessionId::parse(raw)?,
        None => SessionId::new(),
    };
    let steps = WizardSteps::from_records(&request.steps)?;
    Ok((session_id, steps))
}

fn reject(error: ApplicationError, correlation_id: &str) -> ApiError {
    warn!(
        event_name = "http.recommendations.rejected",
        correlation_id = %correlation_id,
        error = %error,
        "recommendation request rejected"
    );
    ApiError::from(error.into_interface(correlation_id))
}
