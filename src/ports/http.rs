// src/ports/http.rs
use crate::application::{FlashcardGenerator, TextGenerator};
use crate::domain::DomainError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{error, info, instrument, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub input_text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub flashcards: Value,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    model: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Error returned to HTTP callers as `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

/// Build the application router around a ready-made generator.
///
/// Every origin, method and header is allowed with credentials; since a
/// literal `*` is not valid alongside credentials, the request's own values
/// are echoed back.
pub fn router<G: TextGenerator + 'static>(generator: FlashcardGenerator<G>) -> Router {
    Router::new()
        .route("/generate_flashcards", post(generate_flashcards::<G>))
        .route("/health", get(health::<G>))
        .layer(cors_layer())
        .with_state(Arc::new(generator))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[instrument(level = "info", skip_all)]
async fn generate_flashcards<G: TextGenerator>(
    State(generator): State<Arc<FlashcardGenerator<G>>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(%rejection, "Rejected request body");
        ApiError::from(rejection)
    })?;

    match generator.generate_flashcards(&request.input_text).await {
        Ok(flashcards) => {
            info!("Flashcards generated");
            Ok(Json(GenerateResponse { flashcards }))
        }
        Err(e) => {
            error!(error = %e, "Flashcard generation failed");
            Err(e.into())
        }
    }
}

async fn health<G: TextGenerator>(
    State(generator): State<Arc<FlashcardGenerator<G>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        model: generator.generator().model().to_string(),
    })
}
