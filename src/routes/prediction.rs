use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use crate::core::{InferencePipeline, PredictionError};
use crate::models::{parse_prediction_request, ErrorResponse, HealthResponse, ModelInfo, PredictionResponse};
use crate::services::{RateDecision, RateLimiter, SqliteStore};

/// Header carrying the API key, spelled as existing clients send it
pub const AUTH_HEADER: &str = "Authorisation";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: InferencePipeline,
    pub store: Option<Arc<SqliteStore>>,
    pub limiter: RateLimiter,
    pub api_key: Arc<str>,
}

/// Configure prediction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/prediction", web::post().to(prediction));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match &state.store {
        Some(store) => store.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        model: ModelInfo {
            features_in: state.pipeline.n_features_in(),
            features_out: state.pipeline.n_features_out(),
        },
    })
}

/// Prediction endpoint
///
/// POST /api/prediction
///
/// Request body: a JSON object with the 19 survey fields, e.g.
/// ```json
/// {
///   "Hours_Studied": 10,
///   "Attendance": 80,
///   "Parental_Involvement": "High",
///   "Extracurricular_Activities": 1,
///   "Gender": "Female"
/// }
/// ```
///
/// Gates run in order: rate limit, `Authorisation` header, body, pipeline.
async fn prediction(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    body: web::Bytes,
) -> impl Responder {
    let client = http_req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if let RateDecision::Limited { window, limit } = state.limiter.check(&client).await {
        return HttpResponse::TooManyRequests().json(ErrorResponse::new(
            "rate_limited",
            format!("Rate limit exceeded: {} per {}", limit, window),
            429,
        ));
    }

    let authorised = http_req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|key| key == &*state.api_key)
        .unwrap_or(false);

    if !authorised {
        tracing::warn!("Rejected prediction request from {}: invalid or missing API key", client);
        return HttpResponse::Unauthorized().json(ErrorResponse::new(
            "unauthorized",
            "Invalid or missing API key",
            401,
        ));
    }

    let payload: serde_json::Value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => {
                tracing::info!("Invalid JSON from {}: {}", client, e);
                return HttpResponse::BadRequest().json(ErrorResponse::new(
                    "invalid_json",
                    format!("Invalid JSON: {}", e),
                    400,
                ));
            }
        }
    };

    let record = match parse_prediction_request(&payload) {
        Ok(record) => record,
        Err(e) => return error_response(&e),
    };

    let result = match state.pipeline.predict(&record) {
        Ok(result) => result,
        Err(e) => return error_response(&e),
    };

    tracing::info!("Predicted exam score {} for {}", result.value(), client);

    // Saving is a side effect; its failure never changes the response
    if let Some(store) = state.store.clone() {
        tokio::spawn(async move {
            if let Err(e) = store.save(&record).await {
                tracing::warn!("Failed to save submitted input: {}", e);
            }
        });
    }

    HttpResponse::Ok().json(PredictionResponse {
        prediction: result.value(),
    })
}

/// Build the single error response for a failed prediction
///
/// Client errors carry their message; server errors are logged and answered
/// with a generic message.
fn error_response(err: &PredictionError) -> HttpResponse {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if err.is_client_error() {
        tracing::info!("Rejected prediction request: {}", err);
        err.to_string()
    } else {
        tracing::error!("Error in prediction: {}", err);
        "Error processing the request".to_string()
    };

    HttpResponse::build(status).json(ErrorResponse::new(err.kind(), message, err.status_code()))
}
