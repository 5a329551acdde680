use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::PredictError;

pub enum ApiError {
    MissingTle,
    Predict(PredictError),
    Internal(String),
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Predict(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingTle => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "tle_required",
                    "TLE lines are required",
                )),
            )
                .into_response(),
            ApiError::Predict(e) => {
                let status = match e {
                    PredictError::InvalidOrbitalElements(_)
                    | PredictError::InvalidParameters(_) => StatusCode::BAD_REQUEST,
                    PredictError::TleFile { .. } | PredictError::Io(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (
                    status,
                    Json(ErrorResponse::with_message(e.code(), &e.to_string())),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                log::error!("Pass search failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("internal_error")),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
