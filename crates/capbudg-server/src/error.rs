//! HTTP error responses.
//!
//! Every error body is `{"detail": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use capbudg_data::DataError;

/// Errors surfaced by the HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// Workbook could not be loaded or extracted (500)
    Load(DataError),
    /// Unknown table or row (404)
    NotFound(DataError),
    /// Required query parameter absent (422)
    MissingParam(&'static str),
    /// Blocking task failed to complete (500)
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Load(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingParam(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Human-readable message for the response body
    pub fn detail(&self) -> String {
        match self {
            ApiError::Load(err) => format!("Error loading Excel file: {}", err),
            ApiError::NotFound(err) => err.to_string(),
            ApiError::MissingParam(name) => format!("Missing required query parameter '{}'", name),
            ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(err)
        } else {
            ApiError::Load(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            error!(%status, "{}", detail);
        } else {
            warn!(%status, "{}", detail);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_map_to_404() {
        let err: ApiError = DataError::TableNotFound("X".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.detail(), "Table 'X' not found");

        let err: ApiError = DataError::RowNotFound {
            table: "X".to_string(),
            row: "y".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_load_errors_map_to_500() {
        let err: ApiError = DataError::FileNotFound("capbudg.xls".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.detail(),
            "Error loading Excel file: File not found: capbudg.xls"
        );

        let err: ApiError = DataError::MalformedSheet("sheet is empty".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_param_is_422() {
        let err = ApiError::MissingParam("table_name");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.detail(),
            "Missing required query parameter 'table_name'"
        );
    }
}
