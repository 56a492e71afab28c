use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The main error type for gangway operations
#[derive(Debug, thiserror::Error)]
pub enum GangwayError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Standard error response format.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    error_id: String,
}

impl GangwayError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) | Self::Anyhow(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns a message safe to expose to clients.
    ///
    /// Client errors (4xx) carry their real message; server errors (5xx)
    /// collapse to generic text so store/internal detail never reaches the
    /// browser. Full detail is logged server-side.
    fn safe_message(&self) -> String {
        match self {
            Self::NotFound(msg) => format!("Not found: {}", msg),
            Self::BadRequest(msg) => format!("Bad request: {}", msg),
            Self::Unauthorized(msg) => format!("Unauthorized: {}", msg),
            Self::Forbidden(msg) => format!("Forbidden: {}", msg),
            Self::Internal(_) | Self::Anyhow(_) => "Internal server error".to_string(),
            Self::Database(_) => "Database error".to_string(),
        }
    }
}

impl IntoResponse for GangwayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            status = status.as_u16(),
            error_id = %error_id,
            error = %self,
            "Request failed"
        );

        let body = Json(ErrorResponse {
            error: self.safe_message(),
            error_id,
        });

        (status, body).into_response()
    }
}

/// Result type alias for gangway operations
pub type Result<T> = std::result::Result<T, GangwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_status_codes() {
        assert_eq!(
            GangwayError::not_found("session").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GangwayError::bad_request("bad intent").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GangwayError::unauthorized("no session").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GangwayError::forbidden("nope").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GangwayError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GangwayError::database("down").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_errors_expose_message() {
        assert_eq!(
            GangwayError::bad_request("invalid intent \"nuke\"").safe_message(),
            "Bad request: invalid intent \"nuke\""
        );
        assert_eq!(
            GangwayError::unauthorized("log in first").safe_message(),
            "Unauthorized: log in first"
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        assert_eq!(
            GangwayError::internal("db password is hunter2").safe_message(),
            "Internal server error"
        );
        assert_eq!(
            GangwayError::database("connection to db-prod-01:5432 refused").safe_message(),
            "Database error"
        );

        let err: GangwayError = anyhow::anyhow!("sensitive stack").into();
        assert_eq!(err.safe_message(), "Internal server error");
    }

    #[tokio::test]
    async fn test_into_response_hides_internal_detail() {
        let err = GangwayError::internal("secret detail");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert!(uuid::Uuid::parse_str(json["error_id"].as_str().unwrap()).is_ok());
    }
}
