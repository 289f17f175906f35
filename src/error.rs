use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum CelebrateError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Blocking task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Mail transport error: {0}")]
    MailError(String),

    #[error("Image payload error: {0}")]
    ImagePayload(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Invalid {0} ID")]
    InvalidId(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Category already exists!")]
    CategoryExists,

    #[error("User already exists")]
    UserExists,

    #[error("User not found!")]
    UserNotFound,

    #[error("Invalid Email or Password!")]
    InvalidCredentials,

    #[error("This User is not Authenticated for this Operation")]
    RoleMismatch,

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("request body too large")]
    PayloadTooLarge,
}

impl CelebrateError {
    /// True when sqlx reports a UNIQUE constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            CelebrateError::DatabaseError(SqlxError::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<lettre::transport::smtp::Error> for CelebrateError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        CelebrateError::MailError(e.to_string())
    }
}

impl From<lettre::error::Error> for CelebrateError {
    fn from(e: lettre::error::Error) -> Self {
        CelebrateError::MailError(e.to_string())
    }
}

impl IntoResponse for CelebrateError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            CelebrateError::DatabaseError(_)
            | CelebrateError::IoError(_)
            | CelebrateError::JsonError(_)
            | CelebrateError::HashError(_)
            | CelebrateError::TaskError(_) => {
                error!(error = %self, "request failed with internal error");
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    fields: Vec::new(),
                };
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiErrorResponse { error: body }),
                )
                    .into_response();
            }
            CelebrateError::MailError(_) => {
                error!(error = %self, "contact mail failed");
                let body = ApiErrorBody {
                    code: "MAIL_ERROR".to_string(),
                    message: "Failed to send email. Please try again later.".to_string(),
                    fields: Vec::new(),
                };
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiErrorResponse { error: body }),
                )
                    .into_response();
            }
            CelebrateError::MissingFields(_) | CelebrateError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            CelebrateError::ImagePayload(_) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
            CelebrateError::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            CelebrateError::CategoryExists | CelebrateError::UserExists => {
                (StatusCode::BAD_REQUEST, "ALREADY_EXISTS")
            }
            CelebrateError::InvalidCredentials => (StatusCode::BAD_REQUEST, "INVALID_CREDENTIALS"),
            CelebrateError::NotFound(_) | CelebrateError::UserNotFound => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            CelebrateError::RoleMismatch => (StatusCode::UNAUTHORIZED, "FORBIDDEN_ROLE"),
            CelebrateError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            CelebrateError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        };

        let fields = match &self {
            CelebrateError::MissingFields(missing) => {
                missing.iter().map(|f| f.to_string()).collect()
            }
            _ => Vec::new(),
        };
        let body = ApiErrorBody {
            code: code.to_string(),
            message: self.to_string(),
            fields,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: CelebrateError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn missing_fields_are_listed() {
        let (status, body) =
            render(CelebrateError::MissingFields(vec!["PackageName", "Price"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Missing required fields: PackageName, Price"
        );
        assert_eq!(body["error"]["fields"], serde_json::json!(["PackageName", "Price"]));
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_detail() {
        let (status, body) = render(CelebrateError::DatabaseError(SqlxError::PoolClosed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal server error occurred.");
        assert!(body["error"].get("fields").is_none());
    }

    #[tokio::test]
    async fn role_mismatch_is_unauthorized() {
        let (status, body) = render(CelebrateError::RoleMismatch).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["error"]["message"],
            "This User is not Authenticated for this Operation"
        );
    }
}
