use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CelebrateError;
use crate::types::Validate;

/// JSON body that deserialized cleanly (no unknown fields) and has every required field.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = CelebrateError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(map_json_rejection)?;

        let missing = body.missing_fields();
        if !missing.is_empty() {
            debug!(fields = ?missing, "request rejected for missing fields");
            return Err(CelebrateError::MissingFields(missing));
        }
        Ok(ValidJson(body))
    }
}

fn map_json_rejection(rejection: JsonRejection) -> CelebrateError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return CelebrateError::PayloadTooLarge;
    }
    debug!(reason = %rejection.body_text(), "malformed JSON body");
    CelebrateError::InvalidRequest(rejection.body_text())
}
