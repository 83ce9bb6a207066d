//! Input validation for the feedback API
//!
//! Provides `ValidatedJson<T>`, an extractor that deserializes the body
//! and runs `validator` rules before the handler sees it, so malformed
//! feedback is rejected with 400 and never reaches the agent.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Maximum free-text comment length
pub const MAX_COMMENT_LEN: u64 = 10_000;
/// Maximum candidate/job id length
pub const MAX_ID_LEN: u64 = 64;

/// Error type for validated JSON extraction
#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": "error",
            "error": self.message,
            "error_type": "validation_error"
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// A JSON extractor that validates the request body using the validator
/// crate before the handler runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ValidationError {
                message: format!("Invalid JSON body: {rejection}"),
            })?;

        value.validate().map_err(|errors| ValidationError {
            message: format!("Validation failed: {errors}"),
        })?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct FeedbackBody {
        #[validate(length(min = 1, max = MAX_ID_LEN))]
        id: String,
        #[validate(length(max = MAX_COMMENT_LEN))]
        comment: String,
        #[validate(range(min = 1.0, max = 5.0))]
        score: f64,
    }

    fn body(id: &str, comment: String, score: f64) -> FeedbackBody {
        FeedbackBody {
            id: id.to_string(),
            comment,
            score,
        }
    }

    #[test]
    fn test_validate_rules_apply() {
        assert!(body("C1", "fine".to_string(), 3.0).validate().is_ok());
        assert!(body("C1", "fine".to_string(), 6.0).validate().is_err());
        assert!(body("", "fine".to_string(), 3.0).validate().is_err());
        assert!(body("C1", "x".repeat(MAX_COMMENT_LEN as usize + 1), 3.0)
            .validate()
            .is_err());
    }
}
