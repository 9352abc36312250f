//! Custom Axum extractors

use axum::extract::{FromRequest, Json, Request};
use serde::Deserialize;

use super::error::ApiError;
use crate::models::{Question, ValidationError};

#[derive(Debug, Deserialize)]
struct QuestionBody {
    question: String,
}

/// Extract and validate `{"question": "..."}` from a JSON body.
///
/// Malformed bodies become the same JSON 400 as any other validation
/// failure instead of axum's plain-text rejection.
pub struct ValidQuestion(pub Question);

impl<S> FromRequest<S> for ValidQuestion
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body): Json<QuestionBody> = Json::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Rejected chat request body");
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "request body",
                    reason: "expected a JSON object with a string \"question\"",
                })
            })?;

        Ok(Self(Question::new(&body.question)?))
    }
}
