use crate::error::{AppError, Result};
use crate::model::{TokenRequest, TokenResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use tinylink_core::UserId;
use tinylink_service::ServiceError;

/// `POST /api/token`. Issues a bearer token for a user id; the id is
/// lowercased before it becomes the token subject, so mixed-case input
/// authenticates as the same user.
pub async fn issue_token_handler(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    let user = UserId::parse(&request.user_id).map_err(ServiceError::from)?;
    let token = state
        .tokens
        .issue(&user)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(TokenResponse {
        token,
        user_id: user.as_str().to_owned(),
    }))
}
