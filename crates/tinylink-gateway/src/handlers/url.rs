use crate::auth::AuthUser;
use crate::error::Result;
use crate::model::{CreateUrlRequest, UrlListEntry, UrlResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// `POST /api/urls`. 201 with the fresh link, or 200 when the URL
/// already had one; either way the caller gains an ownership row.
pub async fn create_url_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>)> {
    let outcome = state.shortener.create_or_get(&request.url, &user).await?;
    let status = if outcome.existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(UrlResponse::from(outcome))))
}

/// `GET /api/urls`. The caller's links, most recent association first.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<UrlListEntry>>> {
    let links = state.shortener.list(&user).await?;
    Ok(Json(
        links
            .into_iter()
            .map(|link| UrlListEntry::new(link, &state.base_url))
            .collect(),
    ))
}

/// `DELETE /api/urls/{code}`. Removes only the caller's association;
/// the short link keeps resolving for everyone else.
pub async fn delete_url_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(code): Path<String>,
) -> Result<StatusCode> {
    let removed = state.shortener.remove(&user, &code).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(crate::error::AppError::NotFound)
    }
}
