use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Short-lived caching keeps hot redirects off the service while still
/// letting moved or removed links converge quickly.
const REDIRECT_CACHE_CONTROL: &str = "max-age=100, public";

/// `GET /{code}`. 301 to the stored URL; unknown or malformed codes are
/// both a plain 404.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    let url = state
        .shortener
        .resolve(&code)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [
            (header::LOCATION, url),
            (header::CACHE_CONTROL, REDIRECT_CACHE_CONTROL.to_owned()),
        ],
    )
        .into_response())
}
