use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::BookmarkData;
use crate::bookmark::ports::BookmarkServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_bookmarks(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(owner)): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<BookmarkData>>, ApiError> {
    state
        .bookmark_service
        .list_bookmarks(&owner.id)
        .await
        .map_err(ApiError::from)
        .map(|bookmarks| {
            ApiSuccess::new(
                StatusCode::OK,
                bookmarks.iter().map(BookmarkData::from).collect(),
            )
        })
}
