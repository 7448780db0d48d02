use axum::extract::Path;
use axum::extract::State;
use axum::Extension;
use axum::Json;

use crate::bookmark::errors::BookmarkError;
use crate::bookmark::ports::BookmarkServicePort;
use crate::domain::bookmark::models::BookmarkId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(owner)): Extension<AuthenticatedUser>,
    Path(bookmark_id): Path<String>,
) -> Result<Json<MessageData>, ApiError> {
    let bookmark_id = BookmarkId::from_string(&bookmark_id).map_err(BookmarkError::from)?;

    state
        .bookmark_service
        .delete_bookmark(&owner.id, &bookmark_id)
        .await
        .map_err(ApiError::from)
        .map(|_| Json(MessageData::new("Bookmark deleted successfully")))
}
