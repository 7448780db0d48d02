use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::BookmarkData;
use crate::bookmark::errors::BookmarkError;
use crate::bookmark::ports::BookmarkServicePort;
use crate::domain::bookmark::models::BookmarkId;
use crate::domain::bookmark::models::BookmarkTitle;
use crate::domain::bookmark::models::BookmarkUrl;
use crate::domain::bookmark::models::UpdateBookmarkCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a bookmark (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateBookmarkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl UpdateBookmarkRequest {
    fn try_into_command(self) -> Result<UpdateBookmarkCommand, BookmarkError> {
        let title = self.title.map(BookmarkTitle::new).transpose()?;
        let url = self
            .url
            .as_deref()
            .map(BookmarkUrl::new)
            .transpose()?;

        Ok(UpdateBookmarkCommand {
            title,
            description: self.description,
            url,
        })
    }
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(owner)): Extension<AuthenticatedUser>,
    Path(bookmark_id): Path<String>,
    Json(req): Json<UpdateBookmarkRequest>,
) -> Result<ApiSuccess<BookmarkData>, ApiError> {
    let bookmark_id = BookmarkId::from_string(&bookmark_id).map_err(BookmarkError::from)?;
    let command = req.try_into_command()?;

    state
        .bookmark_service
        .update_bookmark(&owner.id, &bookmark_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref bookmark| ApiSuccess::new(StatusCode::OK, bookmark.into()))
}
