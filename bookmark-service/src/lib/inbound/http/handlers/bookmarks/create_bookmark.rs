use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::BookmarkData;
use crate::bookmark::errors::BookmarkError;
use crate::bookmark::ports::BookmarkServicePort;
use crate::domain::bookmark::models::BookmarkTitle;
use crate::domain::bookmark::models::BookmarkUrl;
use crate::domain::bookmark::models::CreateBookmarkCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_bookmark(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(owner)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateBookmarkRequest>,
) -> Result<ApiSuccess<BookmarkData>, ApiError> {
    state
        .bookmark_service
        .create_bookmark(&owner.id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref bookmark| ApiSuccess::new(StatusCode::CREATED, bookmark.into()))
}

/// HTTP request body for creating a bookmark (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBookmarkRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    url: String,
}

impl CreateBookmarkRequest {
    fn try_into_command(self) -> Result<CreateBookmarkCommand, BookmarkError> {
        Ok(CreateBookmarkCommand {
            title: BookmarkTitle::new(self.title)?,
            description: self.description,
            url: BookmarkUrl::new(&self.url)?,
        })
    }
}
