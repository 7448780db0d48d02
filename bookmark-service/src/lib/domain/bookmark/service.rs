use std::sync::Arc;

use async_trait::async_trait;

use crate::bookmark::errors::BookmarkError;
use crate::bookmark::ports::BookmarkRepository;
use crate::bookmark::ports::BookmarkServicePort;
use crate::domain::bookmark::models::Bookmark;
use crate::domain::bookmark::models::BookmarkId;
use crate::domain::bookmark::models::CreateBookmarkCommand;
use crate::domain::bookmark::models::NewBookmark;
use crate::domain::bookmark::models::UpdateBookmarkCommand;
use crate::domain::user::models::UserId;

/// Domain service implementation for bookmark operations.
pub struct BookmarkService<BR>
where
    BR: BookmarkRepository,
{
    repository: Arc<BR>,
}

impl<BR> BookmarkService<BR>
where
    BR: BookmarkRepository,
{
    pub fn new(repository: Arc<BR>) -> Self {
        Self { repository }
    }

    async fn owned_bookmark(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
    ) -> Result<Bookmark, BookmarkError> {
        self.repository
            .find_for_owner(owner_id, id)
            .await?
            .ok_or(BookmarkError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<BR> BookmarkServicePort for BookmarkService<BR>
where
    BR: BookmarkRepository,
{
    async fn create_bookmark(
        &self,
        owner_id: &UserId,
        command: CreateBookmarkCommand,
    ) -> Result<Bookmark, BookmarkError> {
        let bookmark = self
            .repository
            .create(NewBookmark {
                owner_id: *owner_id,
                title: command.title,
                description: command.description,
                url: command.url,
            })
            .await?;

        tracing::info!(bookmark_id = %bookmark.id, owner_id = %owner_id, "Bookmark created");

        Ok(bookmark)
    }

    async fn list_bookmarks(&self, owner_id: &UserId) -> Result<Vec<Bookmark>, BookmarkError> {
        self.repository.list_for_owner(owner_id).await
    }

    async fn get_bookmark(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
    ) -> Result<Bookmark, BookmarkError> {
        self.owned_bookmark(owner_id, id).await
    }

    async fn update_bookmark(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
        command: UpdateBookmarkCommand,
    ) -> Result<Bookmark, BookmarkError> {
        let mut bookmark = self.owned_bookmark(owner_id, id).await?;

        if let Some(title) = command.title {
            bookmark.title = title;
        }
        if let Some(description) = command.description {
            bookmark.description = Some(description);
        }
        if let Some(url) = command.url {
            bookmark.url = url;
        }

        let updated = self.repository.update(bookmark).await?;

        tracing::info!(bookmark_id = %updated.id, owner_id = %owner_id, "Bookmark updated");

        Ok(updated)
    }

    async fn delete_bookmark(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
    ) -> Result<(), BookmarkError> {
        let bookmark = self.owned_bookmark(owner_id, id).await?;

        self.repository.delete(&bookmark.id).await?;

        tracing::info!(bookmark_id = %id, owner_id = %owner_id, "Bookmark deleted");

        Ok(())
    }
}
