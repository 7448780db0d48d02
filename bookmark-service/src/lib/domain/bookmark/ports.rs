use async_trait::async_trait;

use crate::bookmark::errors::BookmarkError;
use crate::domain::bookmark::models::Bookmark;
use crate::domain::bookmark::models::BookmarkId;
use crate::domain::bookmark::models::CreateBookmarkCommand;
use crate::domain::bookmark::models::NewBookmark;
use crate::domain::bookmark::models::UpdateBookmarkCommand;
use crate::domain::user::models::UserId;

/// Port for bookmark domain service operations.
///
/// Every operation is scoped to an owner. A bookmark owned by someone else
/// is reported exactly like one that does not exist.
#[async_trait]
pub trait BookmarkServicePort: Send + Sync + 'static {
    async fn create_bookmark(
        &self,
        owner_id: &UserId,
        command: CreateBookmarkCommand,
    ) -> Result<Bookmark, BookmarkError>;

    async fn list_bookmarks(&self, owner_id: &UserId) -> Result<Vec<Bookmark>, BookmarkError>;

    /// # Errors
    /// * `NotFound` - Bookmark does not exist or belongs to another user
    async fn get_bookmark(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
    ) -> Result<Bookmark, BookmarkError>;

    /// # Errors
    /// * `NotFound` - Bookmark does not exist or belongs to another user
    async fn update_bookmark(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
        command: UpdateBookmarkCommand,
    ) -> Result<Bookmark, BookmarkError>;

    /// # Errors
    /// * `NotFound` - Bookmark does not exist or belongs to another user
    async fn delete_bookmark(&self, owner_id: &UserId, id: &BookmarkId)
        -> Result<(), BookmarkError>;
}

/// Persistence operations for bookmarks.
#[async_trait]
pub trait BookmarkRepository: Send + Sync + 'static {
    async fn create(&self, bookmark: NewBookmark) -> Result<Bookmark, BookmarkError>;

    /// Retrieve a bookmark only if it belongs to `owner_id`.
    async fn find_for_owner(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
    ) -> Result<Option<Bookmark>, BookmarkError>;

    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<Bookmark>, BookmarkError>;

    /// # Errors
    /// * `NotFound` - Bookmark does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, bookmark: Bookmark) -> Result<Bookmark, BookmarkError>;

    /// # Errors
    /// * `NotFound` - Bookmark does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &BookmarkId) -> Result<(), BookmarkError>;
}
