use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::bookmark::models::Bookmark;

mod create_bookmark;
mod delete_bookmark;
mod get_bookmark;
mod list_bookmarks;
mod update_bookmark;

pub use create_bookmark::create_bookmark;
pub use create_bookmark::CreateBookmarkRequest;
pub use delete_bookmark::delete_bookmark;
pub use get_bookmark::get_bookmark;
pub use list_bookmarks::list_bookmarks;
pub use update_bookmark::update_bookmark;
pub use update_bookmark::UpdateBookmarkRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkData {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Bookmark> for BookmarkData {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            id: bookmark.id.0,
            title: bookmark.title.as_str().to_string(),
            description: bookmark.description.clone(),
            url: bookmark.url.as_str().to_string(),
            user_id: bookmark.owner_id.0,
            created_at: bookmark.created_at,
        }
    }
}
