use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::bookmark::errors::BookmarkError;
use crate::domain::bookmark::models::Bookmark;
use crate::domain::bookmark::models::BookmarkId;
use crate::domain::bookmark::models::BookmarkTitle;
use crate::domain::bookmark::models::BookmarkUrl;
use crate::domain::bookmark::models::NewBookmark;
use crate::domain::bookmark::ports::BookmarkRepository;
use crate::domain::user::models::UserId;

const BOOKMARK_COLUMNS: &str = "id, owner_id, title, description, url, created_at";

pub struct PostgresBookmarkRepository {
    pool: PgPool,
}

impl PostgresBookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BookmarkRow {
    id: i64,
    owner_id: i64,
    title: String,
    description: Option<String>,
    url: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookmarkRow> for Bookmark {
    type Error = BookmarkError;

    fn try_from(row: BookmarkRow) -> Result<Self, Self::Error> {
        Ok(Bookmark {
            id: BookmarkId(row.id),
            owner_id: UserId(row.owner_id),
            title: BookmarkTitle::new(row.title)?,
            description: row.description,
            url: BookmarkUrl::new(&row.url)?,
            created_at: row.created_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> BookmarkError {
    BookmarkError::DatabaseError(e.to_string())
}

#[async_trait]
impl BookmarkRepository for PostgresBookmarkRepository {
    async fn create(&self, bookmark: NewBookmark) -> Result<Bookmark, BookmarkError> {
        let query = format!(
            "INSERT INTO bookmarks (owner_id, title, description, url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {BOOKMARK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, BookmarkRow>(&query)
            .bind(bookmark.owner_id.0)
            .bind(bookmark.title.as_str())
            .bind(bookmark.description.as_deref())
            .bind(bookmark.url.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;

        Bookmark::try_from(row)
    }

    async fn find_for_owner(
        &self,
        owner_id: &UserId,
        id: &BookmarkId,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        let query =
            format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = $1 AND owner_id = $2");

        sqlx::query_as::<_, BookmarkRow>(&query)
            .bind(id.0)
            .bind(owner_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(Bookmark::try_from)
            .transpose()
    }

    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<Bookmark>, BookmarkError> {
        let query =
            format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE owner_id = $1 ORDER BY id");

        let rows = sqlx::query_as::<_, BookmarkRow>(&query)
            .bind(owner_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        rows.into_iter().map(Bookmark::try_from).collect()
    }

    async fn update(&self, bookmark: Bookmark) -> Result<Bookmark, BookmarkError> {
        let query = format!(
            "UPDATE bookmarks \
             SET title = $2, description = $3, url = $4 \
             WHERE id = $1 \
             RETURNING {BOOKMARK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, BookmarkRow>(&query)
            .bind(bookmark.id.0)
            .bind(bookmark.title.as_str())
            .bind(bookmark.description.as_deref())
            .bind(bookmark.url.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .ok_or(BookmarkError::NotFound(bookmark.id.to_string()))?;

        Bookmark::try_from(row)
    }

    async fn delete(&self, id: &BookmarkId) -> Result<(), BookmarkError> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(BookmarkError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
