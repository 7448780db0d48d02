use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use url::Url;

use crate::bookmark::errors::BookmarkIdError;
use crate::bookmark::errors::TitleError;
use crate::bookmark::errors::UrlError;
use crate::domain::user::models::UserId;

/// Bookmark entity, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub owner_id: UserId,
    pub title: BookmarkTitle,
    pub description: Option<String>,
    pub url: BookmarkUrl,
    pub created_at: DateTime<Utc>,
}

/// Bookmark unique identifier type, assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookmarkId(pub i64);

impl BookmarkId {
    /// Parse a bookmark ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, BookmarkIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(BookmarkId(id)),
            Ok(id) => Err(BookmarkIdError::InvalidFormat(id.to_string())),
            Err(e) => Err(BookmarkIdError::InvalidFormat(e.to_string())),
        }
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Bookmark title type
///
/// Non-blank, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkTitle(String);

impl BookmarkTitle {
    const MAX_LENGTH: usize = 255;

    pub fn new(title: String) -> Result<Self, TitleError> {
        if title.trim().is_empty() {
            return Err(TitleError::Empty);
        }

        let length = title.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute `http` or `https` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkUrl(Url);

impl BookmarkUrl {
    /// Parse and validate a bookmark target.
    ///
    /// # Errors
    /// * `Unparsable` - Not an absolute URL
    /// * `UnsupportedScheme` - Scheme other than http or https
    pub fn new(raw: &str) -> Result<Self, UrlError> {
        let url = Url::parse(raw.trim()).map_err(|e| UrlError::Unparsable(e.to_string()))?;

        match url.scheme() {
            "http" | "https" if url.has_host() => Ok(Self(url)),
            "http" | "https" => Err(UrlError::Unparsable("missing host".to_string())),
            other => Err(UrlError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BookmarkUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A bookmark about to be persisted; storage assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub owner_id: UserId,
    pub title: BookmarkTitle,
    pub description: Option<String>,
    pub url: BookmarkUrl,
}

/// Command to create a bookmark for the authenticated user
#[derive(Debug)]
pub struct CreateBookmarkCommand {
    pub title: BookmarkTitle,
    pub description: Option<String>,
    pub url: BookmarkUrl,
}

/// Partial update; only provided fields change.
#[derive(Debug, Default)]
pub struct UpdateBookmarkCommand {
    pub title: Option<BookmarkTitle>,
    pub description: Option<String>,
    pub url: Option<BookmarkUrl>,
}
