use thiserror::Error;

/// Error for BookmarkId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookmarkIdError {
    #[error("Invalid numeric identifier: {0}")]
    InvalidFormat(String),
}

/// Error for BookmarkTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("Title must not be blank")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for BookmarkUrl validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Invalid URL: {0}")]
    Unparsable(String),

    #[error("Unsupported URL scheme: {0} (only http and https are allowed)")]
    UnsupportedScheme(String),
}

/// Top-level error for all bookmark-related operations
#[derive(Debug, Clone, Error)]
pub enum BookmarkError {
    #[error("Invalid bookmark ID: {0}")]
    InvalidBookmarkId(#[from] BookmarkIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("{0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Bookmark not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
