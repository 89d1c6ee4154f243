use std::fmt;

use auth::UserId;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::post::errors::ContentError;
use crate::domain::post::errors::TitleError;

/// Post identifier assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl PostId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Post aggregate entity.
///
/// Owned by the user who wrote it; only the author may change or remove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: PostTitle,
    pub content: PostContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_written_by(&self, user: UserId) -> bool {
        self.author_id == user
    }
}

/// Post not yet persisted; storage assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: PostTitle,
    pub content: PostContent,
    pub created_at: DateTime<Utc>,
}

/// Post title value type
///
/// Non-blank, at most 500 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    const MAX_LENGTH: usize = 500;

    /// # Errors
    /// * `Empty` - Title is empty or only whitespace
    /// * `TooLong` - Title longer than 500 characters
    pub fn new(title: String) -> Result<Self, TitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();
        if length == 0 {
            Err(TitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Post body value type
///
/// Non-blank, at most 1000 characters. Inner whitespace is kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    const MAX_LENGTH: usize = 1000;

    /// # Errors
    /// * `Empty` - Content is empty or only whitespace
    /// * `TooLong` - Content longer than 1000 characters
    pub fn new(content: String) -> Result<Self, ContentError> {
        let length = content.chars().count();
        if content.trim().is_empty() {
            Err(ContentError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(ContentError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(content))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to publish a post as the authenticated user
#[derive(Debug)]
pub struct CreatePostCommand {
    pub author_id: UserId,
    pub title: PostTitle,
    pub content: PostContent,
}

/// Command to replace a post's title and content
#[derive(Debug)]
pub struct UpdatePostCommand {
    pub post_id: PostId,
    pub requested_by: UserId,
    pub title: PostTitle,
    pub content: PostContent,
}

/// Command to remove a post
#[derive(Debug)]
pub struct DeletePostCommand {
    pub post_id: PostId,
    pub requested_by: UserId,
}
