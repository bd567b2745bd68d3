//! Reader comments attached to posts.

use std::fmt;

use serde::Serialize;

use super::post::{AuthorSummary, PostId};

/// Why comment text was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyText,
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "Comment is required."),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Database identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommentId(i32);

impl CommentId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

/// Non-blank comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentText(String);

impl CommentText {
    /// Reject blank text. The body is kept as sent.
    pub fn new(raw: &str) -> Result<Self, CommentValidationError> {
        if raw.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        Ok(Self(raw.trim().to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored comment with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: AuthorSummary,
    pub text: CommentText,
}
