//! Classifies Diesel failures once so every repository maps them the same way.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
pub(crate) const BLOG_POSTS_TITLE_KEY: &str = "blog_posts_title_key";

/// What a repository needs to know about a failed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation { message: String },
    Connection { message: String },
    Query { message: String },
}

impl DieselFailure {
    pub(crate) fn violates(&self, constraint: &str) -> bool {
        matches!(
            self,
            Self::UniqueViolation { constraint: Some(name) } if name == constraint
        )
    }

    /// Collapse to a message for ports without dedicated variants.
    pub(crate) fn into_message(self) -> String {
        match self {
            Self::UniqueViolation { constraint } => format!(
                "unique constraint {} violated",
                constraint.as_deref().unwrap_or("<unknown>")
            ),
            Self::ForeignKeyViolation { message }
            | Self::Connection { message }
            | Self::Query { message } => message,
        }
    }
}

pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                message: info.message().to_owned(),
            }
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
            info,
        ) => DieselFailure::Connection {
            message: info.message().to_owned(),
        },
        DieselError::DatabaseError(_, info) => DieselFailure::Query {
            message: info.message().to_owned(),
        },
        DieselError::NotFound => DieselFailure::Query {
            message: "record not found".to_owned(),
        },
        other => DieselFailure::Query {
            message: other.to_string(),
        },
    }
}
