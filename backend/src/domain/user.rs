//! Users, roles and the validated values a user is built from.

use std::fmt;

use serde::Serialize;

/// Maximum stored length of a display name, in characters.
pub const DISPLAY_NAME_MAX: usize = 1000;
/// Maximum stored length of an email address, in characters.
pub const EMAIL_MAX: usize = 100;

/// Validation failures for user-supplied identity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    EmptyPassword,
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDisplayName => write!(f, "Name is required."),
            Self::DisplayNameTooLong { max } => {
                write!(f, "Name must be at most {max} characters.")
            }
            Self::EmptyEmail => write!(f, "Email is required."),
            Self::EmailTooLong { max } => write!(f, "Email must be at most {max} characters."),
            Self::InvalidEmail => write!(f, "Invalid email address."),
            Self::EmptyPassword => write!(f, "Password is required."),
            Self::UnknownRole { value } => write!(f, "unknown role {value:?}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Database identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authorisation role, fixed when the user is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Reader,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Reader => "reader",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = UserValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Self::Admin),
            "reader" => Ok(Self::Reader),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Human readable name shown on posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim and validate a display name.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Login identifier; unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an email address.
    ///
    /// The address must contain exactly one `@` with a non-empty local part
    /// and a dotted domain, and no whitespace.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let domain_ok = !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.');
        if local.is_empty() || !domain_ok {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted user. Password material never leaves the persistence layer
/// through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    role: Role,
}

impl User {
    pub const fn new(id: UserId, name: DisplayName, email: EmailAddress, role: Role) -> Self {
        Self {
            id,
            name,
            email,
            role,
        }
    }

    pub const fn id(&self) -> UserId {
        self.id
    }

    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Who is making the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Identity {
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }

    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }
}
