//! Credentials accepted by the authentication service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserValidationError};

/// Password as typed by the user. Whitespace is significant; the buffer is
/// wiped on drop.
#[derive(Clone)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        if raw.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(<redacted>)")
    }
}

/// One-way password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(<redacted>)")
    }
}

/// Validated login form input.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: PlainPassword,
}

impl LoginCredentials {
    pub const fn new(email: EmailAddress, password: PlainPassword) -> Self {
        Self { email, password }
    }

    /// Validate raw strings into credentials.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        Ok(Self::new(EmailAddress::new(email)?, PlainPassword::new(password)?))
    }

    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub const fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// Validated sign-up form input.
#[derive(Debug, Clone)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: PlainPassword,
}

impl Registration {
    pub const fn new(name: DisplayName, email: EmailAddress, password: PlainPassword) -> Self {
        Self {
            name,
            email,
            password,
        }
    }

    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            DisplayName::new(name)?,
            EmailAddress::new(email)?,
            PlainPassword::new(password)?,
        ))
    }

    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub const fn password(&self) -> &PlainPassword {
        &self.password
    }
}
