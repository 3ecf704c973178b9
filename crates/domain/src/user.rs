//! Account identity: user ids, normalized email addresses, password rules.

use std::str::FromStr;

use schoolhub_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid user id '{value}': {error}")))
    }
}

const MAX_EMAIL_LENGTH: usize = 254;

fn invalid_email(reason: &str) -> AppError {
    AppError::Validation(reason.to_owned())
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trims and lowercases `value`, then checks its shape: one `@` between a
    /// non-empty local part and a dotted domain, at most 254 characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let normalized = value.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(invalid_email("email address must not be empty"));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(invalid_email("email address must contain exactly one '@'"));
        };
        if domain.contains('@') {
            return Err(invalid_email("email address must contain exactly one '@'"));
        }
        if local.is_empty() {
            return Err(invalid_email("email local part must not be empty"));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(invalid_email("email domain must contain at least one '.'"));
        }
        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(invalid_email("email address must not exceed 254 characters"));
        }

        Ok(Self(normalized))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Shortest accepted password, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Longest accepted password, in characters. Bounds Argon2 work per login.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Checks a plaintext password before it is hashed.
///
/// Length is counted in characters, not bytes. Passwords found in
/// the embedded breached list are refused regardless of case.
pub fn validate_password(password: &str) -> AppResult<()> {
    let length = password.chars().count();
    let problem = if length < PASSWORD_MIN_LENGTH {
        format!("password must be at least {PASSWORD_MIN_LENGTH} characters")
    } else if length > PASSWORD_MAX_LENGTH {
        format!("password must not exceed {PASSWORD_MAX_LENGTH} characters")
    } else if is_breached(password) {
        "this password is too common and has appeared in data breaches".to_owned()
    } else {
        return Ok(());
    };

    Err(AppError::Validation(problem))
}

fn is_breached(password: &str) -> bool {
    BREACHED_PASSWORDS
        .binary_search(&password.to_lowercase().as_str())
        .is_ok()
}

/// Frequently breached passwords plus school-themed guesses. Kept sorted.
static BREACHED_PASSWORDS: &[&str] = &[
    "000000",
    "111111",
    "112233",
    "121212",
    "123123",
    "123321",
    "12345",
    "123456",
    "1234567",
    "12345678",
    "123456789",
    "1234567890",
    "654321",
    "666666",
    "7777777",
    "abc123",
    "abcd1234",
    "access",
    "admin",
    "admin123",
    "administrator",
    "baseball",
    "charlie",
    "classroom",
    "dragon",
    "football",
    "freedom",
    "hello",
    "iloveyou",
    "letmein",
    "login",
    "master",
    "monkey",
    "passw0rd",
    "password",
    "password1",
    "password123",
    "princess",
    "principal",
    "qwerty",
    "qwerty123",
    "qwertyuiop",
    "school",
    "school123",
    "schoolhub",
    "student",
    "student1",
    "sunshine",
    "teacher",
    "teacher1",
    "teacher123",
    "trustno1",
    "welcome",
    "welcome1",
    "whatever",
];
