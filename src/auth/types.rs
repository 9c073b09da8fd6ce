//! Types for authentication and user accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user, as cached by the client. Owned by the backend; the
/// client never mutates it except by overwriting with a fresh fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID (0 for a locally derived placeholder)
    #[serde(default)]
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Profile picture, when one has been uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,

    /// Short code other users invite this user by
    #[serde(default)]
    pub code_id: String,

    /// Account creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Minimal placeholder user derived from an email address, used when
    /// the profile fetch after login fails: the name is the local part, so
    /// an authenticated session always has a displayable identity.
    pub fn from_email(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: 0,
            name,
            email: email.to_string(),
            profile_picture: None,
            code_id: String::new(),
            created_at: None,
        }
    }

    /// Whether this user is a locally derived placeholder rather than a
    /// profile fetched from the backend
    pub fn is_derived(&self) -> bool {
        self.id == 0
    }
}

/// Public view of another user's profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub code_id: String,
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize)]
pub struct SignupData {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupData {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,

    #[serde(default)]
    pub token_type: Option<String>,
}

/// Partial profile update; unset fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Password change payload
#[derive(Debug, Clone, Serialize)]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}
