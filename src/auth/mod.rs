//! Authentication and account management

mod session;
mod types;

use crate::error::Error;
use crate::fetch::{Ack, Http};

pub use session::*;
pub use types::*;

/// Client for the auth endpoints
#[derive(Clone)]
pub struct AuthApi {
    http: Http,
}

impl AuthApi {
    pub(crate) fn new(http: Http) -> Self {
        Self { http }
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, Error> {
        self.http
            .post("/auth/login")
            .json(credentials)?
            .execute()
            .await
    }

    /// Register a new account
    pub async fn signup(&self, data: &SignupData) -> Result<Ack, Error> {
        self.http.post("/auth/signup").json(data)?.execute().await
    }

    /// Fetch the signed-in user's profile
    pub async fn profile(&self) -> Result<User, Error> {
        self.http.get("/auth/profile").execute().await
    }

    /// Update the signed-in user's profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, Error> {
        self.http
            .patch("/auth/profile")
            .json(update)?
            .execute()
            .await
    }

    /// Change the signed-in user's password
    pub async fn update_password(&self, update: &PasswordUpdate) -> Result<Ack, Error> {
        self.http
            .patch("/auth/password")
            .json(update)?
            .execute()
            .await
    }

    /// Fetch another user's public profile
    pub async fn public_profile(&self, user_id: i64) -> Result<PublicUser, Error> {
        self.http
            .get(&format!("/auth/user/{user_id}"))
            .execute()
            .await
    }
}
