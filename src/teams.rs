//! Team management

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::{Ack, Http};

/// A team the signed-in user belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default)]
    pub member_count: i64,
}

/// Payload for creating a team
#[derive(Debug, Clone, Serialize)]
pub struct NewTeam {
    pub name: String,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Partial team update
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A member of a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub code_id: String,
}

/// Current and former members of a team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMembers {
    #[serde(default)]
    pub active: Vec<TeamMember>,
    #[serde(default)]
    pub past: Vec<TeamMember>,
}

/// Client for the teams endpoints
#[derive(Clone)]
pub struct TeamsClient {
    http: Http,
}

impl TeamsClient {
    pub(crate) fn new(http: Http) -> Self {
        Self { http }
    }

    /// Create a new team owned by the signed-in user
    pub async fn create(&self, team: &NewTeam) -> Result<Team, Error> {
        self.http.post("/teams").json(team)?.execute().await
    }

    /// List teams the signed-in user belongs to
    pub async fn my_teams(&self) -> Result<Vec<Team>, Error> {
        self.http.get("/teams/my").execute().await
    }

    /// Add a member to a team by their invite code
    pub async fn add_member(&self, team_id: i64, code_id: &str) -> Result<Ack, Error> {
        self.http
            .post(&format!("/teams/{team_id}/add-member"))
            .json(&serde_json::json!({ "code_id": code_id }))?
            .execute()
            .await
    }

    /// Update a team
    pub async fn update(&self, team_id: i64, update: &TeamUpdate) -> Result<Team, Error> {
        self.http
            .patch(&format!("/teams/{team_id}"))
            .json(update)?
            .execute()
            .await
    }

    /// Delete a team
    pub async fn delete(&self, team_id: i64) -> Result<Ack, Error> {
        self.http
            .delete(&format!("/teams/{team_id}"))
            .execute()
            .await
    }

    /// Leave a team
    pub async fn leave(&self, team_id: i64) -> Result<Ack, Error> {
        self.http
            .post(&format!("/teams/{team_id}/leave"))
            .execute()
            .await
    }

    /// List a team's active and past members
    pub async fn members(&self, team_id: i64) -> Result<TeamMembers, Error> {
        self.http
            .get(&format!("/teams/{team_id}/members"))
            .execute()
            .await
    }
}
