//! Project management

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::{Ack, Http};

/// A project grouping tasks, optionally owned by a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Payload for creating a project
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            team_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_team(mut self, team_id: i64) -> Self {
        self.team_id = Some(team_id);
        self
    }
}

/// Partial project update
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Client for the projects endpoints
#[derive(Clone)]
pub struct ProjectsClient {
    http: Http,
}

impl ProjectsClient {
    pub(crate) fn new(http: Http) -> Self {
        Self { http }
    }

    /// Create a new project
    pub async fn create(&self, project: &NewProject) -> Result<Project, Error> {
        self.http.post("/projects").json(project)?.execute().await
    }

    /// List a team's projects
    pub async fn for_team(&self, team_id: i64) -> Result<Vec<Project>, Error> {
        self.http
            .get(&format!("/projects/team/{team_id}"))
            .execute()
            .await
    }

    /// Update a project
    pub async fn update(&self, project_id: i64, update: &ProjectUpdate) -> Result<Project, Error> {
        self.http
            .patch(&format!("/projects/{project_id}"))
            .json(update)?
            .execute()
            .await
    }

    /// Delete a project
    pub async fn delete(&self, project_id: i64) -> Result<Ack, Error> {
        self.http
            .delete(&format!("/projects/{project_id}"))
            .execute()
            .await
    }
}
