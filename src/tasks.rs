//! Task tracking
//!
//! Besides the REST client this module carries the small pieces of view
//! logic the task screens are built on: kanban grouping by status,
//! calendar bucketing by due date, and overdue checks.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::{Ack, Http};

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in workflow order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// The wire representation (`todo`, `in-progress`, `done`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        };
        f.write_str(label)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(label)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A tracked task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether the task's due date has passed. Tasks without a due date
    /// are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(self.due_date, Some(due) if due < today)
    }
}

/// Payload for creating a task
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            project_id: None,
            status: None,
            priority: None,
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial task update
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Tasks grouped into kanban columns
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

impl Board {
    /// The column for a given status
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Total number of tasks across all columns
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group tasks into kanban columns. Columns are non-overlapping, their
/// union is the input, and input order is preserved within each column.
pub fn group_by_status(tasks: &[Task]) -> Board {
    let mut board = Board::default();
    for task in tasks {
        let column = match task.status {
            TaskStatus::Todo => &mut board.todo,
            TaskStatus::InProgress => &mut board.in_progress,
            TaskStatus::Done => &mut board.done,
        };
        column.push(task.clone());
    }
    board
}

/// Bucket tasks by due date for a calendar grid. Tasks without a due date
/// are excluded.
pub fn bucket_by_due_date(tasks: &[Task]) -> BTreeMap<NaiveDate, Vec<Task>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(due) = task.due_date {
            buckets.entry(due).or_default().push(task.clone());
        }
    }
    buckets
}

/// Client for the tasks endpoints
#[derive(Clone)]
pub struct TasksClient {
    http: Http,
}

impl TasksClient {
    pub(crate) fn new(http: Http) -> Self {
        Self { http }
    }

    /// Create a new task
    pub async fn create(&self, task: &NewTask) -> Result<Task, Error> {
        self.http.post("/tasks").json(task)?.execute().await
    }

    /// List a project's tasks
    pub async fn for_project(&self, project_id: i64) -> Result<Vec<Task>, Error> {
        self.http
            .get(&format!("/tasks/project/{project_id}"))
            .execute()
            .await
    }

    /// List every task visible to the signed-in user, including tasks
    /// outside any project
    pub async fn all_for_user(&self) -> Result<Vec<Task>, Error> {
        self.http.get("/tasks/user/all").execute().await
    }

    /// Update a task
    pub async fn update(&self, task_id: i64, update: &TaskUpdate) -> Result<Task, Error> {
        self.http
            .patch(&format!("/tasks/{task_id}"))
            .json(update)?
            .execute()
            .await
    }

    /// Move a task to a new workflow status. The status travels as a
    /// query parameter.
    pub async fn change_status(&self, task_id: i64, status: TaskStatus) -> Result<Task, Error> {
        self.http
            .patch(&format!("/tasks/{task_id}/status"))
            .query("status", status.as_str())
            .execute()
            .await
    }

    /// Delete a task
    pub async fn delete(&self, task_id: i64) -> Result<Ack, Error> {
        self.http
            .delete(&format!("/tasks/{task_id}"))
            .execute()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            project_id: None,
            status,
            priority: Priority::default(),
            due_date: None,
            created_at: None,
        }
    }

    #[test]
    fn status_wire_format_is_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            r#""in-progress""#
        );
        let status: TaskStatus = serde_json::from_str(r#""in-progress""#).unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(status.as_str(), "in-progress");
        assert_eq!(status.to_string(), "In Progress");
    }

    #[test]
    fn grouping_partitions_and_preserves_order() {
        let tasks = vec![
            task(1, TaskStatus::Todo),
            task(2, TaskStatus::Done),
            task(3, TaskStatus::InProgress),
            task(4, TaskStatus::Todo),
        ];
        let board = group_by_status(&tasks);

        assert_eq!(board.len(), tasks.len());
        let ids = |column: &[Task]| column.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(&board.todo), vec![1, 4]);
        assert_eq!(ids(&board.in_progress), vec![3]);
        assert_eq!(ids(&board.done), vec![2]);

        // Non-overlapping: every input id lands in exactly one column
        let mut all: Vec<i64> = TaskStatus::ALL
            .iter()
            .flat_map(|s| ids(board.column(*s)))
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3, 4]);
    }

    #[test]
    fn grouping_empty_input_yields_empty_board() {
        assert!(group_by_status(&[]).is_empty());
    }

    #[test]
    fn bucketing_skips_undated_tasks() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut dated = task(1, TaskStatus::Todo);
        dated.due_date = Some(date);
        let undated = task(2, TaskStatus::Todo);

        let buckets = bucket_by_due_date(&[dated, undated]);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[&date].len(), 1);
        assert_eq!(buckets[&date][0].id, 1);
    }

    #[test]
    fn overdue_requires_a_past_due_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let mut t = task(1, TaskStatus::Todo);
        assert!(!t.is_overdue(today));

        t.due_date = NaiveDate::from_ymd_opt(2024, 6, 14);
        assert!(t.is_overdue(today));

        t.due_date = Some(today);
        assert!(!t.is_overdue(today));
    }
}
