/// Task model and database operations
///
/// Tasks are scheduled maintenance items for a hive. They are global: every
/// beekeeper sees and may change every task. The hive reference is only
/// checked when a task is created.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     task_id          BIGSERIAL PRIMARY KEY,
///     hive_id          BIGINT NOT NULL REFERENCES hives(hive_id) ON DELETE CASCADE,
///     task_description TEXT NOT NULL,
///     due_date         TIMESTAMPTZ NOT NULL,
///     completed        BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use chrono::Utc;
/// use hivehelper_shared::models::task::{CreateTask, Task, UpdateTask};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     hive_id: 1,
///     task_description: "Inspect brood frames".to_string(),
///     due_date: Utc::now(),
/// }).await?;
///
/// Task::update(&pool, task.task_id, UpdateTask {
///     completed: Some(true),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const TASK_COLUMNS: &str = "task_id, hive_id, task_description, due_date, completed";

/// Scheduled maintenance item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub task_id: i64,

    /// Hive the task is for
    pub hive_id: i64,

    /// What needs doing
    pub task_description: String,

    /// When it is due
    pub due_date: DateTime<Utc>,

    /// Whether it has been done
    pub completed: bool,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub hive_id: i64,
    pub task_description: String,
    pub due_date: DateTime<Utc>,
}

/// Partial update of a task; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTask {
    pub task_description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl UpdateTask {
    /// Returns true if no field would be written
    pub fn is_empty(&self) -> bool {
        self.task_description.is_none() && self.due_date.is_none() && self.completed.is_none()
    }

    /// Applies the supplied fields to an in-memory task
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(ref task_description) = self.task_description {
            task.task_description = task_description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

impl Task {
    /// Inserts a new, not yet completed task
    ///
    /// # Errors
    ///
    /// Foreign key violation if the hive does not exist
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (hive_id, task_description, due_date) \
             VALUES ($1, $2, $3) RETURNING {TASK_COLUMNS}"
        ))
        .bind(data.hive_id)
        .bind(data.task_description)
        .bind(data.due_date)
        .fetch_one(pool)
        .await
    }

    /// Lists tasks ordered by due date, optionally for one hive
    pub async fn list(pool: &PgPool, hive_id: Option<i64>) -> Result<Vec<Self>, sqlx::Error> {
        match hive_id {
            Some(hive_id) => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE hive_id = $1 ORDER BY due_date, task_id"
                ))
                .bind(hive_id)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks ORDER BY due_date, task_id"
                ))
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Writes the supplied columns of a task
    ///
    /// # Returns
    ///
    /// True if a row was updated; false if the ID is unknown or nothing was supplied
    pub async fn update(pool: &PgPool, task_id: i64, data: UpdateTask) -> Result<bool, sqlx::Error> {
        if data.is_empty() {
            return Ok(false);
        }

        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.task_description.is_some() {
            bind_count += 1;
            assignments.push(format!("task_description = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            assignments.push(format!("due_date = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            assignments.push(format!("completed = ${}", bind_count));
        }

        let query = format!("UPDATE tasks SET {} WHERE task_id = $1", assignments.join(", "));

        let mut q = sqlx::query(&query).bind(task_id);

        if let Some(task_description) = data.task_description {
            q = q.bind(task_description);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let result = q.execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task by ID
    pub async fn delete(pool: &PgPool, task_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1")
            .bind(task_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task {
            task_id: 1,
            hive_id: 1,
            task_description: "Add super".to_string(),
            due_date: Utc::now(),
            completed: true,
        }
    }

    #[test]
    fn test_completed_false_is_a_supplied_field() {
        let update = UpdateTask {
            completed: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());

        let mut t = task();
        update.apply_to(&mut t);
        assert!(!t.completed);
        assert_eq!(t.task_description, "Add super");
    }

    #[test]
    fn test_update_task_default_is_empty() {
        assert!(UpdateTask::default().is_empty());
    }
}
