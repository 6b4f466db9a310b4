/// Maintenance tasks
///
/// Tasks are global: listing, updating and deleting are not scoped to an
/// owner. The hive reference is checked at creation only.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{present, required, HIVE_NOT_FOUND};
use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::store::{HiveRepository, TaskRepository};

/// Task form
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub hive_id: Option<i64>,
    pub task_description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Lists tasks by due date, optionally for one hive
///
/// # Errors
///
/// `NotFound` when a hive filter matches no task; an unfiltered empty list
/// is not an error.
pub async fn list_tasks<R>(repo: &R, hive_id: Option<i64>) -> ServiceResult<Vec<Task>>
where
    R: TaskRepository + ?Sized,
{
    let tasks = repo.list_tasks(hive_id).await?;

    match hive_id {
        Some(hive_id) if tasks.is_empty() => {
            Err(ServiceError::NotFound(format!("No tasks found for hive #{hive_id}")))
        }
        _ => Ok(tasks),
    }
}

/// Schedules a task for an existing hive
///
/// # Errors
///
/// - `Validation` if any field is missing
/// - `NotFound` if the hive does not exist
pub async fn create_task<R>(repo: &R, input: NewTask) -> ServiceResult<Task>
where
    R: HiveRepository + TaskRepository + ?Sized,
{
    let data = CreateTask {
        hive_id: required(input.hive_id)?,
        task_description: required(present(input.task_description))?,
        due_date: required(input.due_date)?,
    };

    if repo.find_hive(data.hive_id).await?.is_none() {
        return Err(ServiceError::NotFound(HIVE_NOT_FOUND.to_string()));
    }

    let task = repo.create_task(data).await.map_err(|e| match e {
        StoreError::ForeignKeyViolation(_) => ServiceError::NotFound(HIVE_NOT_FOUND.to_string()),
        e => ServiceError::Store(e),
    })?;

    info!(hive_id = task.hive_id, task_id = task.task_id, "Task created");
    Ok(task)
}

/// Patches the supplied fields of a task
///
/// `completed` counts as supplied even when false.
///
/// # Errors
///
/// `Validation` if no field is supplied
pub async fn update_task<R>(repo: &R, task_id: i64, changes: UpdateTask) -> ServiceResult<()>
where
    R: TaskRepository + ?Sized,
{
    let changes = UpdateTask {
        task_description: present(changes.task_description),
        ..changes
    };
    if changes.is_empty() {
        return Err(ServiceError::missing_parameters());
    }

    if repo.update_task(task_id, changes).await? {
        info!(task_id, "Task updated");
    } else {
        debug!(task_id, "Task update matched nothing");
    }
    Ok(())
}

/// Deletes a task by ID
pub async fn delete_task<R>(repo: &R, task_id: i64) -> ServiceResult<()>
where
    R: TaskRepository + ?Sized,
{
    if repo.delete_task(task_id).await? {
        info!(task_id, "Task deleted");
    } else {
        debug!(task_id, "Task delete matched nothing");
    }
    Ok(())
}
