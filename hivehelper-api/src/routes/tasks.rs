/// Task endpoints
///
/// Tasks are visible to every beekeeper. Listing is public; scheduling,
/// updating and deleting need a session.
///
/// # Endpoints
///
/// - `GET /tasks?hive_id=` - Tasks ordered by due date
/// - `POST /tasks` - Schedule a task for an existing hive
/// - `PUT /tasks/:task_id` - Update supplied fields
/// - `DELETE /tasks/:task_id` - Delete a task
///
/// `due_date` is an RFC 3339 timestamp (`2024-05-01T09:30:00.000Z`) or a
/// plain date (`2024-05-01`, midnight UTC).

use crate::{
    app::AppState,
    error::{ApiResult, ServiceResultExt},
    extract::{number_or_string, ApiJson, ApiPath, ApiQuery},
    routes::MessageResponse,
};
use axum::{extract::State, Json};
use chrono::{DateTime, NaiveDate, Utc};
use hivehelper_shared::{
    models::task::{Task, UpdateTask},
    services::tasks::{self, NewTask},
};
use serde::{de, Deserialize, Deserializer};
use validator::Validate;

/// List filter
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    #[serde(default, deserialize_with = "number_or_string")]
    pub hive_id: Option<i64>,
}

/// Create body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default, deserialize_with = "number_or_string")]
    pub hive_id: Option<i64>,

    #[validate(length(max = 500, message = "Task description must be at most 500 characters."))]
    pub task_description: Option<String>,

    #[serde(default, deserialize_with = "due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Update body
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(max = 500, message = "Task description must be at most 500 characters."))]
    pub task_description: Option<String>,

    #[serde(default, deserialize_with = "due_date")]
    pub due_date: Option<DateTime<Utc>>,

    pub completed: Option<bool>,
}

fn due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| de::Error::custom(format!("invalid due_date: {raw:?}")))
}

/// Lists tasks, optionally for one hive
///
/// # Errors
///
/// 404 when `hive_id` is given and the hive has no tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = tasks::list_tasks(state.store.as_ref(), query.hive_id)
        .await
        .or_fail("Failed to retrieve tasks. Please try again later.")?;

    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let input = NewTask {
        hive_id: req.hive_id,
        task_description: req.task_description,
        due_date: req.due_date,
    };

    tasks::create_task(state.store.as_ref(), input)
        .await
        .or_fail("Failed to create task. Please try again later.")?;

    Ok(Json(MessageResponse::new("Task creation successful.")))
}

pub async fn update_task(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let changes = UpdateTask {
        task_description: req.task_description,
        due_date: req.due_date,
        completed: req.completed,
    };

    tasks::update_task(state.store.as_ref(), task_id, changes)
        .await
        .or_fail("Failed to update task. Please try again later.")?;

    Ok(Json(MessageResponse::new("Task update successful.")))
}

pub async fn delete_task(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    tasks::delete_task(state.store.as_ref(), task_id)
        .await
        .or_fail("Failed to delete task. Please try again later.")?;

    Ok(Json(MessageResponse::new("Task deletion successful.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_due_date_formats() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"due_date": "2024-05-01T09:30:00.000Z"}"#).unwrap();
        assert_eq!(
            req.due_date,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
        );

        let req: UpdateTaskRequest = serde_json::from_str(r#"{"due_date": "2024-05-01"}"#).unwrap();
        assert_eq!(
            req.due_date,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );

        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"due_date": "2024-05-01T11:30:00+02:00"}"#).unwrap();
        assert_eq!(
            req.due_date,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_due_date_missing_or_invalid() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"completed": false}"#).unwrap();
        assert_eq!(req.due_date, None);
        assert_eq!(req.completed, Some(false));

        assert!(serde_json::from_str::<UpdateTaskRequest>(r#"{"due_date": "tomorrow"}"#).is_err());
    }
}
