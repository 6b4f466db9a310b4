/// PostgreSQL store
///
/// Thin adapter from the repository traits to the model queries; driver
/// errors are classified into [`StoreError`](crate::error::StoreError) here.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{BeekeeperRepository, HealthRecordRepository, HiveRepository, Store, TaskRepository};
use crate::db::pool::health_check;
use crate::error::StoreResult;
use crate::models::beekeeper::{Beekeeper, CreateBeekeeper};
use crate::models::health_record::{CreateHealthRecord, HealthRecord, UpdateHealthRecord};
use crate::models::hive::{CreateHive, Hive, HiveFilter, UpdateHive};
use crate::models::task::{CreateTask, Task, UpdateTask};

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BeekeeperRepository for PgStore {
    async fn create_beekeeper(&self, data: CreateBeekeeper) -> StoreResult<Beekeeper> {
        Ok(Beekeeper::create(&self.pool, data).await?)
    }

    async fn find_beekeeper_by_email(&self, email: &str) -> StoreResult<Option<Beekeeper>> {
        Ok(Beekeeper::find_by_email(&self.pool, email).await?)
    }
}

#[async_trait]
impl HiveRepository for PgStore {
    async fn create_hive(&self, data: CreateHive) -> StoreResult<Hive> {
        Ok(Hive::create(&self.pool, data).await?)
    }

    async fn find_hive(&self, hive_id: i64) -> StoreResult<Option<Hive>> {
        Ok(Hive::find_by_id(&self.pool, hive_id).await?)
    }

    async fn find_owned_hive(&self, hive_id: i64, beekeeper_id: i64) -> StoreResult<Option<Hive>> {
        Ok(Hive::find_owned(&self.pool, hive_id, beekeeper_id).await?)
    }

    async fn find_hive_by_name(&self, beekeeper_id: i64, hive_name: &str) -> StoreResult<Option<Hive>> {
        Ok(Hive::find_by_owner_and_name(&self.pool, beekeeper_id, hive_name).await?)
    }

    async fn list_hives(&self, filter: &HiveFilter) -> StoreResult<Vec<Hive>> {
        Ok(Hive::list(&self.pool, filter).await?)
    }

    async fn update_owned_hive(
        &self,
        hive_id: i64,
        beekeeper_id: i64,
        data: UpdateHive,
    ) -> StoreResult<Option<Hive>> {
        Ok(Hive::update_owned(&self.pool, hive_id, beekeeper_id, data).await?)
    }

    async fn delete_owned_hive(&self, hive_id: i64, beekeeper_id: i64) -> StoreResult<bool> {
        Ok(Hive::delete_owned(&self.pool, hive_id, beekeeper_id).await?)
    }
}

#[async_trait]
impl HealthRecordRepository for PgStore {
    async fn create_health_record(&self, data: CreateHealthRecord) -> StoreResult<HealthRecord> {
        Ok(HealthRecord::create(&self.pool, data).await?)
    }

    async fn list_health_records(&self, hive_id: i64) -> StoreResult<Vec<HealthRecord>> {
        Ok(HealthRecord::list_by_hive(&self.pool, hive_id).await?)
    }

    async fn list_all_health_records(&self) -> StoreResult<Vec<HealthRecord>> {
        Ok(HealthRecord::list_all(&self.pool).await?)
    }

    async fn update_health_record(&self, health_id: i64, data: UpdateHealthRecord) -> StoreResult<bool> {
        Ok(HealthRecord::update(&self.pool, health_id, data).await?)
    }

    async fn delete_health_record(&self, health_id: i64) -> StoreResult<bool> {
        Ok(HealthRecord::delete(&self.pool, health_id).await?)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn list_tasks(&self, hive_id: Option<i64>) -> StoreResult<Vec<Task>> {
        Ok(Task::list(&self.pool, hive_id).await?)
    }

    async fn update_task(&self, task_id: i64, data: UpdateTask) -> StoreResult<bool> {
        Ok(Task::update(&self.pool, task_id, data).await?)
    }

    async fn delete_task(&self, task_id: i64) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, task_id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
