/// Repository traits and store implementations
///
/// Each entity has its own repository trait; [`Store`] combines them into the
/// single handle the API server holds. Services are written against the
/// narrowest trait they need, so they accept a `&dyn Store` as well as a
/// concrete store.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: SQL against PostgreSQL through the model queries
/// - [`memory::MemoryStore`]: in-process tables with the same constraints,
///   used by tests and when no database is configured
///
/// # Example
///
/// ```
/// use hivehelper_shared::store::{memory::MemoryStore, Store};
/// use std::sync::Arc;
///
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// assert_eq!(store.backend(), "memory");
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::beekeeper::{Beekeeper, CreateBeekeeper};
use crate::models::health_record::{CreateHealthRecord, HealthRecord, UpdateHealthRecord};
use crate::models::hive::{CreateHive, Hive, HiveFilter, UpdateHive};
use crate::models::task::{CreateTask, Task, UpdateTask};

/// Access to beekeeper accounts
#[async_trait]
pub trait BeekeeperRepository: Send + Sync {
    /// Inserts a beekeeper; a taken email is a unique violation
    async fn create_beekeeper(&self, data: CreateBeekeeper) -> StoreResult<Beekeeper>;

    async fn find_beekeeper_by_email(&self, email: &str) -> StoreResult<Option<Beekeeper>>;
}

/// Access to hives
#[async_trait]
pub trait HiveRepository: Send + Sync {
    /// Inserts a hive; a duplicate (owner, name) is a unique violation
    async fn create_hive(&self, data: CreateHive) -> StoreResult<Hive>;

    async fn find_hive(&self, hive_id: i64) -> StoreResult<Option<Hive>>;

    /// Finds a hive only if it belongs to `beekeeper_id`
    async fn find_owned_hive(&self, hive_id: i64, beekeeper_id: i64) -> StoreResult<Option<Hive>>;

    async fn find_hive_by_name(&self, beekeeper_id: i64, hive_name: &str) -> StoreResult<Option<Hive>>;

    /// Lists hives matching every supplied filter, ordered by ID
    async fn list_hives(&self, filter: &HiveFilter) -> StoreResult<Vec<Hive>>;

    /// Patches an owned hive; None if no such hive belongs to the owner
    async fn update_owned_hive(
        &self,
        hive_id: i64,
        beekeeper_id: i64,
        data: UpdateHive,
    ) -> StoreResult<Option<Hive>>;

    /// Deletes an owned hive with its health records and tasks
    async fn delete_owned_hive(&self, hive_id: i64, beekeeper_id: i64) -> StoreResult<bool>;
}

/// Access to health records
#[async_trait]
pub trait HealthRecordRepository: Send + Sync {
    /// Inserts a reading; an unknown hive is a foreign key violation
    async fn create_health_record(&self, data: CreateHealthRecord) -> StoreResult<HealthRecord>;

    /// Readings of one hive in chronological order
    async fn list_health_records(&self, hive_id: i64) -> StoreResult<Vec<HealthRecord>>;

    /// Every reading, ordered by hive then time
    async fn list_all_health_records(&self) -> StoreResult<Vec<HealthRecord>>;

    /// Patches a reading; false if nothing matched
    async fn update_health_record(&self, health_id: i64, data: UpdateHealthRecord) -> StoreResult<bool>;

    async fn delete_health_record(&self, health_id: i64) -> StoreResult<bool>;
}

/// Access to tasks
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task; an unknown hive is a foreign key violation
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Tasks ordered by due date, optionally for one hive
    async fn list_tasks(&self, hive_id: Option<i64>) -> StoreResult<Vec<Task>>;

    /// Patches a task; false if nothing matched
    async fn update_task(&self, task_id: i64, data: UpdateTask) -> StoreResult<bool>;

    async fn delete_task(&self, task_id: i64) -> StoreResult<bool>;
}

/// Every repository behind one handle
#[async_trait]
pub trait Store: BeekeeperRepository + HiveRepository + HealthRecordRepository + TaskRepository {
    /// Short backend name reported by `/ping`
    fn backend(&self) -> &'static str;

    /// Checks that the backend answers
    async fn ping(&self) -> StoreResult<()>;
}
