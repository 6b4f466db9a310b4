/// In-process store
///
/// Tables are `BTreeMap`s keyed by ID behind one `RwLock`, so every
/// operation sees a consistent snapshot and ID order is free. The constraints
/// of the SQL schema are reproduced: unique email, unique (owner, hive name),
/// hive references on insert, and cascading hive deletes. Violations carry
/// the same constraint names PostgreSQL reports.
///
/// Nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{BeekeeperRepository, HealthRecordRepository, HiveRepository, Store, TaskRepository};
use crate::error::{StoreError, StoreResult};
use crate::models::beekeeper::{Beekeeper, CreateBeekeeper, EMAIL_UNIQUE_CONSTRAINT};
use crate::models::health_record::{CreateHealthRecord, HealthRecord, UpdateHealthRecord};
use crate::models::hive::{CreateHive, Hive, HiveFilter, UpdateHive, OWNER_NAME_UNIQUE_CONSTRAINT};
use crate::models::task::{CreateTask, Task, UpdateTask};

const HIVE_OWNER_FK: &str = "hives_beekeeper_id_fkey";
const HEALTH_HIVE_FK: &str = "hive_health_hive_id_fkey";
const TASK_HIVE_FK: &str = "tasks_hive_id_fkey";

#[derive(Debug, Default)]
struct Tables {
    beekeepers: BTreeMap<i64, Beekeeper>,
    hives: BTreeMap<i64, Hive>,
    health_records: BTreeMap<i64, HealthRecord>,
    tasks: BTreeMap<i64, Task>,
    last_id: i64,
}

impl Tables {
    /// Next ID, shared by all tables like a single sequence
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn name_taken(&self, beekeeper_id: i64, hive_name: &str, except: Option<i64>) -> bool {
        self.hives.values().any(|hive| {
            hive.beekeeper_id == beekeeper_id
                && hive.hive_name == hive_name
                && Some(hive.hive_id) != except
        })
    }
}

/// Store holding everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BeekeeperRepository for MemoryStore {
    async fn create_beekeeper(&self, data: CreateBeekeeper) -> StoreResult<Beekeeper> {
        let mut tables = self.tables.write().await;

        if tables.beekeepers.values().any(|b| b.email == data.email) {
            return Err(StoreError::UniqueViolation(EMAIL_UNIQUE_CONSTRAINT.to_string()));
        }

        let beekeeper = Beekeeper {
            beekeeper_id: tables.next_id(),
            name: data.name,
            email: data.email,
            phone_number: data.phone_number,
            address: data.address,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        tables.beekeepers.insert(beekeeper.beekeeper_id, beekeeper.clone());

        Ok(beekeeper)
    }

    async fn find_beekeeper_by_email(&self, email: &str) -> StoreResult<Option<Beekeeper>> {
        let tables = self.tables.read().await;
        Ok(tables.beekeepers.values().find(|b| b.email == email).cloned())
    }
}

#[async_trait]
impl HiveRepository for MemoryStore {
    async fn create_hive(&self, data: CreateHive) -> StoreResult<Hive> {
        let mut tables = self.tables.write().await;

        if !tables.beekeepers.contains_key(&data.beekeeper_id) {
            return Err(StoreError::ForeignKeyViolation(HIVE_OWNER_FK.to_string()));
        }
        if tables.name_taken(data.beekeeper_id, &data.hive_name, None) {
            return Err(StoreError::UniqueViolation(OWNER_NAME_UNIQUE_CONSTRAINT.to_string()));
        }

        let hive = Hive {
            hive_id: tables.next_id(),
            beekeeper_id: data.beekeeper_id,
            hive_name: data.hive_name,
            location: data.location,
            hive_type: data.hive_type,
        };
        tables.hives.insert(hive.hive_id, hive.clone());

        Ok(hive)
    }

    async fn find_hive(&self, hive_id: i64) -> StoreResult<Option<Hive>> {
        Ok(self.tables.read().await.hives.get(&hive_id).cloned())
    }

    async fn find_owned_hive(&self, hive_id: i64, beekeeper_id: i64) -> StoreResult<Option<Hive>> {
        let tables = self.tables.read().await;
        Ok(tables
            .hives
            .get(&hive_id)
            .filter(|hive| hive.beekeeper_id == beekeeper_id)
            .cloned())
    }

    async fn find_hive_by_name(&self, beekeeper_id: i64, hive_name: &str) -> StoreResult<Option<Hive>> {
        let tables = self.tables.read().await;
        Ok(tables
            .hives
            .values()
            .find(|hive| hive.beekeeper_id == beekeeper_id && hive.hive_name == hive_name)
            .cloned())
    }

    async fn list_hives(&self, filter: &HiveFilter) -> StoreResult<Vec<Hive>> {
        let tables = self.tables.read().await;
        Ok(tables
            .hives
            .values()
            .filter(|hive| filter.matches(hive))
            .cloned()
            .collect())
    }

    async fn update_owned_hive(
        &self,
        hive_id: i64,
        beekeeper_id: i64,
        data: UpdateHive,
    ) -> StoreResult<Option<Hive>> {
        let mut tables = self.tables.write().await;

        match tables.hives.get(&hive_id) {
            Some(hive) if hive.beekeeper_id == beekeeper_id => {}
            _ => return Ok(None),
        }

        if let Some(ref hive_name) = data.hive_name {
            if tables.name_taken(beekeeper_id, hive_name, Some(hive_id)) {
                return Err(StoreError::UniqueViolation(OWNER_NAME_UNIQUE_CONSTRAINT.to_string()));
            }
        }

        Ok(tables.hives.get_mut(&hive_id).map(|hive| {
            data.apply_to(hive);
            hive.clone()
        }))
    }

    async fn delete_owned_hive(&self, hive_id: i64, beekeeper_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        match tables.hives.get(&hive_id) {
            Some(hive) if hive.beekeeper_id == beekeeper_id => {}
            _ => return Ok(false),
        }

        tables.hives.remove(&hive_id);
        // ON DELETE CASCADE
        tables.health_records.retain(|_, record| record.hive_id != hive_id);
        tables.tasks.retain(|_, task| task.hive_id != hive_id);

        Ok(true)
    }
}

#[async_trait]
impl HealthRecordRepository for MemoryStore {
    async fn create_health_record(&self, data: CreateHealthRecord) -> StoreResult<HealthRecord> {
        let mut tables = self.tables.write().await;

        if !tables.hives.contains_key(&data.hive_id) {
            return Err(StoreError::ForeignKeyViolation(HEALTH_HIVE_FK.to_string()));
        }

        let record = HealthRecord {
            health_id: tables.next_id(),
            hive_id: data.hive_id,
            temperature: data.temperature,
            humidity: data.humidity,
            activity_level: data.activity_level,
            timestamp: Utc::now(),
        };
        tables.health_records.insert(record.health_id, record.clone());

        Ok(record)
    }

    async fn list_health_records(&self, hive_id: i64) -> StoreResult<Vec<HealthRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<HealthRecord> = tables
            .health_records
            .values()
            .filter(|record| record.hive_id == hive_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| (record.timestamp, record.health_id));
        Ok(records)
    }

    async fn list_all_health_records(&self) -> StoreResult<Vec<HealthRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<HealthRecord> = tables.health_records.values().cloned().collect();
        records.sort_by_key(|record| (record.hive_id, record.timestamp, record.health_id));
        Ok(records)
    }

    async fn update_health_record(&self, health_id: i64, data: UpdateHealthRecord) -> StoreResult<bool> {
        if data.is_empty() {
            return Ok(false);
        }

        let mut tables = self.tables.write().await;
        Ok(tables
            .health_records
            .get_mut(&health_id)
            .map(|record| data.apply_to(record))
            .is_some())
    }

    async fn delete_health_record(&self, health_id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.health_records.remove(&health_id).is_some())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.hives.contains_key(&data.hive_id) {
            return Err(StoreError::ForeignKeyViolation(TASK_HIVE_FK.to_string()));
        }

        let task = Task {
            task_id: tables.next_id(),
            hive_id: data.hive_id,
            task_description: data.task_description,
            due_date: data.due_date,
            completed: false,
        };
        tables.tasks.insert(task.task_id, task.clone());

        Ok(task)
    }

    async fn list_tasks(&self, hive_id: Option<i64>) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|task| hive_id.map_or(true, |id| task.hive_id == id))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.due_date, task.task_id));
        Ok(tasks)
    }

    async fn update_task(&self, task_id: i64, data: UpdateTask) -> StoreResult<bool> {
        if data.is_empty() {
            return Ok(false);
        }

        let mut tables = self.tables.write().await;
        Ok(tables
            .tasks
            .get_mut(&task_id)
            .map(|task| data.apply_to(task))
            .is_some())
    }

    async fn delete_task(&self, task_id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.remove(&task_id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn seeded() -> (MemoryStore, Beekeeper, Hive) {
        let store = MemoryStore::new();
        let owner = store
            .create_beekeeper(CreateBeekeeper {
                name: "Alice".to_string(),
                email: "a@x.com".to_string(),
                phone_number: None,
                address: None,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let hive = store
            .create_hive(CreateHive {
                beekeeper_id: owner.beekeeper_id,
                hive_name: "Apiary1".to_string(),
                location: Some("North".to_string()),
                hive_type: None,
            })
            .await
            .unwrap();
        (store, owner, hive)
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let (store, _, _) = seeded().await;
        let err = store
            .create_beekeeper(CreateBeekeeper {
                name: "Other".to_string(),
                email: "a@x.com".to_string(),
                phone_number: None,
                address: None,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_unique_violation_on(EMAIL_UNIQUE_CONSTRAINT));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_is_unique_violation() {
        let (store, owner, _) = seeded().await;
        let second = store
            .create_hive(CreateHive {
                beekeeper_id: owner.beekeeper_id,
                hive_name: "Apiary2".to_string(),
                location: None,
                hive_type: None,
            })
            .await
            .unwrap();

        let rename = UpdateHive {
            hive_name: Some("Apiary1".to_string()),
            ..Default::default()
        };
        let err = store
            .update_owned_hive(second.hive_id, owner.beekeeper_id, rename)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation_on(OWNER_NAME_UNIQUE_CONSTRAINT));

        // Keeping its own name is not a conflict
        let same = UpdateHive {
            hive_name: Some("Apiary2".to_string()),
            ..Default::default()
        };
        assert!(store
            .update_owned_hive(second.hive_id, owner.beekeeper_id, same)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_foreign_keys_checked_on_insert() {
        let (store, _, _) = seeded().await;

        let err = store
            .create_task(CreateTask {
                hive_id: 9999,
                task_description: "Feed".to_string(),
                due_date: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));

        let err = store
            .create_health_record(CreateHealthRecord {
                hive_id: 9999,
                temperature: 20.0,
                humidity: 40.0,
                activity_level: 10.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn test_hive_delete_cascades() {
        let (store, owner, hive) = seeded().await;
        store
            .create_health_record(CreateHealthRecord {
                hive_id: hive.hive_id,
                temperature: 20.0,
                humidity: 40.0,
                activity_level: 10.0,
            })
            .await
            .unwrap();
        store
            .create_task(CreateTask {
                hive_id: hive.hive_id,
                task_description: "Feed".to_string(),
                due_date: Utc::now(),
            })
            .await
            .unwrap();

        // Wrong owner deletes nothing
        assert!(!store.delete_owned_hive(hive.hive_id, owner.beekeeper_id + 1).await.unwrap());

        assert!(store.delete_owned_hive(hive.hive_id, owner.beekeeper_id).await.unwrap());
        assert!(store.list_all_health_records().await.unwrap().is_empty());
        assert!(store.list_tasks(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tasks_ordered_by_due_date() {
        let (store, _, hive) = seeded().await;
        let now = Utc::now();

        for (description, offset) in [("later", 3), ("soon", 1), ("middle", 2)] {
            store
                .create_task(CreateTask {
                    hive_id: hive.hive_id,
                    task_description: description.to_string(),
                    due_date: now + Duration::days(offset),
                })
                .await
                .unwrap();
        }

        let descriptions: Vec<String> = store
            .list_tasks(Some(hive.hive_id))
            .await
            .unwrap()
            .into_iter()
            .map(|task| task.task_description)
            .collect();
        assert_eq!(descriptions, ["soon", "middle", "later"]);
    }

    #[tokio::test]
    async fn test_update_unknown_ids_report_false() {
        let (store, _, _) = seeded().await;
        let update = UpdateTask {
            completed: Some(true),
            ..Default::default()
        };
        assert!(!store.update_task(4242, update).await.unwrap());
        assert!(!store.delete_task(4242).await.unwrap());
        assert!(!store.delete_health_record(4242).await.unwrap());
    }
}
