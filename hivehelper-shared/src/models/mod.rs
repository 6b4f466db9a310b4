/// Database models for HiveHelper
///
/// This module contains the persisted entities and their SQL operations
/// against PostgreSQL. Business rules (required fields, ownership, error
/// mapping) live in `services`; these functions only run statements.
///
/// # Models
///
/// - `beekeeper`: Registered user accounts
/// - `hive`: Apiary records owned by one beekeeper
/// - `health_record`: Time-stamped sensor readings per hive
/// - `task`: Scheduled maintenance items, visible to everyone
///
/// # Example
///
/// ```no_run
/// use hivehelper_shared::models::hive::{CreateHive, Hive};
/// use hivehelper_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let hive = Hive::create(&pool, CreateHive {
///     beekeeper_id: 1,
///     hive_name: "Apiary1".to_string(),
///     location: Some("North paddock".to_string()),
///     hive_type: Some("Langstroth".to_string()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod beekeeper;
pub mod health_record;
pub mod hive;
pub mod task;
