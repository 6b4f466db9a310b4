/// Sensor readings per hive
///
/// Any signed-in beekeeper may record readings for any existing hive.
/// Updates and deletes address a reading by ID alone; an unknown ID is a
/// no-op, not an error.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::{finite, required, EMPTY_UPDATE, HIVE_NOT_FOUND};
use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::models::health_record::{CreateHealthRecord, HealthRecord, UpdateHealthRecord};
use crate::store::{HealthRecordRepository, HiveRepository};

/// Reading form; zero is a valid measurement
#[derive(Debug, Clone, Default)]
pub struct NewHealthRecord {
    pub hive_id: Option<i64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub activity_level: Option<f64>,
}

/// Result of listing readings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HealthListing {
    /// Readings of the requested hive
    Hive(Vec<HealthRecord>),

    /// Every reading, keyed by hive ID
    ByHive(BTreeMap<i64, Vec<HealthRecord>>),
}

/// Records a reading for an existing hive
///
/// # Errors
///
/// - `Validation` if any field is missing or a reading is not finite
/// - `NotFound` if the hive does not exist
pub async fn create_health_record<R>(repo: &R, input: NewHealthRecord) -> ServiceResult<HealthRecord>
where
    R: HiveRepository + HealthRecordRepository + ?Sized,
{
    let data = CreateHealthRecord {
        hive_id: required(input.hive_id)?,
        temperature: required(finite(input.temperature)?)?,
        humidity: required(finite(input.humidity)?)?,
        activity_level: required(finite(input.activity_level)?)?,
    };

    if repo.find_hive(data.hive_id).await?.is_none() {
        return Err(ServiceError::NotFound(HIVE_NOT_FOUND.to_string()));
    }

    let record = repo.create_health_record(data).await.map_err(|e| match e {
        // Hive deleted between the check and the insert
        StoreError::ForeignKeyViolation(_) => ServiceError::NotFound(HIVE_NOT_FOUND.to_string()),
        e => ServiceError::Store(e),
    })?;

    info!(hive_id = record.hive_id, health_id = record.health_id, "Health record created");
    Ok(record)
}

/// Lists the readings of one hive, or of all hives grouped by hive ID
pub async fn list_health_records<R>(repo: &R, hive_id: Option<i64>) -> ServiceResult<HealthListing>
where
    R: HealthRecordRepository + ?Sized,
{
    match hive_id {
        Some(hive_id) => Ok(HealthListing::Hive(repo.list_health_records(hive_id).await?)),
        None => {
            let mut grouped: BTreeMap<i64, Vec<HealthRecord>> = BTreeMap::new();
            for record in repo.list_all_health_records().await? {
                grouped.entry(record.hive_id).or_default().push(record);
            }
            Ok(HealthListing::ByHive(grouped))
        }
    }
}

/// Patches the supplied fields of a reading
///
/// # Errors
///
/// `Validation` if no field is supplied or a reading is not finite
pub async fn update_health_record<R>(
    repo: &R,
    health_id: i64,
    changes: UpdateHealthRecord,
) -> ServiceResult<()>
where
    R: HealthRecordRepository + ?Sized,
{
    if changes.is_empty() {
        return Err(ServiceError::Validation(EMPTY_UPDATE.to_string()));
    }
    for reading in [changes.temperature, changes.humidity, changes.activity_level] {
        finite(reading)?;
    }

    if repo.update_health_record(health_id, changes).await? {
        info!(health_id, "Health record updated");
    } else {
        debug!(health_id, "Health record update matched nothing");
    }
    Ok(())
}

/// Deletes a reading by ID
pub async fn delete_health_record<R>(repo: &R, health_id: i64) -> ServiceResult<()>
where
    R: HealthRecordRepository + ?Sized,
{
    if repo.delete_health_record(health_id).await? {
        info!(health_id, "Health record deleted");
    } else {
        debug!(health_id, "Health record delete matched nothing");
    }
    Ok(())
}
