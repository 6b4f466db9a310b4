/// Owner-scoped hive operations
///
/// Every mutation re-reads ownership from the store; nothing about a hive is
/// cached between calls. A hive that exists but belongs to someone else is
/// reported exactly like a missing one.

use tracing::{debug, info};

use super::{present, required, EMPTY_UPDATE};
use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::models::hive::{CreateHive, Hive, HiveFilter, UpdateHive, OWNER_NAME_UNIQUE_CONSTRAINT};
use crate::store::HiveRepository;

const NAME_TAKEN: &str = "Hive with the same name already exists.";
const NOT_OWNED: &str = "Hive not found or not owned by the user.";

/// Hive form
#[derive(Debug, Clone, Default)]
pub struct NewHive {
    pub hive_name: Option<String>,
    pub location: Option<String>,
    pub hive_type: Option<String>,
}

fn name_conflict(err: StoreError) -> ServiceError {
    if err.is_unique_violation_on(OWNER_NAME_UNIQUE_CONSTRAINT) {
        ServiceError::Conflict(NAME_TAKEN.to_string())
    } else {
        ServiceError::Store(err)
    }
}

/// Creates a hive owned by `beekeeper_id`
///
/// # Errors
///
/// - `Validation` if the name is missing
/// - `Conflict` if the owner already has a hive with that name
pub async fn create_hive<R>(repo: &R, beekeeper_id: i64, input: NewHive) -> ServiceResult<Hive>
where
    R: HiveRepository + ?Sized,
{
    let hive_name = required(present(input.hive_name))?;

    if repo.find_hive_by_name(beekeeper_id, &hive_name).await?.is_some() {
        debug!(beekeeper_id, "Hive name already in use");
        return Err(ServiceError::Conflict(NAME_TAKEN.to_string()));
    }

    // The UNIQUE constraint still catches a concurrent insert of the same name
    let hive = repo
        .create_hive(CreateHive {
            beekeeper_id,
            hive_name,
            location: present(input.location),
            hive_type: present(input.hive_type),
        })
        .await
        .map_err(name_conflict)?;

    info!(beekeeper_id, hive_id = hive.hive_id, "Hive created");
    Ok(hive)
}

/// Lists hives matching every supplied filter
///
/// Empty filter values are ignored.
pub async fn list_hives<R>(repo: &R, filter: HiveFilter) -> ServiceResult<Vec<Hive>>
where
    R: HiveRepository + ?Sized,
{
    let filter = HiveFilter {
        location: present(filter.location),
        hive_name: present(filter.hive_name),
        beekeeper_id: filter.beekeeper_id,
    };

    Ok(repo.list_hives(&filter).await?)
}

/// Patches a hive owned by `beekeeper_id`
///
/// # Errors
///
/// - `NotFound` if the hive does not exist or belongs to someone else
/// - `Validation` if no field is supplied
/// - `Conflict` if the new name is already used by another of the owner's hives
pub async fn update_hive<R>(
    repo: &R,
    hive_id: i64,
    beekeeper_id: i64,
    changes: UpdateHive,
) -> ServiceResult<Hive>
where
    R: HiveRepository + ?Sized,
{
    if repo.find_owned_hive(hive_id, beekeeper_id).await?.is_none() {
        debug!(hive_id, beekeeper_id, "Hive update rejected, not owned");
        return Err(ServiceError::NotFound(NOT_OWNED.to_string()));
    }

    let changes = UpdateHive {
        hive_name: present(changes.hive_name),
        location: present(changes.location),
        hive_type: present(changes.hive_type),
    };
    if changes.is_empty() {
        return Err(ServiceError::Validation(EMPTY_UPDATE.to_string()));
    }

    let hive = repo
        .update_owned_hive(hive_id, beekeeper_id, changes)
        .await
        .map_err(name_conflict)?
        .ok_or_else(|| ServiceError::NotFound(NOT_OWNED.to_string()))?;

    info!(beekeeper_id, hive_id, "Hive updated");
    Ok(hive)
}

/// Deletes a hive owned by `beekeeper_id`, with its records and tasks
///
/// # Errors
///
/// `NotFound` if the hive does not exist or belongs to someone else
pub async fn delete_hive<R>(repo: &R, hive_id: i64, beekeeper_id: i64) -> ServiceResult<()>
where
    R: HiveRepository + ?Sized,
{
    if !repo.delete_owned_hive(hive_id, beekeeper_id).await? {
        debug!(hive_id, beekeeper_id, "Hive deletion rejected, not owned");
        return Err(ServiceError::NotFound(NOT_OWNED.to_string()));
    }

    info!(beekeeper_id, hive_id, "Hive deleted");
    Ok(())
}
