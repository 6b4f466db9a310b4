/// Hive model and database operations
///
/// A hive is an apiary record owned by exactly one beekeeper. Hive names are
/// unique per owner; the same name may be used by different beekeepers.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE hives (
///     hive_id      BIGSERIAL PRIMARY KEY,
///     beekeeper_id BIGINT NOT NULL REFERENCES beekeepers(beekeeper_id) ON DELETE CASCADE,
///     hive_name    VARCHAR(255) NOT NULL,
///     location     VARCHAR(255),
///     hive_type    VARCHAR(255),
///     CONSTRAINT hives_beekeeper_name_key UNIQUE (beekeeper_id, hive_name)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use hivehelper_shared::models::hive::{Hive, HiveFilter, UpdateHive};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// // All hives at one location
/// let filter = HiveFilter {
///     location: Some("North paddock".to_string()),
///     ..Default::default()
/// };
/// let hives = Hive::list(&pool, &filter).await?;
///
/// // Move the first one, keeping its name and type
/// if let Some(hive) = hives.first() {
///     let update = UpdateHive {
///         location: Some("South paddock".to_string()),
///         ..Default::default()
///     };
///     Hive::update_owned(&pool, hive.hive_id, hive.beekeeper_id, update).await?;
/// }
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

/// Name of the UNIQUE constraint on `(beekeeper_id, hive_name)`
pub const OWNER_NAME_UNIQUE_CONSTRAINT: &str = "hives_beekeeper_name_key";

const HIVE_COLUMNS: &str = "hive_id, beekeeper_id, hive_name, location, hive_type";

/// Apiary record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hive {
    /// Unique hive ID
    pub hive_id: i64,

    /// Owning beekeeper
    pub beekeeper_id: i64,

    /// Name, unique per owner
    pub hive_name: String,

    /// Free-form location
    pub location: Option<String>,

    /// Hive construction (e.g. "Langstroth", "Top bar")
    pub hive_type: Option<String>,
}

/// Input for creating a hive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHive {
    pub beekeeper_id: i64,
    pub hive_name: String,
    pub location: Option<String>,
    pub hive_type: Option<String>,
}

/// Partial update of a hive
///
/// Only `Some` fields are written; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateHive {
    pub hive_name: Option<String>,
    pub location: Option<String>,
    pub hive_type: Option<String>,
}

impl UpdateHive {
    /// Returns true if no field would be written
    pub fn is_empty(&self) -> bool {
        self.hive_name.is_none() && self.location.is_none() && self.hive_type.is_none()
    }

    /// Applies the supplied fields to an in-memory hive
    pub fn apply_to(&self, hive: &mut Hive) {
        if let Some(ref hive_name) = self.hive_name {
            hive.hive_name = hive_name.clone();
        }
        if let Some(ref location) = self.location {
            hive.location = Some(location.clone());
        }
        if let Some(ref hive_type) = self.hive_type {
            hive.hive_type = Some(hive_type.clone());
        }
    }
}

/// Optional equality filters for listing hives
///
/// Supplied filters are combined with AND; an empty filter matches every hive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HiveFilter {
    pub location: Option<String>,
    pub hive_name: Option<String>,
    pub beekeeper_id: Option<i64>,
}

impl HiveFilter {
    /// Checks a hive against every supplied filter
    pub fn matches(&self, hive: &Hive) -> bool {
        self.location
            .as_ref()
            .map_or(true, |location| hive.location.as_ref() == Some(location))
            && self
                .hive_name
                .as_ref()
                .map_or(true, |name| &hive.hive_name == name)
            && self
                .beekeeper_id
                .map_or(true, |owner| hive.beekeeper_id == owner)
    }
}

impl Hive {
    /// Inserts a new hive
    ///
    /// # Errors
    ///
    /// - Unique violation on `hives_beekeeper_name_key` for a duplicate name
    /// - Foreign key violation if the owner does not exist
    pub async fn create(pool: &PgPool, data: CreateHive) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Hive>(&format!(
            "INSERT INTO hives (beekeeper_id, hive_name, location, hive_type) \
             VALUES ($1, $2, $3, $4) RETURNING {HIVE_COLUMNS}"
        ))
        .bind(data.beekeeper_id)
        .bind(data.hive_name)
        .bind(data.location)
        .bind(data.hive_type)
        .fetch_one(pool)
        .await
    }

    /// Finds a hive by ID regardless of owner
    pub async fn find_by_id(pool: &PgPool, hive_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Hive>(&format!("SELECT {HIVE_COLUMNS} FROM hives WHERE hive_id = $1"))
            .bind(hive_id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a hive by ID, only if owned by `beekeeper_id`
    pub async fn find_owned(
        pool: &PgPool,
        hive_id: i64,
        beekeeper_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Hive>(&format!(
            "SELECT {HIVE_COLUMNS} FROM hives WHERE hive_id = $1 AND beekeeper_id = $2"
        ))
        .bind(hive_id)
        .bind(beekeeper_id)
        .fetch_optional(pool)
        .await
    }

    /// Finds an owner's hive by name
    pub async fn find_by_owner_and_name(
        pool: &PgPool,
        beekeeper_id: i64,
        hive_name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Hive>(&format!(
            "SELECT {HIVE_COLUMNS} FROM hives WHERE beekeeper_id = $1 AND hive_name = $2"
        ))
        .bind(beekeeper_id)
        .bind(hive_name)
        .fetch_optional(pool)
        .await
    }

    /// Lists hives matching every supplied filter, ordered by ID
    pub async fn list(pool: &PgPool, filter: &HiveFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {HIVE_COLUMNS} FROM hives WHERE 1=1"));

        if let Some(ref location) = filter.location {
            query.push(" AND location = ").push_bind(location.clone());
        }
        if let Some(ref hive_name) = filter.hive_name {
            query.push(" AND hive_name = ").push_bind(hive_name.clone());
        }
        if let Some(beekeeper_id) = filter.beekeeper_id {
            query.push(" AND beekeeper_id = ").push_bind(beekeeper_id);
        }
        query.push(" ORDER BY hive_id");

        query.build_query_as::<Hive>().fetch_all(pool).await
    }

    /// Applies a partial update to a hive owned by `beekeeper_id`
    ///
    /// `NULL` parameters fall back to the current column value, so omitted
    /// fields are left untouched.
    ///
    /// # Returns
    ///
    /// The updated hive, or None if no hive with that ID belongs to the owner
    pub async fn update_owned(
        pool: &PgPool,
        hive_id: i64,
        beekeeper_id: i64,
        data: UpdateHive,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Hive>(&format!(
            "UPDATE hives \
             SET hive_name = COALESCE($3, hive_name), \
                 location = COALESCE($4, location), \
                 hive_type = COALESCE($5, hive_type) \
             WHERE hive_id = $1 AND beekeeper_id = $2 \
             RETURNING {HIVE_COLUMNS}"
        ))
        .bind(hive_id)
        .bind(beekeeper_id)
        .bind(data.hive_name)
        .bind(data.location)
        .bind(data.hive_type)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a hive owned by `beekeeper_id`
    ///
    /// Health records and tasks of the hive are removed by cascade.
    ///
    /// # Returns
    ///
    /// True if a row was deleted
    pub async fn delete_owned(pool: &PgPool, hive_id: i64, beekeeper_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hives WHERE hive_id = $1 AND beekeeper_id = $2")
            .bind(hive_id)
            .bind(beekeeper_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hive() -> Hive {
        Hive {
            hive_id: 1,
            beekeeper_id: 10,
            hive_name: "Apiary1".to_string(),
            location: Some("North".to_string()),
            hive_type: Some("Langstroth".to_string()),
        }
    }

    #[test]
    fn test_update_hive_default_is_empty() {
        assert!(UpdateHive::default().is_empty());
        assert!(!UpdateHive {
            location: Some("x".to_string()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_apply_only_supplied_fields() {
        let mut h = hive();
        UpdateHive {
            location: Some("South".to_string()),
            ..Default::default()
        }
        .apply_to(&mut h);

        assert_eq!(h.location.as_deref(), Some("South"));
        assert_eq!(h.hive_name, "Apiary1");
        assert_eq!(h.hive_type.as_deref(), Some("Langstroth"));
    }

    #[test]
    fn test_filter_matches_conjunction() {
        let h = hive();
        assert!(HiveFilter::default().matches(&h));

        let by_location = HiveFilter {
            location: Some("North".to_string()),
            ..Default::default()
        };
        assert!(by_location.matches(&h));

        let location_and_wrong_owner = HiveFilter {
            location: Some("North".to_string()),
            beekeeper_id: Some(11),
            ..Default::default()
        };
        assert!(!location_and_wrong_owner.matches(&h));

        let name_and_owner = HiveFilter {
            hive_name: Some("Apiary1".to_string()),
            beekeeper_id: Some(10),
            ..Default::default()
        };
        assert!(name_and_owner.matches(&h));
    }

    #[test]
    fn test_filter_location_against_missing_location() {
        let mut h = hive();
        h.location = None;
        let filter = HiveFilter {
            location: Some("North".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&h));
    }
}
