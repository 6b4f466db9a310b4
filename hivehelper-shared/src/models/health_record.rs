/// Health record model and database operations
///
/// A health record is one sensor reading (temperature, humidity, activity)
/// for a hive. The timestamp is assigned by the database at insertion.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE hive_health (
///     health_id      BIGSERIAL PRIMARY KEY,
///     hive_id        BIGINT NOT NULL REFERENCES hives(hive_id) ON DELETE CASCADE,
///     temperature    DOUBLE PRECISION NOT NULL,
///     humidity       DOUBLE PRECISION NOT NULL,
///     activity_level DOUBLE PRECISION NOT NULL,
///     recorded_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const HEALTH_COLUMNS: &str = "health_id, hive_id, temperature, humidity, activity_level, recorded_at";

/// Sensor reading for a hive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HealthRecord {
    pub health_id: i64,
    pub hive_id: i64,
    pub temperature: f64,
    pub humidity: f64,
    pub activity_level: f64,

    /// Insertion time
    #[sqlx(rename = "recorded_at")]
    pub timestamp: DateTime<Utc>,
}

/// Input for creating a health record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHealthRecord {
    pub hive_id: i64,
    pub temperature: f64,
    pub humidity: f64,
    pub activity_level: f64,
}

/// Partial update of a health record; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateHealthRecord {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub activity_level: Option<f64>,
}

impl UpdateHealthRecord {
    /// Returns true if no field would be written
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.activity_level.is_none()
    }

    /// Applies the supplied fields to an in-memory record
    pub fn apply_to(&self, record: &mut HealthRecord) {
        if let Some(temperature) = self.temperature {
            record.temperature = temperature;
        }
        if let Some(humidity) = self.humidity {
            record.humidity = humidity;
        }
        if let Some(activity_level) = self.activity_level {
            record.activity_level = activity_level;
        }
    }
}

impl HealthRecord {
    /// Inserts a reading stamped with the current time
    ///
    /// # Errors
    ///
    /// Foreign key violation if the hive does not exist
    pub async fn create(pool: &PgPool, data: CreateHealthRecord) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, HealthRecord>(&format!(
            "INSERT INTO hive_health (hive_id, temperature, humidity, activity_level) \
             VALUES ($1, $2, $3, $4) RETURNING {HEALTH_COLUMNS}"
        ))
        .bind(data.hive_id)
        .bind(data.temperature)
        .bind(data.humidity)
        .bind(data.activity_level)
        .fetch_one(pool)
        .await
    }

    /// Lists the readings of one hive in chronological order
    pub async fn list_by_hive(pool: &PgPool, hive_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, HealthRecord>(&format!(
            "SELECT {HEALTH_COLUMNS} FROM hive_health WHERE hive_id = $1 \
             ORDER BY recorded_at, health_id"
        ))
        .bind(hive_id)
        .fetch_all(pool)
        .await
    }

    /// Lists every reading, ordered by hive then time
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, HealthRecord>(&format!(
            "SELECT {HEALTH_COLUMNS} FROM hive_health ORDER BY hive_id, recorded_at, health_id"
        ))
        .fetch_all(pool)
        .await
    }

    /// Writes the supplied columns of a reading
    ///
    /// # Returns
    ///
    /// True if a row was updated; false if the ID is unknown or nothing was supplied
    pub async fn update(
        pool: &PgPool,
        health_id: i64,
        data: UpdateHealthRecord,
    ) -> Result<bool, sqlx::Error> {
        if data.is_empty() {
            return Ok(false);
        }

        // Build dynamic update query based on which fields are present
        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.temperature.is_some() {
            bind_count += 1;
            assignments.push(format!("temperature = ${}", bind_count));
        }
        if data.humidity.is_some() {
            bind_count += 1;
            assignments.push(format!("humidity = ${}", bind_count));
        }
        if data.activity_level.is_some() {
            bind_count += 1;
            assignments.push(format!("activity_level = ${}", bind_count));
        }

        let query = format!(
            "UPDATE hive_health SET {} WHERE health_id = $1",
            assignments.join(", ")
        );

        let mut q = sqlx::query(&query).bind(health_id);

        if let Some(temperature) = data.temperature {
            q = q.bind(temperature);
        }
        if let Some(humidity) = data.humidity {
            q = q.bind(humidity);
        }
        if let Some(activity_level) = data.activity_level {
            q = q.bind(activity_level);
        }

        let result = q.execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a reading by ID
    ///
    /// # Returns
    ///
    /// True if a row was deleted
    pub async fn delete(pool: &PgPool, health_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hive_health WHERE health_id = $1")
            .bind(health_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_serialized_as_timestamp() {
        let record = HealthRecord {
            health_id: 1,
            hive_id: 2,
            temperature: 22.4,
            humidity: 45.0,
            activity_level: 41.0,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("timestamp").is_some());
        assert!(json.get("recorded_at").is_none());
    }

    #[test]
    fn test_apply_partial_update() {
        let mut record = HealthRecord {
            health_id: 1,
            hive_id: 2,
            temperature: 22.4,
            humidity: 45.0,
            activity_level: 41.0,
            timestamp: Utc::now(),
        };

        let update = UpdateHealthRecord {
            humidity: Some(50.5),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut record);

        assert_eq!(record.humidity, 50.5);
        assert_eq!(record.temperature, 22.4);
        assert_eq!(record.activity_level, 41.0);
    }
}
