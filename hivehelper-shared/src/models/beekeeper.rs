/// Beekeeper model and database operations
///
/// A beekeeper is a registered account. Rows are written once at registration
/// and never modified through the API.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE beekeepers (
///     beekeeper_id  BIGSERIAL PRIMARY KEY,
///     name          VARCHAR(255) NOT NULL,
///     email         VARCHAR(255) NOT NULL,
///     phone_number  VARCHAR(64),
///     address       TEXT,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT beekeepers_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use hivehelper_shared::models::beekeeper::{Beekeeper, CreateBeekeeper};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let beekeeper = Beekeeper::create(&pool, CreateBeekeeper {
///     name: "Richard Smith".to_string(),
///     email: "r.smith@example.com".to_string(),
///     phone_number: None,
///     address: None,
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = Beekeeper::find_by_email(&pool, "r.smith@example.com").await?;
/// assert_eq!(found.map(|b| b.beekeeper_id), Some(beekeeper.beekeeper_id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the UNIQUE constraint on `beekeepers.email`
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "beekeepers_email_key";

/// Beekeeper account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Beekeeper {
    /// Unique beekeeper ID
    pub beekeeper_id: i64,

    /// Display name
    pub name: String,

    /// Login email, unique across all beekeepers
    pub email: String,

    /// Optional phone number
    pub phone_number: Option<String>,

    /// Optional postal address
    pub address: Option<String>,

    /// Argon2id PHC hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

/// Input for creating a beekeeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBeekeeper {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,
}

impl Beekeeper {
    /// Inserts a new beekeeper
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `beekeepers_email_key` if the email
    /// is already registered.
    pub async fn create(pool: &PgPool, data: CreateBeekeeper) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Beekeeper>(
            r#"
            INSERT INTO beekeepers (name, email, phone_number, address, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING beekeeper_id, name, email, phone_number, address, password_hash, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone_number)
        .bind(data.address)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await
    }

    /// Finds a beekeeper by exact email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Beekeeper>(
            r#"
            SELECT beekeeper_id, name, email, phone_number, address, password_hash, created_at
            FROM beekeepers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }
}
