/// Registration and credential verification
///
/// Session issuance is left to the caller: a successful [`authenticate`]
/// returns the beekeeper, and the API server binds a session to it.
///
/// # Example
///
/// ```
/// use hivehelper_shared::auth::password::PasswordParams;
/// use hivehelper_shared::services::auth::{authenticate, register, Credentials, Registration};
/// use hivehelper_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let params = PasswordParams { memory_kib: 1024, iterations: 1, parallelism: 1, output_len: 32 };
///
/// register(&store, Registration {
///     name: Some("Alice".to_string()),
///     email: Some("a@x.com".to_string()),
///     password: Some("pw1".to_string()),
///     ..Default::default()
/// }, &params).await?;
///
/// let beekeeper = authenticate(&store, Credentials {
///     email: Some("a@x.com".to_string()),
///     password: Some("pw1".to_string()),
/// }).await?;
/// assert_eq!(beekeeper.name, "Alice");
/// # Ok(())
/// # }
/// ```

use tracing::{debug, info};

use super::{present, required};
use crate::auth::password::{hash_password_blocking, verify_password_blocking, PasswordParams};
use crate::error::{ServiceError, ServiceResult};
use crate::models::beekeeper::{Beekeeper, CreateBeekeeper, EMAIL_UNIQUE_CONSTRAINT};
use crate::store::BeekeeperRepository;

const EMAIL_TAKEN: &str = "User with the same email already exists.";

/// Registration form
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

/// Login form
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Creates a beekeeper account
///
/// # Errors
///
/// - `Validation` if name, email or password is missing
/// - `Conflict` if the email is already registered
/// - `PasswordHash` / `Store` on internal failure
pub async fn register<R>(
    repo: &R,
    input: Registration,
    params: &PasswordParams,
) -> ServiceResult<Beekeeper>
where
    R: BeekeeperRepository + ?Sized,
{
    let name = required(present(input.name))?;
    let email = required(present(input.email))?;
    let password = required(present(input.password))?;

    if repo.find_beekeeper_by_email(&email).await?.is_some() {
        debug!("Registration rejected, email already registered");
        return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = hash_password_blocking(password, *params).await?;

    let beekeeper = repo
        .create_beekeeper(CreateBeekeeper {
            name,
            email,
            phone_number: present(input.phone_number),
            address: present(input.address),
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // Lost a race against a concurrent registration
            e if e.is_unique_violation_on(EMAIL_UNIQUE_CONSTRAINT) => {
                ServiceError::Conflict(EMAIL_TAKEN.to_string())
            }
            e => ServiceError::Store(e),
        })?;

    info!(beekeeper_id = beekeeper.beekeeper_id, "Beekeeper registered");
    Ok(beekeeper)
}

/// Checks an email/password pair
///
/// An unknown email and a wrong password fail identically.
///
/// # Errors
///
/// - `Validation` if either field is missing
/// - `InvalidCredentials` if the pair does not match an account
pub async fn authenticate<R>(repo: &R, input: Credentials) -> ServiceResult<Beekeeper>
where
    R: BeekeeperRepository + ?Sized,
{
    let email = required(present(input.email))?;
    let password = required(present(input.password))?;

    let Some(beekeeper) = repo.find_beekeeper_by_email(&email).await? else {
        debug!("Login failed, unknown email");
        return Err(ServiceError::InvalidCredentials);
    };

    if !verify_password_blocking(password, beekeeper.password_hash.clone()).await? {
        debug!(beekeeper_id = beekeeper.beekeeper_id, "Login failed, wrong password");
        return Err(ServiceError::InvalidCredentials);
    }

    Ok(beekeeper)
}
