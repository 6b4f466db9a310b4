/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Session records, the `SessionStore` trait and its in-memory store
/// - [`middleware`]: Session cookie handling and the session guard
///
/// # Example
///
/// ```no_run
/// use hivehelper_shared::auth::password::{hash_password, verify_password, PasswordParams};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &PasswordParams::default())?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod middleware;
pub mod password;
pub mod session;
