/// Middleware modules for the API server
///
/// The session guard lives in `hivehelper_shared::auth::middleware`; this
/// module holds the response-wide layers.

pub mod security;
