//! Well-known header and session variable names.

/// Header and session variable names used by the Hasura engine.
pub struct Headers;

impl Headers {
    pub const X_HASURA_ADMIN_SECRET: &str = "x-hasura-admin-secret";
    pub const X_HASURA_ROLE: &str = "x-hasura-role";
    pub const X_HASURA_USER_ID: &str = "x-hasura-user-id";
    pub const X_HASURA_USE_BACKEND_ONLY_PERMISSIONS: &str = "x-hasura-use-backend-only-permissions";
    pub const X_REQUEST_ID: &str = "x-request-id";
}

/// Role granted unrestricted access by the engine.
pub const ROLE_ADMIN: &str = "admin";
