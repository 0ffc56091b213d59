//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `administrator` role.
//! - [`rbac::require_capability`] -- Checks a role against the capability policy.

pub mod auth;
pub mod rbac;
