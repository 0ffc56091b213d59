use std::sync::Arc;

use traduko_core::capability::RolePolicy;
use traduko_events::Mailer;
use traduko_storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: traduko_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// S3 client for project files.
    pub storage: ObjectStorage,
    /// SMTP mailer for outcome notifications.
    pub mailer: Mailer,
    /// Capability policy consulted by every guarded handler.
    pub policy: RolePolicy,
}
