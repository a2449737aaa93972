//! Shared state for the API layer.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::config::ResponderConfig;
use crate::protocol::ProtocolServices;

/// Shared context for all API routes. Cheap to clone.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<ResponderConfig>,
    pub services: ProtocolServices,
    db: Arc<Mutex<Connection>>,
}

impl ApiContext {
    pub fn new(config: ResponderConfig, services: ProtocolServices, conn: Connection) -> Self {
        Self {
            config: Arc::new(config),
            services,
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Lock the database connection. Hold the guard only for the query.
    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".into()))
    }
}
