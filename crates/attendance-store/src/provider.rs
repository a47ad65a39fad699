//! Store construction from configuration.

use std::sync::Arc;

use tracing::info;

use attendance_core::config::StoreConfig;
use attendance_core::result::AppResult;
use attendance_core::traits::DocumentStore;

/// URL scheme selecting the in-memory store.
pub const MEMORY_SCHEME: &str = "memory://";

/// Build the document store named by `config.url`.
///
/// `memory://` selects the in-process store (seeded with the primary
/// database and the configured admin pair); anything else is treated as
/// the base URL of a CouchDB-compatible server.
pub fn connect(config: &StoreConfig) -> AppResult<Arc<dyn DocumentStore>> {
    if config.url.starts_with(MEMORY_SCHEME) {
        #[cfg(feature = "memory")]
        {
            info!(database = %config.database, "Using in-memory document store");
            let mut store = crate::memory::MemoryDocumentStore::new().with_database(&config.database);
            if !config.admin_user.is_empty() && !config.admin_password.is_empty() {
                store = store.with_admin(&config.admin_user, &config.admin_password);
            }
            return Ok(Arc::new(store));
        }
        #[cfg(not(feature = "memory"))]
        return Err(attendance_core::error::AppError::configuration(
            "In-memory store requested but the `memory` feature is disabled",
        ));
    }

    #[cfg(feature = "couch")]
    {
        let client = crate::couch::CouchClient::connect(config)?;
        Ok(Arc::new(crate::couch::CouchDocumentStore::new(client)))
    }
    #[cfg(not(feature = "couch"))]
    Err(attendance_core::error::AppError::configuration(format!(
        "Unknown store URL '{}'. Supported: memory://",
        config.url
    )))
}
