use std::sync::Arc;

use bookings_core::ports::{BookingStore, DraftStore};
use bookings_core::workflow::BookingWorkflow;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Booking workflow over the configured storage and draft adapters.
    pub workflow: Arc<BookingWorkflow>,
    /// Storage port, for room listings and health checks.
    pub store: Arc<dyn BookingStore>,
    /// Server configuration (session cookie settings are read from here).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the workflow to the given store and draft adapters.
    pub fn new(
        store: Arc<dyn BookingStore>,
        drafts: Arc<dyn DraftStore>,
        config: ServerConfig,
    ) -> Self {
        let workflow = BookingWorkflow::new(Arc::clone(&store), drafts);
        Self {
            workflow: Arc::new(workflow),
            store,
            config: Arc::new(config),
        }
    }
}
