// Application state module
// Immutable state shared by every connection task

use std::sync::Arc;

use super::types::Config;
use crate::logger::Logger;
use crate::routing::RouteTable;

/// Application state
///
/// Built once before the listener starts accepting and never mutated
/// afterwards, so request tasks only ever read it.
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    pub logger: Arc<dyn Logger>,
}

impl AppState {
    /// Create `AppState` with the standard route table
    pub fn new(config: Config, logger: Arc<dyn Logger>) -> Self {
        Self::with_routes(config, RouteTable::standard(), logger)
    }

    /// Create `AppState` with a caller-supplied route table
    pub fn with_routes(config: Config, routes: RouteTable, logger: Arc<dyn Logger>) -> Self {
        Self {
            config,
            routes,
            logger,
        }
    }
}
