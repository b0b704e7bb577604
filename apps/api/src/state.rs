use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::matching::EvaluationEngine;
use crate::store::Repository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed when `DATABASE_URL` is set, in-memory otherwise.
    pub repo: Arc<dyn Repository>,
    pub engine: EvaluationEngine,
    pub config: Config,
    /// Cancelled on shutdown; batch runs listen on child tokens.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, engine: EvaluationEngine, config: Config) -> Self {
        Self {
            repo,
            engine,
            config,
            shutdown: CancellationToken::new(),
        }
    }
}
