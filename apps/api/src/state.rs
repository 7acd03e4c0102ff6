use sqlx::PgPool;

use crate::analysis::pipeline::AnalysisPipeline;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Holds the similarity, suggestion and rewrite clients built at startup.
    pub pipeline: AnalysisPipeline,
}
