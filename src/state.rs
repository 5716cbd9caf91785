use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    storage::{ReportStore, UploadStore},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub reports: ReportStore,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = orm_from_pool(&pool);
        let reports = ReportStore::new(config.reports_dir.clone());
        let uploads = UploadStore::new(config.uploads_dir.clone());
        Self {
            pool,
            orm,
            config: Arc::new(config),
            reports,
            uploads,
        }
    }
}
