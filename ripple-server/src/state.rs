use std::sync::Arc;

use crate::config::Media;
use crate::db::Database;
use crate::scheduler::PostScheduler;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub scheduler: Arc<dyn PostScheduler>,
    pub media: Media,
}

impl AppState {
    pub fn new(db: Database, scheduler: Arc<dyn PostScheduler>, media: Media) -> Self {
        Self {
            db,
            scheduler,
            media,
        }
    }
}
