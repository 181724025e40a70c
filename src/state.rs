use std::sync::Arc;

use crate::routes::tasks::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }
}
