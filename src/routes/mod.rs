use axum::{
    routing::get,
    Router,
};

mod health;
pub mod tasks;

pub use health::health;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let task_router = Router::new()
        .route("/", get(tasks::routes::list).post(tasks::routes::create))
        .route(
            "/{id}",
            get(tasks::routes::get)
                .put(tasks::routes::update)
                .delete(tasks::routes::delete),
        );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/tasks", task_router)
}

async fn root() -> &'static str {
    "todo-service is running"
}
