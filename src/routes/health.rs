use axum::{ Json, extract::State, http::StatusCode };
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthData {
    status: u16,
    store: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthData> {
    let health_data = HealthData {
        status: StatusCode::OK.as_u16(),
        store: state.tasks.backend(),
    };
    Json(health_data)
}
