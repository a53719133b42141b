use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/scout", get(handlers::index))
        .route("/scout/click/:control", post(handlers::click_control))
        .route("/scout/submit", post(handlers::submit))
        .route("/api/form", get(handlers::get_form))
        .route("/api/click", post(handlers::click))
        .route("/api/reports", get(handlers::get_reports))
        .with_state(state)
}
