pub mod health;
pub mod resumes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/test", get(health::api_test_handler))
        .route(
            "/upload",
            post(resumes::handle_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/render", post(resumes::handle_render))
        .route("/resumes/:id", get(resumes::handle_get_resume))
        .route("/resumes/:id/pdf", get(resumes::handle_get_resume_pdf))
        .with_state(state)
}
