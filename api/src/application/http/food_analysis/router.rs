use super::handlers::analyze_food_image::{MAX_REQUEST_SIZE, analyze_food_image};
use crate::application::http::server::app_state::AppState;
use axum::{Router, extract::DefaultBodyLimit, routing::post};

pub fn food_analysis_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/analyze", state.args.server.root_path),
            post(analyze_food_image),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE))
}
