use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/api/entries/:id",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/tags", get(handlers::get_tags))
        .route("/api/moods", get(handlers::list_moods).post(handlers::log_mood))
        .route("/api/moods/today", get(handlers::get_today_mood))
        .route("/api/moods/month", get(handlers::get_mood_month))
        .with_state(state)
}
