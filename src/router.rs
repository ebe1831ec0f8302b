use axum::{Router, routing::get};

use crate::{AppState, middleware::log_errors, routes};

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(routes::health::ping))
        // 图书
        .route(
            "/books",
            get(routes::book::list_books).post(routes::book::create_book),
        )
        .route(
            "/books/{id}",
            get(routes::book::get_book)
                .put(routes::book::update_book)
                .delete(routes::book::delete_book),
        )
        // 用户
        .route(
            "/users",
            get(routes::user::list_users).post(routes::user::create_user),
        )
        .route(
            "/users/{id}",
            get(routes::user::get_user)
                .put(routes::user::update_user)
                .delete(routes::user::delete_user),
        )
        .route("/dashboard", get(routes::dashboard::get_dashboard))
}

/// Builds the full application, mounted under the configured API base path.
pub fn create_router(state: AppState) -> Router {
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        Router::new().merge(api_routes())
    } else {
        Router::new().nest(base, api_routes())
    };

    let router = router.layer(axum::middleware::from_fn(log_errors));

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
