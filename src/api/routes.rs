//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, create_category_handler, create_event_handler, delete_category_handler,
    delete_event_handler, get_event_handler, health_handler, list_categories_handler,
    list_events_handler, recent_events_handler, search_events_handler, update_category_handler,
    update_event_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET|POST /api/v1/events` - List or create events
/// - `GET /api/v1/events/recent` - Cached recent events view
/// - `GET /api/v1/events/search?q=` - Search by name
/// - `GET|PUT|DELETE /api/v1/events/:id` - Single event
/// - `GET|POST /api/v1/categories`, `PUT|DELETE /api/v1/categories/:id`
/// - `GET /api/v1/cache/stats` - Cache counters
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/events", get(list_events_handler).post(create_event_handler))
        .route("/events/recent", get(recent_events_handler))
        .route("/events/search", get(search_events_handler))
        .route(
            "/events/:id",
            get(get_event_handler)
                .put(update_event_handler)
                .delete(delete_event_handler),
        )
        .route(
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .route(
            "/categories/:id",
            put(update_category_handler).delete(delete_category_handler),
        )
        .route("/cache/stats", get(cache_stats_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::cache::{CacheCoordinator, CacheSettings};
    use crate::repository::MemoryEventRepository;
    use crate::services::EventService;

    fn create_test_app() -> Router {
        let repo = Arc::new(MemoryEventRepository::new());
        let cache = CacheCoordinator::new(repo.clone(), CacheSettings::default());
        create_router(AppState::new(EventService::new(repo, cache)))
    }

    async fn status_of(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of("/api/v1/cache/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_recent_route_is_not_captured_by_id() {
        assert_eq!(status_of("/api/v1/events/recent").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_unknown_event() {
        assert_eq!(status_of("/api/v1/events/42").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/api/v1/events/x").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_category_endpoint() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/categories")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Music"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
