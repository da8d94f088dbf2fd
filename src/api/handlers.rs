//! API Handlers
//!
//! HTTP request handlers for the event and category endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, Result};
use crate::models::{
    ApiResponse, Category, CategoryInput, CreateEventInput, EventResponse, HealthResponse,
    ListEventsQuery, PaginatedEvents, SearchEventsQuery, StatsResponse, UpdateEventInput,
};
use crate::services::EventService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
}

impl AppState {
    pub fn new(events: EventService) -> Self {
        Self { events }
    }
}

fn parse_id(raw: &str, what: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| AppError::InvalidRequest(format!("Invalid {} ID", what)))
}

fn non_empty(page: PaginatedEvents, message: &str) -> Result<Json<ApiResponse<PaginatedEvents>>> {
    if page.total < 1 {
        return Err(AppError::NotFound(message.to_string()));
    }
    Ok(Json(ApiResponse::ok("Events retrieved successfully", page)))
}

// == Events ==

/// Handler for GET /api/v1/events
pub async fn list_events_handler(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ApiResponse<PaginatedEvents>>> {
    let page = state
        .events
        .list_events(query.page, query.page_size, query.category_id)
        .await?;
    non_empty(page, "No events found")
}

/// Handler for GET /api/v1/events/recent
pub async fn recent_events_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PaginatedEvents>>> {
    let recent = state.events.get_recent_events().await?;
    Ok(Json(ApiResponse::ok(
        "Recent events retrieved successfully",
        Arc::unwrap_or_clone(recent),
    )))
}

/// Handler for GET /api/v1/events/search?q=
pub async fn search_events_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchEventsQuery>,
) -> Result<Json<ApiResponse<PaginatedEvents>>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::InvalidRequest(
            "Search query is required".to_string(),
        ));
    }

    let page = state
        .events
        .search_events(q, query.page, query.page_size)
        .await?;
    non_empty(page, "No events found matching your search")
}

/// Handler for GET /api/v1/events/:id
pub async fn get_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventResponse>>> {
    let id = parse_id(&id, "event")?;
    let event = state.events.get_event_by_id(id).await?;
    Ok(Json(ApiResponse::ok(
        "Event retrieved successfully",
        Arc::unwrap_or_clone(event),
    )))
}

/// Handler for POST /api/v1/events
pub async fn create_event_handler(
    State(state): State<AppState>,
    Json(input): Json<CreateEventInput>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponse>>)> {
    let event = state.events.create_event(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Event created successfully", event)),
    ))
}

/// Handler for PUT /api/v1/events/:id
pub async fn update_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateEventInput>,
) -> Result<Json<ApiResponse<EventResponse>>> {
    let id = parse_id(&id, "event")?;
    let event = state.events.update_event(id, input).await?;
    Ok(Json(ApiResponse::ok("Event updated successfully", event)))
}

/// Handler for DELETE /api/v1/events/:id
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = parse_id(&id, "event")?;
    state.events.delete_event(id).await?;
    Ok(Json(ApiResponse::message("Event deleted successfully")))
}

// == Categories ==

/// Handler for GET /api/v1/categories
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>> {
    let categories = state.events.list_categories().await?;
    Ok(Json(ApiResponse::ok(
        "Categories retrieved successfully",
        categories,
    )))
}

/// Handler for POST /api/v1/categories
pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>)> {
    if let Some(message) = input.validate() {
        return Err(AppError::InvalidRequest(message));
    }
    let category = state.events.create_category(&input.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Category created successfully", category)),
    ))
}

/// Handler for PUT /api/v1/categories/:id
pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<ApiResponse<Category>>> {
    let id = parse_id(&id, "category")?;
    if let Some(message) = input.validate() {
        return Err(AppError::InvalidRequest(message));
    }
    let category = state.events.update_category(id, &input.name).await?;
    Ok(Json(ApiResponse::ok("Category updated successfully", category)))
}

/// Handler for DELETE /api/v1/categories/:id
pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = parse_id(&id, "category")?;
    state.events.delete_category(id).await?;
    Ok(Json(ApiResponse::message(
        "Category and all its associated events deleted successfully",
    )))
}

// == Operational ==

/// Handler for GET /api/v1/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.events.cache();
    Json(StatsResponse::new(
        &cache.stats(),
        cache.entry_count(),
        cache.swept_total(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
