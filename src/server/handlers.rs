//! HTTP handlers for the properties endpoints

use crate::core::error::ApiError;
use crate::core::property::{PaginatedPropertyResponse, Property, PropertyPatch};
use crate::core::query::SearchParams;
use crate::core::service::PropertyService;
use super::extract::{ApiJson, ApiQuery};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: PropertyService,
}

impl AppState {
    pub fn new(service: PropertyService) -> Self {
        Self { service }
    }
}

/// GET / - liveness
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Listings API is running" }))
}

/// GET /properties - filtered listing without identifier lookup
pub async fn list_properties(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<PaginatedPropertyResponse>, ApiError> {
    let query = params.query().without_id();
    let page = state
        .service
        .search(&query, params.page, params.page_size)
        .await?;
    Ok(Json(page))
}

/// GET /search - filtered listing; `id` turns it into a single-document lookup
pub async fn search_properties(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<PaginatedPropertyResponse>, ApiError> {
    let page = state
        .service
        .search(&params.query(), params.page, params.page_size)
        .await?;
    Ok(Json(page))
}

/// GET /properties/{id}
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Property>, ApiError> {
    state.service.get(&id).await.map(Json)
}

/// POST /properties
pub async fn create_property(
    State(state): State<AppState>,
    ApiJson(property): ApiJson<Property>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    let created = state.service.create(property).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /properties/{id} - partial update
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<PropertyPatch>,
) -> Result<Json<Property>, ApiError> {
    state.service.update(&id, patch).await.map(Json)
}

/// DELETE /properties/{id}
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.service.delete(&id).await?;
    Ok(Json(json!({ "message": "Property deleted" })))
}
