//! Router construction for the properties API

use super::handlers::{
    AppState, create_property, delete_property, get_property, list_properties, root,
    search_properties, update_property,
};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the API routes
///
/// - GET    /                  - liveness
/// - GET    /properties        - paginated, filtered listing
/// - POST   /properties        - create
/// - GET    /search            - paginated search (supports `id`)
/// - GET    /properties/{id}   - fetch one
/// - PUT    /properties/{id}   - partial update
/// - DELETE /properties/{id}   - delete
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/properties", get(list_properties).post(create_property))
        .route("/search", get(search_properties))
        .route(
            "/properties/{id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
        .with_state(state)
}

/// Build the routes with request tracing and CORS for the given origins
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    build_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors_origins)),
    )
}

/// CORS policy allowing credentials from the configured origins
///
/// Methods and headers are mirrored from the preflight request since
/// wildcards cannot be combined with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
