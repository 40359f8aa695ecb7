//! HTTP server for the properties API
//!
//! `ServerBuilder` wires a `PropertyStore` and the configuration into an axum
//! router with request tracing and CORS, and serves it with graceful shutdown.

pub mod builder;
pub mod extract;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use extract::{ApiJson, ApiQuery};
pub use handlers::AppState;
pub use router::{build_router, build_routes};
