//! Request extractors whose rejections render as [`ApiError`] JSON bodies
//!
//! axum's own `Json` and `Query` reject with plain-text bodies; these wrappers
//! route the same failures through `ApiError::Rejected` so every client error
//! shares the `{code, message, details}` shape.

use crate::core::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
