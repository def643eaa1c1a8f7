use axum::extract::FromRequest;

use crate::error::Error;

/// `axum::Json` with body rejections reported through [`Error`], so malformed
/// payloads get the same JSON error shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);
