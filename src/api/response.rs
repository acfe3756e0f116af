use axum::{response::IntoResponse, response::Response, Json};
use serde::Serialize;

/// Plain JSON array body, matching what the UI consumes.
pub fn json_list<T: Serialize>(items: Vec<T>) -> Response {
    Json(items).into_response()
}
