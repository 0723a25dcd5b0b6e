use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

pub mod attendance;
pub mod department;
pub mod employee;

#[cfg(test)]
pub(crate) mod test_support;

/// Success envelope: `{"data": ...}`.
pub(crate) fn ok_data<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": data }))
}

pub(crate) fn ok_message(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": message }))
}

/// Rejects blank input with `message`. Non-blank input is passed through unchanged.
pub(crate) fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(message));
    }
    Ok(value)
}
