use crate::types::{ApiError, ApiResult};
use rocket::get;
use rocket::serde::json::{Json, Value};
use serde::Serialize;
use tracing::error;

static ENDPOINTS_JSON: &str = include_str!("../endpoints.json");

lazy_static! {
    static ref ENDPOINTS: Option<Value> = match serde_json::from_str(ENDPOINTS_JSON) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(error = %e, "endpoints.json is not valid JSON");
            None
        }
    };
}

#[derive(Debug, Serialize)]
pub struct EndpointsResponse {
    endpoints: Value,
}

#[get("/")]
pub fn index() -> ApiResult<EndpointsResponse> {
    let endpoints = ENDPOINTS.clone().ok_or(ApiError::Internal)?;
    Ok(Json(EndpointsResponse { endpoints }))
}
