//! Request handlers for the read API.
//!
//! Query parameters deserialize through `serde_urlencoded` into small typed
//! structs; handlers validate input fully before touching the store, take
//! the store guard only inside their own scope, and map every outcome onto
//! the endpoint's status contract. Error bodies are `{error, details}`
//! envelopes, never stack traces.

use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::{Deserialize, Serialize};

use derrick_core::{wells_within, ErrorEnvelope, Polygon};
use derrick_store::{StoreError, WellStore};

/// Response body type shared across the server.
pub type ResponseBody = Full<Bytes>;

/// The HTTP response produced by handlers.
pub type HttpResponse = Response<ResponseBody>;

#[derive(Debug, Deserialize)]
struct WellParams {
    #[serde(rename = "api-number", default)]
    api_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PolygonParams {
    #[serde(default)]
    coordinates: Option<String>,
}

/// `GET /well?api-number=<id>`
///
/// 200 with the record as a flat JSON object; 400 when the parameter is
/// missing; 404 when no record matches; 500 when the store fails.
pub fn get_well(store: &WellStore, query: &str) -> HttpResponse {
    let params: WellParams = match serde_urlencoded::from_str(query) {
        Ok(params) => params,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &ErrorEnvelope::new(format!("invalid query string: {e}")),
            )
        }
    };

    let Some(api_number) = params.api_number else {
        return error_response(
            StatusCode::BAD_REQUEST,
            &ErrorEnvelope::new("API number is required as a query parameter"),
        );
    };

    match store.find_by_api_number(&api_number) {
        Ok(Some(stored)) => json_response(StatusCode::OK, &stored.well),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            &ErrorEnvelope::new(format!("No well found with API number {api_number}")),
        ),
        Err(e) => store_failure(&e),
    }
}

/// `GET /wells/in-polygon?coordinates=<lat,lon,lat,lon,…>`
///
/// 200 with the matching identifiers in record order; 400 when the
/// parameter is missing, the numbers do not parse, or the ring is invalid;
/// 500 when the store fails.
///
/// Coordinate pairs are read `(latitude, longitude)`; see
/// `derrick_core::geometry` for the convention.
pub fn wells_in_polygon(store: &WellStore, query: &str) -> HttpResponse {
    let params: PolygonParams = match serde_urlencoded::from_str(query) {
        Ok(params) => params,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &ErrorEnvelope::new(format!("invalid query string: {e}")),
            )
        }
    };

    let Some(coordinates) = params.coordinates else {
        return error_response(
            StatusCode::BAD_REQUEST,
            &ErrorEnvelope::new("coordinates parameter is required"),
        );
    };

    let values: Result<Vec<f64>, _> = coordinates
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect();
    let Ok(values) = values else {
        return error_response(
            StatusCode::BAD_REQUEST,
            &ErrorEnvelope::new(
                "Invalid coordinates format. Expected comma-separated numbers",
            ),
        );
    };

    let polygon = match Polygon::from_flat(&values) {
        Ok(polygon) => polygon,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &ErrorEnvelope::new(format!("Invalid polygon: {e}")),
            )
        }
    };

    match store.all() {
        Ok(stored) => {
            let wells: Vec<_> = stored.into_iter().map(|s| s.well).collect();
            let matching = wells_within(&polygon, &wells);
            json_response(StatusCode::OK, &matching)
        }
        Err(e) => store_failure(&e),
    }
}

/// `GET /health`
pub fn health() -> HttpResponse {
    json_response(
        StatusCode::OK,
        &serde_json::json!({
            "status": "healthy",
            "service": "derrick",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// 404 for unknown paths.
pub fn not_found(path: &str) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        &ErrorEnvelope::new(format!("no route for {path}")),
    )
}

/// 405 for known paths with the wrong method.
pub fn method_not_allowed() -> HttpResponse {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorEnvelope::new("only GET is supported"),
    )
}

/// 504 when request handling exceeds the configured timeout.
pub fn timeout_response() -> HttpResponse {
    error_response(
        StatusCode::GATEWAY_TIMEOUT,
        &ErrorEnvelope::new("request handling timed out"),
    )
}

fn store_failure(error: &StoreError) -> HttpResponse {
    tracing::error!(%error, "store failure on read path");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorEnvelope::with_details("An error occurred", error.to_string()),
    )
}

fn error_response(status: StatusCode, envelope: &ErrorEnvelope) -> HttpResponse {
    json_response(status, envelope)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(bytes)))
            .unwrap_or_else(|_| Response::new(Full::new(Bytes::new()))),
        Err(e) => {
            tracing::error!(%e, "response serialization failed");
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from_static(
                    br#"{"error":"An error occurred","details":"response serialization failed"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
        }
    }
}
