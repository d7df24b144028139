use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analytics::RequestOrigin;
use crate::listing::{ModifiedPage, DEFAULT_PAGE_LIMIT};
use crate::server::AppState;
use crate::service::{DetailResponse, RelatedResponse};
use crate::Error;

#[derive(Deserialize)]
pub struct LookupParams {
    pub id: Option<String>,
    pub lang: Option<String>,
    pub organization: Option<String>,
}

#[derive(Deserialize)]
pub struct ModifiedParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub source_system: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Analytics origin from the `Referer` header and `organization` parameter
fn request_origin(headers: &HeaderMap, organization: Option<String>) -> RequestOrigin {
    RequestOrigin {
        referrer: headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .map(String::from),
        organization,
    }
}

/// Relationship query: `GET /collections?id=XYZ&lang=en`
///
/// Always HTTP 200; parameter and storage errors travel in the body for
/// compatibility with existing consumers.
pub async fn related(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupParams>,
    headers: HeaderMap,
) -> Json<RelatedResponse> {
    let origin = request_origin(&headers, params.organization);
    Json(state.service.related_for(params.id.as_deref(), params.lang.as_deref(), origin))
}

/// Detail query: `GET /id?id=XYZ&lang=en`
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupParams>,
    headers: HeaderMap,
) -> Json<DetailResponse> {
    let origin = request_origin(&headers, params.organization);
    Json(state.service.detail_for(params.id.as_deref(), params.lang.as_deref(), origin))
}

/// Paged modified-date listing: `GET /modified?page=1&limit=100`
///
/// Real error statuses here, unlike the always-200 query endpoints: a
/// snapshot with missing columns is the caller's 400, an unreachable store
/// is a 500.
pub async fn modified(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ModifiedParams>,
) -> Result<Json<ModifiedPage>, (StatusCode, Json<ErrorResponse>)> {
    let page = state
        .service
        .modified(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            params.source_system.as_deref(),
        )
        .map_err(|e| {
            let status = match e {
                Error::SchemaMismatch(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ErrorResponse { error: e.to_string() }))
        })?;

    Ok(Json(page))
}

/// Catalog and cache statistics: `GET /stats`
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let stats = state
        .service
        .stats()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })))?;

    Ok(Json(serde_json::to_value(&stats).map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() }))
    })?))
}
