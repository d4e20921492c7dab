//! Handlers for the search and statistics endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/fut-requests/search/subject` | `?q=<fragment>`; case-insensitive substring |
//! | `GET`  | `/fut-requests/search/number` | `?q=<fragment>`; case-insensitive substring of `requestNumber` |
//! | `GET`  | `/fut-requests/search/student/:enrollment_id` | Exact match |
//! | `GET`  | `/statistics` | Counts by status |
//!
//! Statistics live outside `/fut-requests/` so that no request id is shadowed
//! by a fixed route.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use fut_core::{
  FutRequest, FutRequestRepository, RequestService,
  request::RequestStatistics,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::ApiQuery};

/// Query string of the substring searches. A missing `q` is a 400.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
  /// Fragment to look for.
  pub q: String,
}

/// `GET /fut-requests/search/subject?q=<fragment>`
pub async fn by_subject<R>(
  State(service): State<Arc<RequestService<R>>>,
  ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<FutRequest>>, ApiError>
where
  R: FutRequestRepository,
{
  Ok(Json(service.search_by_request_subject(&params.q).await?))
}

/// `GET /fut-requests/search/number?q=<fragment>`
pub async fn by_number<R>(
  State(service): State<Arc<RequestService<R>>>,
  ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<FutRequest>>, ApiError>
where
  R: FutRequestRepository,
{
  Ok(Json(service.search_by_request_number(&params.q).await?))
}

/// `GET /fut-requests/search/student/:enrollment_id`
pub async fn by_student<R>(
  State(service): State<Arc<RequestService<R>>>,
  Path(enrollment_id): Path<String>,
) -> Result<Json<Vec<FutRequest>>, ApiError>
where
  R: FutRequestRepository,
{
  Ok(Json(
    service.search_by_student_enrollment_id(&enrollment_id).await?,
  ))
}

/// `GET /statistics`
pub async fn statistics<R>(
  State(service): State<Arc<RequestService<R>>>,
) -> Result<Json<RequestStatistics>, ApiError>
where
  R: FutRequestRepository,
{
  Ok(Json(service.statistics().await?))
}
