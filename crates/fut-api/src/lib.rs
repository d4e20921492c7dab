//! JSON REST API for FUT requests.
//!
//! Exposes an axum [`Router`] backed by a [`RequestService`] over any
//! [`FutRequestRepository`]. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", fut_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod extract;
pub mod requests;
pub mod search;

use std::sync::Arc;

use axum::{Router, routing::get};
use fut_core::{FutRequestRepository, RequestService};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R>(service: Arc<RequestService<R>>) -> Router<()>
where
  R: FutRequestRepository + 'static,
{
  Router::new()
    .route(
      "/fut-requests",
      get(requests::list::<R>).post(requests::create::<R>),
    )
    .route(
      "/fut-requests/{id}",
      get(requests::get_one::<R>)
        .put(requests::update::<R>)
        .delete(requests::delete::<R>),
    )
    .route("/fut-requests/search/subject", get(search::by_subject::<R>))
    .route("/fut-requests/search/number", get(search::by_number::<R>))
    .route(
      "/fut-requests/search/student/{enrollment_id}",
      get(search::by_student::<R>),
    )
    .route("/statistics", get(search::statistics::<R>))
    .with_state(service)
}

#[cfg(test)]
mod tests;
