//! Error type for [`RequestService`](crate::service::RequestService).

use thiserror::Error;

/// Failure of a service operation.
///
/// Store failures are carried as the repository's own error type, unchanged.
#[derive(Debug, Error)]
pub enum ServiceError<E>
where
  E: std::error::Error + Send + Sync + 'static,
{
  #[error("fut request not found: {0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] E),
}

impl<E> ServiceError<E>
where
  E: std::error::Error + Send + Sync + 'static,
{
  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}
