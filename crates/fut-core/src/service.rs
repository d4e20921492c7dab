//! [`RequestService`] — the operations exposed to the API layer.
//!
//! Every operation is a single round trip to the repository. The only branch
//! is the existence check in [`RequestService::update_request`]; consistency
//! between that check and the following save is left to the store.

use std::sync::Arc;

use crate::{
  error::ServiceError,
  repository::FutRequestRepository,
  request::{
    FutRequest, RequestStatistics, format_request_number,
    request_number_sequence,
  },
};

type Result<T, R> =
  std::result::Result<T, ServiceError<<R as FutRequestRepository>::Error>>;

/// Orchestrates FUT request operations over a [`FutRequestRepository`].
///
/// Holds no mutable state; clones share the same repository.
pub struct RequestService<R> {
  repository: Arc<R>,
}

impl<R> Clone for RequestService<R> {
  fn clone(&self) -> Self {
    Self { repository: Arc::clone(&self.repository) }
  }
}

impl<R: FutRequestRepository> RequestService<R> {
  pub fn new(repository: Arc<R>) -> Self { Self { repository } }

  /// Persist `record` as given and return what the store returned.
  pub async fn create_request(
    &self,
    record: FutRequest,
  ) -> Result<FutRequest, R> {
    tracing::debug!(id = %record.id, "saving new fut request");
    let saved = self
      .repository
      .save(record)
      .await
      .map_err(ServiceError::Store)?;
    tracing::info!(id = %saved.id, "fut request created");
    Ok(saved)
  }

  /// Overwrite every field of the record stored under `id` with `record`'s.
  ///
  /// Fails with [`ServiceError::NotFound`] when nothing is stored under `id`;
  /// in that case the repository is never asked to save.
  pub async fn update_request(
    &self,
    id: &str,
    record: FutRequest,
  ) -> Result<FutRequest, R> {
    let existing = self
      .repository
      .find_by_id(id)
      .await
      .map_err(ServiceError::Store)?;

    if existing.is_none() {
      tracing::warn!(%id, "update rejected: fut request does not exist");
      return Err(ServiceError::NotFound(id.to_owned()));
    }

    let updated = FutRequest { id: id.to_owned(), ..record };
    let saved = self
      .repository
      .save(updated)
      .await
      .map_err(ServiceError::Store)?;
    tracing::info!(%id, "fut request updated");
    Ok(saved)
  }

  /// Delete the record under `id`. Succeeds whether or not it existed.
  pub async fn delete_request(&self, id: &str) -> Result<(), R> {
    self
      .repository
      .delete_by_id(id)
      .await
      .map_err(ServiceError::Store)?;
    tracing::info!(%id, "fut request deleted");
    Ok(())
  }

  /// `Ok(None)` when no record exists; that is not an error.
  pub async fn get_request_by_id(
    &self,
    id: &str,
  ) -> Result<Option<FutRequest>, R> {
    tracing::debug!(%id, "fetching fut request");
    self.repository.find_by_id(id).await.map_err(ServiceError::Store)
  }

  pub async fn get_all_requests(&self) -> Result<Vec<FutRequest>, R> {
    tracing::debug!("listing all fut requests");
    self.repository.find_all().await.map_err(ServiceError::Store)
  }

  /// Case-insensitive substring match on `request_subject`.
  pub async fn search_by_request_subject(
    &self,
    fragment: &str,
  ) -> Result<Vec<FutRequest>, R> {
    tracing::debug!(%fragment, "searching fut requests by subject");
    self
      .repository
      .find_by_request_subject_containing_ignore_case(fragment)
      .await
      .map_err(ServiceError::Store)
  }

  /// Exact match on `student_enrollment_id`.
  pub async fn search_by_student_enrollment_id(
    &self,
    enrollment_id: &str,
  ) -> Result<Vec<FutRequest>, R> {
    tracing::debug!(%enrollment_id, "searching fut requests by enrollment");
    self
      .repository
      .find_by_student_enrollment_id(enrollment_id)
      .await
      .map_err(ServiceError::Store)
  }

  /// Case-insensitive substring match on `request_number`.
  pub async fn search_by_request_number(
    &self,
    fragment: &str,
  ) -> Result<Vec<FutRequest>, R> {
    tracing::debug!(%fragment, "searching fut requests by number");
    self
      .repository
      .find_by_request_number_containing_ignore_case(fragment)
      .await
      .map_err(ServiceError::Store)
  }

  /// The request number following the highest one already issued in `year`.
  ///
  /// Numbers from other years, or in a foreign format, are ignored. Two
  /// callers racing here can be handed the same number.
  pub async fn next_request_number(&self, year: i32) -> Result<String, R> {
    let last = self
      .get_all_requests()
      .await?
      .iter()
      .filter_map(|r| r.request_number.as_deref())
      .filter_map(|n| request_number_sequence(n, year))
      .max()
      .unwrap_or(0);
    Ok(format_request_number(year, last.saturating_add(1)))
  }

  /// Status counts over every stored record.
  pub async fn statistics(&self) -> Result<RequestStatistics, R> {
    let all = self.get_all_requests().await?;
    Ok(RequestStatistics::tally(&all))
  }
}
