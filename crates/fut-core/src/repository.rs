//! The `FutRequestRepository` trait — the persistence port.
//!
//! Implemented by storage backends (e.g. `fut-store-sqlite`). The service
//! depends on this abstraction, never on a concrete backend.

use std::future::Future;

use crate::request::FutRequest;

/// Abstraction over a store of [`FutRequest`] records.
///
/// Multi-record reads return owned vectors; result sets are finite and small.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FutRequestRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `record`, or overwrite the stored record with the same `id`.
  /// Returns the stored representation.
  fn save(
    &self,
    record: FutRequest,
  ) -> impl Future<Output = Result<FutRequest, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn find_by_id<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<FutRequest>, Self::Error>> + Send + 'a;

  /// Remove the record with `id` if present. Does not report whether a record
  /// existed.
  fn delete_by_id<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every stored record. Ordering is backend-defined.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<FutRequest>, Self::Error>> + Send + '_;

  /// Records whose `request_subject` contains `fragment`, ignoring case.
  fn find_by_request_subject_containing_ignore_case<'a>(
    &'a self,
    fragment: &'a str,
  ) -> impl Future<Output = Result<Vec<FutRequest>, Self::Error>> + Send + 'a;

  /// Records whose `request_number` contains `fragment`, ignoring case.
  /// Records without a number never match.
  fn find_by_request_number_containing_ignore_case<'a>(
    &'a self,
    fragment: &'a str,
  ) -> impl Future<Output = Result<Vec<FutRequest>, Self::Error>> + Send + 'a;

  /// Records whose `student_enrollment_id` equals `enrollment_id` exactly.
  fn find_by_student_enrollment_id<'a>(
    &'a self,
    enrollment_id: &'a str,
  ) -> impl Future<Output = Result<Vec<FutRequest>, Self::Error>> + Send + 'a;
}
