//! [`SqliteRepository`] — the SQLite implementation of
//! [`FutRequestRepository`].

use std::path::Path;

use fut_core::{FutRequest, FutRequestRepository};
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{COLUMNS, RawFutRequest, fold_case},
  schema::SCHEMA,
  Result,
};

// ─── Repository ──────────────────────────────────────────────────────────────

/// A FUT request store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteRepository {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRepository {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("fut_requests schema ready");
    Ok(())
  }

  /// Run `SELECT <COLUMNS> FROM fut_requests <tail>` with a single text
  /// parameter (or none) and decode every row.
  async fn select_many(
    &self,
    tail: &'static str,
    param: Option<String>,
  ) -> Result<Vec<FutRequest>> {
    let raws: Vec<RawFutRequest> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {COLUMNS} FROM fut_requests {tail}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p], RawFutRequest::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawFutRequest::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFutRequest::into_request).collect()
  }
}

// ─── FutRequestRepository impl ───────────────────────────────────────────────

impl FutRequestRepository for SqliteRepository {
  type Error = crate::Error;

  async fn save(&self, record: FutRequest) -> Result<FutRequest> {
    let raw    = RawFutRequest::from_request(&record)?;
    let folded_subject = fold_case(&record.request_subject);
    let folded_number  = record.request_number.as_deref().map(fold_case);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO fut_requests (
             id, request_number, request_number_folded,
             student_enrollment_id, request_type, request_subject,
             request_subject_folded, request_description, requested_by,
             contact_phone, contact_email, guardian_dni, guardian_address,
             guardian_district, guardian_province, urgency_level,
             estimated_delivery_date, attached_documents, admin_notes, status,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                     ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)
           ON CONFLICT(id) DO UPDATE SET
             request_number          = excluded.request_number,
             request_number_folded   = excluded.request_number_folded,
             student_enrollment_id   = excluded.student_enrollment_id,
             request_type            = excluded.request_type,
             request_subject         = excluded.request_subject,
             request_subject_folded  = excluded.request_subject_folded,
             request_description     = excluded.request_description,
             requested_by            = excluded.requested_by,
             contact_phone           = excluded.contact_phone,
             contact_email           = excluded.contact_email,
             guardian_dni            = excluded.guardian_dni,
             guardian_address        = excluded.guardian_address,
             guardian_district       = excluded.guardian_district,
             guardian_province       = excluded.guardian_province,
             urgency_level           = excluded.urgency_level,
             estimated_delivery_date = excluded.estimated_delivery_date,
             attached_documents      = excluded.attached_documents,
             admin_notes             = excluded.admin_notes,
             status                  = excluded.status,
             created_at              = excluded.created_at,
             updated_at              = excluded.updated_at",
          rusqlite::params![
            raw.id,
            raw.request_number,
            folded_number,
            raw.student_enrollment_id,
            raw.request_type,
            raw.request_subject,
            folded_subject,
            raw.request_description,
            raw.requested_by,
            raw.contact_phone,
            raw.contact_email,
            raw.guardian_dni,
            raw.guardian_address,
            raw.guardian_district,
            raw.guardian_province,
            raw.urgency_level,
            raw.estimated_delivery_date,
            raw.attached_documents,
            raw.admin_notes,
            raw.status,
            raw.created_at,
            raw.updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn find_by_id(&self, id: &str) -> Result<Option<FutRequest>> {
    let id = id.to_owned();

    let raw: Option<RawFutRequest> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {COLUMNS} FROM fut_requests WHERE id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawFutRequest::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFutRequest::into_request).transpose()
  }

  async fn delete_by_id(&self, id: &str) -> Result<()> {
    let id = id.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM fut_requests WHERE id = ?1",
          rusqlite::params![id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_all(&self) -> Result<Vec<FutRequest>> {
    self.select_many("ORDER BY created_at, id", None).await
  }

  async fn find_by_request_subject_containing_ignore_case(
    &self,
    fragment: &str,
  ) -> Result<Vec<FutRequest>> {
    // instr() rather than LIKE: no wildcard characters to escape, and both
    // sides are folded in Rust so non-ASCII case differences match too.
    self
      .select_many(
        "WHERE instr(request_subject_folded, ?1) > 0 ORDER BY created_at, id",
        Some(fold_case(fragment)),
      )
      .await
  }

  async fn find_by_request_number_containing_ignore_case(
    &self,
    fragment: &str,
  ) -> Result<Vec<FutRequest>> {
    // NULL numbers drop out: instr(NULL, ?) is NULL, never > 0.
    self
      .select_many(
        "WHERE instr(request_number_folded, ?1) > 0 ORDER BY created_at, id",
        Some(fold_case(fragment)),
      )
      .await
  }

  async fn find_by_student_enrollment_id(
    &self,
    enrollment_id: &str,
  ) -> Result<Vec<FutRequest>> {
    self
      .select_many(
        "WHERE student_enrollment_id = ?1 ORDER BY created_at, id",
        Some(enrollment_id.to_owned()),
      )
      .await
  }
}
