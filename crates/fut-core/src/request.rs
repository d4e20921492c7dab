//! The FUT request record — the only entity the service manages.
//!
//! A FUT ("Formulario Único de Trámite") is an administrative request filed on
//! behalf of a student: a certificate, a transfer, a record correction, and so
//! on. Records are plain data; no field is stamped or validated here.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Classification ──────────────────────────────────────────────────────────

/// What kind of paperwork is being requested.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestType {
  Certificado,
  Constancia,
  Traslado,
  Rectificacion,
  #[default]
  Otros,
}

/// How quickly the secretary's office should act on the request.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyLevel {
  Alta,
  #[default]
  Media,
  Baja,
}

/// Processing state of a request.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
  #[default]
  Pendiente,
  Aprobado,
  Rechazado,
  Completado,
}

// ─── Attachments ─────────────────────────────────────────────────────────────

/// Metadata for a file attached to a request. The file body lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedDocument {
  pub name:       String,
  pub media_type: Option<String>,
  /// Size in bytes.
  pub size:       u64,
}

// ─── FutRequest ──────────────────────────────────────────────────────────────

/// A single FUT request.
///
/// `id` is opaque and unique once assigned. `created_at` and `updated_at` are
/// set by whichever layer builds the record; the service passes them through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutRequest {
  pub id:                      String,
  pub request_number:          Option<String>,
  pub student_enrollment_id:   String,
  #[serde(default)]
  pub request_type:            RequestType,
  pub request_subject:         String,
  pub request_description:     Option<String>,
  pub requested_by:            Option<String>,
  pub contact_phone:           Option<String>,
  pub contact_email:           Option<String>,
  pub guardian_dni:            Option<String>,
  pub guardian_address:        Option<String>,
  pub guardian_district:       Option<String>,
  pub guardian_province:       Option<String>,
  #[serde(default)]
  pub urgency_level:           UrgencyLevel,
  pub estimated_delivery_date: Option<NaiveDate>,
  /// File id → attachment metadata.
  #[serde(default)]
  pub attached_documents:      BTreeMap<String, AttachedDocument>,
  pub admin_notes:             Option<String>,
  #[serde(default)]
  pub status:                  RequestStatus,
  pub created_at:              DateTime<Utc>,
  pub updated_at:              DateTime<Utc>,
}

impl FutRequest {
  /// Convenience constructor with every optional field left empty.
  pub fn new(
    id: impl Into<String>,
    request_subject: impl Into<String>,
    student_enrollment_id: impl Into<String>,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id: id.into(),
      request_number: None,
      student_enrollment_id: student_enrollment_id.into(),
      request_type: RequestType::default(),
      request_subject: request_subject.into(),
      request_description: None,
      requested_by: None,
      contact_phone: None,
      contact_email: None,
      guardian_dni: None,
      guardian_address: None,
      guardian_district: None,
      guardian_province: None,
      urgency_level: UrgencyLevel::default(),
      estimated_delivery_date: None,
      attached_documents: BTreeMap::new(),
      admin_notes: None,
      status: RequestStatus::default(),
      created_at: now,
      updated_at: now,
    }
  }
}

// ─── Request numbers ─────────────────────────────────────────────────────────

/// Human-facing request number for the `seq`-th request filed in `year`,
/// e.g. `FUT-2025-000042`.
pub fn format_request_number(year: i32, seq: u32) -> String {
  format!("FUT-{year}-{seq:06}")
}

/// The sequence part of `number` if it was issued for `year`.
pub fn request_number_sequence(number: &str, year: i32) -> Option<u32> {
  number
    .strip_prefix(&format!("FUT-{year}-"))?
    .parse()
    .ok()
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Per-status counts over a set of requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStatistics {
  pub total:     usize,
  pub pending:   usize,
  pub approved:  usize,
  pub completed: usize,
  pub rejected:  usize,
}

impl RequestStatistics {
  pub fn tally<'a>(requests: impl IntoIterator<Item = &'a FutRequest>) -> Self {
    requests.into_iter().fold(Self::default(), |mut acc, r| {
      acc.total += 1;
      match r.status {
        RequestStatus::Pendiente => acc.pending += 1,
        RequestStatus::Aprobado => acc.approved += 1,
        RequestStatus::Completado => acc.completed += 1,
        RequestStatus::Rechazado => acc.rejected += 1,
      }
      acc
    })
  }
}
