//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! (`YYYY-MM-DD`). Enums use the same upper-case names as the JSON API.
//! Attachments are stored as a compact JSON object.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use fut_core::request::{
  AttachedDocument, FutRequest, RequestStatus, RequestType, UrgencyLevel,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Case folding ────────────────────────────────────────────────────────────

/// Case-fold used on both sides of the subject and request-number searches.
pub fn fold_case(s: &str) -> String { s.to_lowercase() }

// ─── RequestType ─────────────────────────────────────────────────────────────

pub fn encode_request_type(t: RequestType) -> &'static str {
  match t {
    RequestType::Certificado => "CERTIFICADO",
    RequestType::Constancia => "CONSTANCIA",
    RequestType::Traslado => "TRASLADO",
    RequestType::Rectificacion => "RECTIFICACION",
    RequestType::Otros => "OTROS",
  }
}

pub fn decode_request_type(s: &str) -> Result<RequestType> {
  match s {
    "CERTIFICADO" => Ok(RequestType::Certificado),
    "CONSTANCIA" => Ok(RequestType::Constancia),
    "TRASLADO" => Ok(RequestType::Traslado),
    "RECTIFICACION" => Ok(RequestType::Rectificacion),
    "OTROS" => Ok(RequestType::Otros),
    other => Err(unknown("request_type", other)),
  }
}

// ─── UrgencyLevel ────────────────────────────────────────────────────────────

pub fn encode_urgency(u: UrgencyLevel) -> &'static str {
  match u {
    UrgencyLevel::Alta => "ALTA",
    UrgencyLevel::Media => "MEDIA",
    UrgencyLevel::Baja => "BAJA",
  }
}

pub fn decode_urgency(s: &str) -> Result<UrgencyLevel> {
  match s {
    "ALTA" => Ok(UrgencyLevel::Alta),
    "MEDIA" => Ok(UrgencyLevel::Media),
    "BAJA" => Ok(UrgencyLevel::Baja),
    other => Err(unknown("urgency_level", other)),
  }
}

// ─── RequestStatus ───────────────────────────────────────────────────────────

pub fn encode_status(s: RequestStatus) -> &'static str {
  match s {
    RequestStatus::Pendiente => "PENDIENTE",
    RequestStatus::Aprobado => "APROBADO",
    RequestStatus::Rechazado => "RECHAZADO",
    RequestStatus::Completado => "COMPLETADO",
  }
}

pub fn decode_status(s: &str) -> Result<RequestStatus> {
  match s {
    "PENDIENTE" => Ok(RequestStatus::Pendiente),
    "APROBADO" => Ok(RequestStatus::Aprobado),
    "RECHAZADO" => Ok(RequestStatus::Rechazado),
    "COMPLETADO" => Ok(RequestStatus::Completado),
    other => Err(unknown("status", other)),
  }
}

fn unknown(column: &'static str, value: &str) -> Error {
  Error::UnknownVariant { column, value: value.to_owned() }
}

// ─── Attachments ─────────────────────────────────────────────────────────────

pub fn encode_attachments(
  docs: &BTreeMap<String, AttachedDocument>,
) -> Result<String> {
  Ok(serde_json::to_string(docs)?)
}

pub fn decode_attachments(
  s: &str,
) -> Result<BTreeMap<String, AttachedDocument>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` so [`RawFutRequest::from_row`] can
/// address columns by position.
pub const COLUMNS: &str = "id, request_number, student_enrollment_id, request_type,
  request_subject, request_description, requested_by, contact_phone,
  contact_email, guardian_dni, guardian_address, guardian_district,
  guardian_province, urgency_level, estimated_delivery_date,
  attached_documents, admin_notes, status, created_at, updated_at";

/// Raw strings read directly from (or about to be written to) a
/// `fut_requests` row.
pub struct RawFutRequest {
  pub id:                      String,
  pub request_number:          Option<String>,
  pub student_enrollment_id:   String,
  pub request_type:            String,
  pub request_subject:         String,
  pub request_description:     Option<String>,
  pub requested_by:            Option<String>,
  pub contact_phone:           Option<String>,
  pub contact_email:           Option<String>,
  pub guardian_dni:            Option<String>,
  pub guardian_address:        Option<String>,
  pub guardian_district:       Option<String>,
  pub guardian_province:       Option<String>,
  pub urgency_level:           String,
  pub estimated_delivery_date: Option<String>,
  pub attached_documents:      String,
  pub admin_notes:             Option<String>,
  pub status:                  String,
  pub created_at:              String,
  pub updated_at:              String,
}

impl RawFutRequest {
  /// Read a row selected with [`COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                      row.get(0)?,
      request_number:          row.get(1)?,
      student_enrollment_id:   row.get(2)?,
      request_type:            row.get(3)?,
      request_subject:         row.get(4)?,
      request_description:     row.get(5)?,
      requested_by:            row.get(6)?,
      contact_phone:           row.get(7)?,
      contact_email:           row.get(8)?,
      guardian_dni:            row.get(9)?,
      guardian_address:        row.get(10)?,
      guardian_district:       row.get(11)?,
      guardian_province:       row.get(12)?,
      urgency_level:           row.get(13)?,
      estimated_delivery_date: row.get(14)?,
      attached_documents:      row.get(15)?,
      admin_notes:             row.get(16)?,
      status:                  row.get(17)?,
      created_at:              row.get(18)?,
      updated_at:              row.get(19)?,
    })
  }

  pub fn from_request(r: &FutRequest) -> Result<Self> {
    Ok(Self {
      id:                      r.id.clone(),
      request_number:          r.request_number.clone(),
      student_enrollment_id:   r.student_enrollment_id.clone(),
      request_type:            encode_request_type(r.request_type).to_owned(),
      request_subject:         r.request_subject.clone(),
      request_description:     r.request_description.clone(),
      requested_by:            r.requested_by.clone(),
      contact_phone:           r.contact_phone.clone(),
      contact_email:           r.contact_email.clone(),
      guardian_dni:            r.guardian_dni.clone(),
      guardian_address:        r.guardian_address.clone(),
      guardian_district:       r.guardian_district.clone(),
      guardian_province:       r.guardian_province.clone(),
      urgency_level:           encode_urgency(r.urgency_level).to_owned(),
      estimated_delivery_date: r.estimated_delivery_date.map(encode_date),
      attached_documents:      encode_attachments(&r.attached_documents)?,
      admin_notes:             r.admin_notes.clone(),
      status:                  encode_status(r.status).to_owned(),
      created_at:              encode_dt(r.created_at),
      updated_at:              encode_dt(r.updated_at),
    })
  }

  pub fn into_request(self) -> Result<FutRequest> {
    Ok(FutRequest {
      id:                      self.id,
      request_number:          self.request_number,
      student_enrollment_id:   self.student_enrollment_id,
      request_type:            decode_request_type(&self.request_type)?,
      request_subject:         self.request_subject,
      request_description:     self.request_description,
      requested_by:            self.requested_by,
      contact_phone:           self.contact_phone,
      contact_email:           self.contact_email,
      guardian_dni:            self.guardian_dni,
      guardian_address:        self.guardian_address,
      guardian_district:       self.guardian_district,
      guardian_province:       self.guardian_province,
      urgency_level:           decode_urgency(&self.urgency_level)?,
      estimated_delivery_date: self
        .estimated_delivery_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      attached_documents:      decode_attachments(&self.attached_documents)?,
      admin_notes:             self.admin_notes,
      status:                  decode_status(&self.status)?,
      created_at:              decode_dt(&self.created_at)?,
      updated_at:              decode_dt(&self.updated_at)?,
    })
  }
}
