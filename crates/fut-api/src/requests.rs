//! Handlers for `/fut-requests` CRUD endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/fut-requests` | Every stored request |
//! | `POST`   | `/fut-requests` | Body: [`FutRequestBody`]; returns 201 + stored request, numbered `FUT-<year>-<seq>` unless the body carries a number |
//! | `GET`    | `/fut-requests/:id` | 404 if not found |
//! | `PUT`    | `/fut-requests/:id` | Body: [`FutRequestBody`]; full overwrite, 404 if not found |
//! | `DELETE` | `/fut-requests/:id` | 204 whether or not the request existed |

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Datelike as _, NaiveDate, Utc};
use fut_core::{
  FutRequest, FutRequestRepository, RequestService,
  request::{AttachedDocument, RequestStatus, RequestType, UrgencyLevel},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, extract::ApiJson};

/// Longest subject the secretary's form accepts.
pub const MAX_SUBJECT_LEN: usize = 150;

/// Accepted length range of `contactPhone`, digits only.
pub const CONTACT_PHONE_DIGITS: std::ops::RangeInclusive<usize> = 9..=12;

/// Longest guardian DNI (national id) accepted.
pub const MAX_GUARDIAN_DNI_LEN: usize = 8;

// ─── Body ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /fut-requests` and `PUT /fut-requests/:id`.
///
/// `id`, `requestNumber` and the timestamps are optional here; this layer
/// fills them in. `requestType` and `urgencyLevel` are required even though
/// the stored record has defaults for them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutRequestBody {
  pub id:                      Option<String>,
  pub request_number:          Option<String>,
  pub student_enrollment_id:   String,
  pub request_type:            Option<RequestType>,
  pub request_subject:         String,
  pub request_description:     Option<String>,
  pub requested_by:            Option<String>,
  pub contact_phone:           Option<String>,
  pub contact_email:           Option<String>,
  pub guardian_dni:            Option<String>,
  pub guardian_address:        Option<String>,
  pub guardian_district:       Option<String>,
  pub guardian_province:       Option<String>,
  pub urgency_level:           Option<UrgencyLevel>,
  pub estimated_delivery_date: Option<NaiveDate>,
  #[serde(default)]
  pub attached_documents:      BTreeMap<String, AttachedDocument>,
  pub admin_notes:             Option<String>,
  #[serde(default)]
  pub status:                  RequestStatus,
  pub created_at:              Option<DateTime<Utc>>,
}

impl FutRequestBody {
  /// Field rules of the secretary's intake form.
  fn validate(&self) -> Result<(), ApiError> {
    require_text("studentEnrollmentId", Some(self.student_enrollment_id.as_str()))?;
    if self.request_type.is_none() {
      return Err(bad_request("requestType is required"));
    }
    if self.urgency_level.is_none() {
      return Err(bad_request("urgencyLevel is required"));
    }
    require_text("requestSubject", Some(self.request_subject.as_str()))?;
    if self.request_subject.chars().count() > MAX_SUBJECT_LEN {
      return Err(bad_request(format!(
        "requestSubject exceeds {MAX_SUBJECT_LEN} characters"
      )));
    }
    require_text("requestDescription", self.request_description.as_deref())?;
    require_text("requestedBy", self.requested_by.as_deref())?;

    let phone = require_text("contactPhone", self.contact_phone.as_deref())?;
    if !CONTACT_PHONE_DIGITS.contains(&phone.len())
      || !phone.bytes().all(|b| b.is_ascii_digit())
    {
      return Err(bad_request(format!(
        "contactPhone must be {} to {} digits",
        CONTACT_PHONE_DIGITS.start(),
        CONTACT_PHONE_DIGITS.end()
      )));
    }

    if let Some(dni) = &self.guardian_dni
      && dni.chars().count() > MAX_GUARDIAN_DNI_LEN
    {
      return Err(bad_request(format!(
        "guardianDni exceeds {MAX_GUARDIAN_DNI_LEN} characters"
      )));
    }

    if let Some(email) = self.contact_email.as_deref()
      && !email.trim().is_empty()
      && !looks_like_email(email)
    {
      return Err(bad_request("contactEmail is not a valid address"));
    }
    Ok(())
  }

  fn into_request(
    self,
    id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> FutRequest {
    FutRequest {
      id,
      request_number: self.request_number,
      student_enrollment_id: self.student_enrollment_id,
      request_type: self.request_type.unwrap_or_default(),
      request_subject: self.request_subject,
      request_description: self.request_description,
      requested_by: self.requested_by,
      contact_phone: self.contact_phone,
      contact_email: self.contact_email,
      guardian_dni: self.guardian_dni,
      guardian_address: self.guardian_address,
      guardian_district: self.guardian_district,
      guardian_province: self.guardian_province,
      urgency_level: self.urgency_level.unwrap_or_default(),
      estimated_delivery_date: self.estimated_delivery_date,
      attached_documents: self.attached_documents,
      admin_notes: self.admin_notes,
      status: self.status,
      created_at,
      updated_at,
    }
  }
}

fn bad_request(message: impl Into<String>) -> ApiError {
  ApiError::BadRequest(message.into())
}

/// `value`, provided it is present and not just whitespace.
fn require_text<'a>(
  field: &str,
  value: Option<&'a str>,
) -> Result<&'a str, ApiError> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .ok_or_else(|| bad_request(format!("{field} must not be blank")))
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

/// `local@domain`, both parts non-empty, no whitespace.
fn looks_like_email(s: &str) -> bool {
  let s = s.trim();
  if s.contains(char::is_whitespace) {
    return false;
  }
  s.split_once('@').is_some_and(|(local, domain)| {
    !local.is_empty() && !domain.is_empty() && !domain.contains('@')
  })
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /fut-requests`
pub async fn list<R>(
  State(service): State<Arc<RequestService<R>>>,
) -> Result<Json<Vec<FutRequest>>, ApiError>
where
  R: FutRequestRepository,
{
  Ok(Json(service.get_all_requests().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /fut-requests` — returns 201 + the stored [`FutRequest`].
///
/// A blank or missing `id` is replaced with a fresh UUID, and a blank or
/// missing `requestNumber` with the next number of the current year.
pub async fn create<R>(
  State(service): State<Arc<RequestService<R>>>,
  ApiJson(mut body): ApiJson<FutRequestBody>,
) -> Result<impl IntoResponse, ApiError>
where
  R: FutRequestRepository,
{
  body.validate()?;

  let now = Utc::now();
  let id = non_blank(body.id.take())
    .unwrap_or_else(|| Uuid::new_v4().to_string());
  body.request_number = match non_blank(body.request_number.take()) {
    Some(number) => Some(number),
    None => Some(service.next_request_number(now.year()).await?),
  };
  let created_at = body.created_at.unwrap_or(now);

  let saved = service
    .create_request(body.into_request(id, created_at, now))
    .await?;
  Ok((StatusCode::CREATED, Json(saved)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /fut-requests/:id`
pub async fn get_one<R>(
  State(service): State<Arc<RequestService<R>>>,
  Path(id): Path<String>,
) -> Result<Json<FutRequest>, ApiError>
where
  R: FutRequestRepository,
{
  let request = service
    .get_request_by_id(&id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("fut request {id} not found")))?;
  Ok(Json(request))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /fut-requests/:id` — every field is replaced by the body's.
///
/// `createdAt` and `requestNumber` keep their stored values unless the body
/// supplies them; `updatedAt` is always stamped here.
pub async fn update<R>(
  State(service): State<Arc<RequestService<R>>>,
  Path(id): Path<String>,
  ApiJson(mut body): ApiJson<FutRequestBody>,
) -> Result<Json<FutRequest>, ApiError>
where
  R: FutRequestRepository,
{
  body.validate()?;

  let now = Utc::now();
  let number = non_blank(body.request_number.take());
  let (created_at, number) = match (body.created_at, number) {
    (Some(at), Some(number)) => (at, Some(number)),
    (at, number) => {
      let existing = service
        .get_request_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("fut request {id} not found")))?;
      (
        at.unwrap_or(existing.created_at),
        number.or(existing.request_number),
      )
    }
  };
  body.request_number = number;

  let updated = service
    .update_request(&id, body.into_request(id.clone(), created_at, now))
    .await?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /fut-requests/:id`
pub async fn delete<R>(
  State(service): State<Arc<RequestService<R>>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  R: FutRequestRepository,
{
  service.delete_request(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
