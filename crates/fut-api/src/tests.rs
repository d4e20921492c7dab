//! Router tests against an in-memory SQLite repository.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use chrono::{Datelike as _, Utc};
use fut_core::{
  FutRequest, FutRequestRepository, RequestService, request::RequestStatus,
};
use fut_store_sqlite::SqliteRepository;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

type Service = Arc<RequestService<SqliteRepository>>;

async fn service() -> Service {
  let repo = SqliteRepository::open_in_memory().await.unwrap();
  Arc::new(RequestService::new(Arc::new(repo)))
}

async fn send<R>(
  service: &Arc<RequestService<R>>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> Response
where
  R: FutRequestRepository + 'static,
{
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  api_router(Arc::clone(service)).oneshot(req).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

/// A body that passes every field rule.
fn valid_body(subject: &str, enrollment: &str) -> Value {
  json!({
    "requestSubject": subject,
    "studentEnrollmentId": enrollment,
    "requestType": "CONSTANCIA",
    "urgencyLevel": "ALTA",
    "requestDescription": "Solicito el cambio al turno tarde.",
    "requestedBy": "María Quispe",
    "contactPhone": "987654321"
  })
}

fn cambio_body() -> Value {
  let mut body = valid_body("Cambio de turno", "ST123");
  body["id"] = json!("A1");
  body
}

/// POST `body` and return the status plus the `error` message, if any.
async fn rejection(svc: &Service, body: Value) -> (StatusCode, Value) {
  let resp = send(svc, "POST", "/fut-requests", Some(body)).await;
  let status = resp.status();
  (status, json_body(resp).await["error"].clone())
}

// ── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_201_and_stamps_timestamps() {
  let svc = service().await;

  let resp = send(&svc, "POST", "/fut-requests", Some(cambio_body())).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let created: FutRequest = serde_json::from_value(json_body(resp).await).unwrap();
  assert_eq!(created.id, "A1");
  assert_eq!(created.status, RequestStatus::Pendiente);
  assert_eq!(created.created_at, created.updated_at);

  let resp = send(&svc, "GET", "/fut-requests/A1", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let fetched: FutRequest = serde_json::from_value(json_body(resp).await).unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_without_id_assigns_uuid() {
  let svc = service().await;

  let resp = send(&svc, "POST", "/fut-requests", Some(valid_body("Traslado", "ST9"))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let body = json_body(resp).await;
  let id = body["id"].as_str().unwrap();
  assert!(uuid::Uuid::parse_str(id).is_ok(), "id: {id}");
}

#[tokio::test]
async fn create_numbers_requests_per_year() {
  let svc = service().await;
  let year = Utc::now().year();

  let first = json_body(
    send(&svc, "POST", "/fut-requests", Some(valid_body("Traslado", "ST9"))).await,
  )
  .await;
  let second = json_body(
    send(&svc, "POST", "/fut-requests", Some(valid_body("Constancia", "ST9"))).await,
  )
  .await;

  assert_eq!(first["requestNumber"], format!("FUT-{year}-000001"));
  assert_eq!(second["requestNumber"], format!("FUT-{year}-000002"));
}

#[tokio::test]
async fn create_keeps_supplied_request_number() {
  let svc = service().await;
  let mut body = cambio_body();
  body["requestNumber"] = json!("FUT-2019-000450");

  let created = json_body(send(&svc, "POST", "/fut-requests", Some(body)).await).await;
  assert_eq!(created["requestNumber"], "FUT-2019-000450");
}

#[tokio::test]
async fn get_missing_is_404() {
  let svc = service().await;
  let resp = send(&svc, "GET", "/fut-requests/nope", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn id_named_statistics_is_an_ordinary_request() {
  let svc = service().await;
  let mut body = cambio_body();
  body["id"] = json!("statistics");

  let resp = send(&svc, "POST", "/fut-requests", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let fetched = json_body(send(&svc, "GET", "/fut-requests/statistics", None).await).await;
  assert_eq!(fetched["id"], "statistics");
  assert_eq!(fetched["requestSubject"], "Cambio de turno");

  let resp = send(&svc, "DELETE", "/fut-requests/statistics", None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let all = json_body(send(&svc, "GET", "/fut-requests", None).await).await;
  assert_eq!(all, json!([]));
}

// ── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_with_blank_subject_is_400() {
  let svc = service().await;
  let (status, error) = rejection(&svc, valid_body("   ", "ST9")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(error.is_string());
}

#[tokio::test]
async fn create_with_blank_enrollment_is_400() {
  let svc = service().await;
  let (status, error) = rejection(&svc, valid_body("Traslado", " ")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error, "studentEnrollmentId must not be blank");
}

#[tokio::test]
async fn subject_limit_is_150_characters() {
  let svc = service().await;

  // Multi-byte characters: the limit counts characters, not bytes.
  let at_limit = "ñ".repeat(150);
  let resp = send(&svc, "POST", "/fut-requests", Some(valid_body(&at_limit, "ST9"))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let over = "ñ".repeat(151);
  let (status, error) = rejection(&svc, valid_body(&over, "ST9")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error, "requestSubject exceeds 150 characters");
}

#[tokio::test]
async fn required_form_fields_are_enforced() {
  let svc = service().await;

  for field in [
    "requestType",
    "urgencyLevel",
    "requestDescription",
    "requestedBy",
    "contactPhone",
  ] {
    let mut body = valid_body("Traslado", "ST9");
    body.as_object_mut().unwrap().remove(field);
    let (status, error) = rejection(&svc, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
    assert!(error.as_str().unwrap().contains(field), "{field}: {error}");
  }

  let mut blank = valid_body("Traslado", "ST9");
  blank["requestedBy"] = json!("  ");
  let (status, _) = rejection(&svc, blank).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let all = json_body(send(&svc, "GET", "/fut-requests", None).await).await;
  assert_eq!(all, json!([]));
}

#[tokio::test]
async fn contact_phone_must_be_9_to_12_digits() {
  let svc = service().await;

  for bad in ["12345678", "1234567890123", "98765432a", "+51987654321"] {
    let mut body = valid_body("Traslado", "ST9");
    body["contactPhone"] = json!(bad);
    let (status, _) = rejection(&svc, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
  }

  for good in ["987654321", "519876543210"] {
    let mut body = valid_body("Traslado", "ST9");
    body["contactPhone"] = json!(good);
    let resp = send(&svc, "POST", "/fut-requests", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "{good}");
  }
}

#[tokio::test]
async fn guardian_dni_is_at_most_8_characters() {
  let svc = service().await;

  let mut body = valid_body("Traslado", "ST9");
  body["guardianDni"] = json!("12345678");
  let resp = send(&svc, "POST", "/fut-requests", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let mut body = valid_body("Traslado", "ST9");
  body["guardianDni"] = json!("123456789");
  let (status, error) = rejection(&svc, body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error, "guardianDni exceeds 8 characters");
}

#[tokio::test]
async fn contact_email_must_look_like_an_address() {
  let svc = service().await;

  let mut body = valid_body("Traslado", "ST9");
  body["contactEmail"] = json!("apoderado.example.com");
  let (status, _) = rejection(&svc, body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let mut body = valid_body("Traslado", "ST9");
  body["contactEmail"] = json!("apoderado@example.com");
  let resp = send(&svc, "POST", "/fut-requests", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_json_is_400_with_error_envelope() {
  let svc = service().await;
  let req = Request::builder()
    .method("POST")
    .uri("/fut-requests")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{\"requestSubject\": "))
    .unwrap();

  let resp = api_router(Arc::clone(&svc)).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(json_body(resp).await["error"].is_string());
}

// ── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_and_keeps_created_at_and_number() {
  let svc = service().await;
  let mut body = cambio_body();
  body["adminNotes"] = json!("revisar horario");
  let created = json_body(send(&svc, "POST", "/fut-requests", Some(body)).await).await;

  let mut replacement = valid_body("Cambio de turno a tarde", "ST123");
  replacement["status"] = json!("APROBADO");
  let resp = send(&svc, "PUT", "/fut-requests/A1", Some(replacement)).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let updated = json_body(resp).await;
  assert_eq!(updated["id"], "A1");
  assert_eq!(updated["requestSubject"], "Cambio de turno a tarde");
  assert_eq!(updated["status"], "APROBADO");
  // Full overwrite: fields absent from the body are cleared.
  assert_eq!(updated["adminNotes"], Value::Null);
  assert_eq!(updated["createdAt"], created["createdAt"]);
  assert_eq!(updated["requestNumber"], created["requestNumber"]);
}

#[tokio::test]
async fn update_missing_is_404_and_creates_nothing() {
  let svc = service().await;

  let resp = send(&svc, "PUT", "/fut-requests/A1", Some(cambio_body())).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let all = json_body(send(&svc, "GET", "/fut-requests", None).await).await;
  assert_eq!(all, json!([]));
}

#[tokio::test]
async fn update_is_validated_like_create() {
  let svc = service().await;
  send(&svc, "POST", "/fut-requests", Some(cambio_body())).await;

  let mut body = cambio_body();
  body["contactPhone"] = json!("123");
  let resp = send(&svc, "PUT", "/fut-requests/A1", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Delete / list / search ──────────────────────────────────────────────────

#[tokio::test]
async fn single_record_scenario() {
  let svc = service().await;
  send(&svc, "POST", "/fut-requests", Some(cambio_body())).await;

  let by_subject =
    json_body(send(&svc, "GET", "/fut-requests/search/subject?q=cambio", None).await).await;
  assert_eq!(by_subject.as_array().unwrap().len(), 1);
  assert_eq!(by_subject[0]["id"], "A1");

  let by_student =
    json_body(send(&svc, "GET", "/fut-requests/search/student/ST123", None).await).await;
  assert_eq!(by_student[0]["id"], "A1");

  let all = json_body(send(&svc, "GET", "/fut-requests", None).await).await;
  assert_eq!(all.as_array().unwrap().len(), 1);

  let resp = send(&svc, "DELETE", "/fut-requests/A1", None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let all = json_body(send(&svc, "GET", "/fut-requests", None).await).await;
  assert_eq!(all, json!([]));
}

#[tokio::test]
async fn search_by_number_ignores_case() {
  let svc = service().await;
  let mut body = cambio_body();
  body["requestNumber"] = json!("FUT-2025-000123");
  send(&svc, "POST", "/fut-requests", Some(body)).await;
  send(&svc, "POST", "/fut-requests", Some(valid_body("Traslado", "ST9"))).await;

  let found =
    json_body(send(&svc, "GET", "/fut-requests/search/number?q=fut-2025-0001", None).await)
      .await;
  assert_eq!(found.as_array().unwrap().len(), 1);
  assert_eq!(found[0]["id"], "A1");
}

#[tokio::test]
async fn search_without_q_is_400_with_error_envelope() {
  let svc = service().await;

  for uri in ["/fut-requests/search/subject", "/fut-requests/search/number"] {
    let resp = send(&svc, "GET", uri, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    assert!(json_body(resp).await["error"].is_string(), "{uri}");
  }
}

#[tokio::test]
async fn delete_unknown_is_204() {
  let svc = service().await;
  let resp = send(&svc, "DELETE", "/fut-requests/ghost", None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn statistics_counts_statuses() {
  let svc = service().await;
  send(&svc, "POST", "/fut-requests", Some(cambio_body())).await;
  let mut completed = valid_body("Certificado", "ST5");
  completed["status"] = json!("COMPLETADO");
  send(&svc, "POST", "/fut-requests", Some(completed)).await;

  let stats = json_body(send(&svc, "GET", "/statistics", None).await).await;
  assert_eq!(
    stats,
    json!({ "total": 2, "pending": 1, "approved": 0, "completed": 1, "rejected": 0 })
  );
}

// ── Store failures ──────────────────────────────────────────────────────────

/// A repository whose backing store is gone.
struct OfflineRepository;

fn offline() -> std::io::Error { std::io::Error::other("store offline") }

impl FutRequestRepository for OfflineRepository {
  type Error = std::io::Error;

  async fn save(&self, _: FutRequest) -> Result<FutRequest, Self::Error> { Err(offline()) }
  async fn find_by_id(&self, _: &str) -> Result<Option<FutRequest>, Self::Error> { Err(offline()) }
  async fn delete_by_id(&self, _: &str) -> Result<(), Self::Error> { Err(offline()) }
  async fn find_all(&self) -> Result<Vec<FutRequest>, Self::Error> { Err(offline()) }
  async fn find_by_request_subject_containing_ignore_case(&self, _: &str) -> Result<Vec<FutRequest>, Self::Error> { Err(offline()) }
  async fn find_by_request_number_containing_ignore_case(&self, _: &str) -> Result<Vec<FutRequest>, Self::Error> { Err(offline()) }
  async fn find_by_student_enrollment_id(&self, _: &str) -> Result<Vec<FutRequest>, Self::Error> { Err(offline()) }
}

#[tokio::test]
async fn store_errors_are_500_with_error_envelope() {
  let svc = Arc::new(RequestService::new(Arc::new(OfflineRepository)));

  let requests = [
    ("GET", "/fut-requests", None),
    ("POST", "/fut-requests", Some(cambio_body())),
    ("GET", "/fut-requests/A1", None),
    ("PUT", "/fut-requests/A1", Some(cambio_body())),
    ("DELETE", "/fut-requests/A1", None),
    ("GET", "/fut-requests/search/subject?q=cambio", None),
    ("GET", "/fut-requests/search/number?q=fut", None),
    ("GET", "/fut-requests/search/student/ST123", None),
    ("GET", "/statistics", None),
  ];
  for (method, uri, body) in requests {
    let resp = send(&svc, method, uri, body).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
    assert_eq!(json_body(resp).await, json!({ "error": "store offline" }), "{method} {uri}");
  }
}
