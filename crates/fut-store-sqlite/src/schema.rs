//! SQL schema for the FUT SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS fut_requests (
    id                      TEXT PRIMARY KEY,
    request_number          TEXT,
    -- Unicode-lowercased copy of request_number; written by the store.
    request_number_folded   TEXT,
    student_enrollment_id   TEXT NOT NULL,
    request_type            TEXT NOT NULL DEFAULT 'OTROS',
    request_subject         TEXT NOT NULL,
    -- Unicode-lowercased copy of request_subject; written by the store.
    request_subject_folded  TEXT NOT NULL,
    request_description     TEXT,
    requested_by            TEXT,
    contact_phone           TEXT,
    contact_email           TEXT,
    guardian_dni            TEXT,
    guardian_address        TEXT,
    guardian_district       TEXT,
    guardian_province       TEXT,
    urgency_level           TEXT NOT NULL DEFAULT 'MEDIA',
    estimated_delivery_date TEXT,            -- ISO 8601 date or NULL
    attached_documents      TEXT NOT NULL DEFAULT '{}',
    admin_notes             TEXT,
    status                  TEXT NOT NULL DEFAULT 'PENDIENTE',
    created_at              TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at              TEXT NOT NULL    -- RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS fut_requests_enrollment_idx ON fut_requests(student_enrollment_id);
CREATE INDEX IF NOT EXISTS fut_requests_created_idx    ON fut_requests(created_at);
CREATE INDEX IF NOT EXISTS fut_requests_number_idx     ON fut_requests(request_number);

PRAGMA user_version = 1;
";
