//! Core types and trait definitions for the FUT request service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`repository::FutRequestRepository`]; the
//! [`service::RequestService`] is the only thing higher layers talk to.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod repository;
pub mod request;
pub mod service;

pub use error::ServiceError;
pub use repository::FutRequestRepository;
pub use request::FutRequest;
pub use service::RequestService;
