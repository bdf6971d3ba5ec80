//! # Services
//!
//! Orchestration over the workflow engine and the request store.
//! [`RequestUpdateService`] is the single writer; [`RequestQueryService`]
//! serves read-only listings straight from the store.

pub mod query_service;
pub mod update_service;

pub use query_service::RequestQueryService;
pub use update_service::RequestUpdateService;
