#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Testflow Core
//!
//! Workflow engine for medical test requests.
//!
//! ## Overview
//!
//! A test request moves along a fixed chain of states, from intake through
//! lab testing to a doctor's consultation:
//!
//! ```text
//! CREATED -> INITIATED -> LAB_TEST_IN_PROGRESS -> LAB_TEST_COMPLETED
//!         -> DIAGNOSIS_IN_PROCESS -> COMPLETED
//! ```
//!
//! Each step may only be taken by an actor with the right role (and, for
//! most steps, only by the assigned technician or doctor). Every committed
//! step is written with an optimistic compare-and-save, so concurrent
//! attempts on one request resolve to exactly one winner.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Legal states, eligibility table and the pure engine
//! - [`services`] - Update (single writer) and query services
//! - [`store`] - Request store trait with in-memory and Postgres backends
//! - [`desk`] - Role-gated entry points for doctors and lab technicians
//! - [`config`] - Layered configuration loading
//! - [`error`] - Error taxonomy surfaced to callers
//!
//! ## Quick Start
//!
//! ```rust
//! use testflow_core::config::WorkflowConfig;
//! use testflow_core::models::{Actor, NewTestRequest, Patient};
//! use testflow_core::state_machine::RequestStatus;
//! use testflow_core::store::RequestStore;
//! use testflow_core::WorkflowSystem;
//!
//! # async fn example() -> testflow_core::Result<()> {
//! let system = WorkflowSystem::in_memory(&WorkflowConfig::default());
//! let request = system
//!     .store()
//!     .insert(NewTestRequest { patient: Patient::named("Asha") })
//!     .await?;
//!
//! let tester = Actor::tester(10, "Lab Tech");
//! let claimed = system.updates().assign_for_lab_test(request.id, &tester).await?;
//! assert_eq!(claimed.status, RequestStatus::Initiated);
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod desk;
pub mod directory;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state_machine;
pub mod store;
pub mod validation;

pub use bootstrap::WorkflowSystem;
pub use config::{ConfigManager, WorkflowConfig};
pub use error::{Result, WorkflowError};
pub use models::{Actor, ActorId, Role, TestRequest, TestRequestId};
pub use state_machine::{RequestStatus, WorkflowEngine};
