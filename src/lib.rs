//! ticket-intake - support ticket intake and lifecycle engine
//!
//! This crate accepts customer issue reports, validates them with syntactic
//! and heuristic rules, rejects duplicates of open tickets and keeps every
//! ticket in one of three flat-file partitions:
//! - **pending**: submitted, waiting for the promoter
//! - **active**: in the support queue, priority editable by administrators
//! - **resolved**: closed by the resolution worker
//!
//! Administrative actions are recorded in an append-only audit log.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::map_unwrap_or)]

//! # Concurrent Safety
//!
//! Every store mutation runs under an in-process mutex and an advisory lock
//! file in the data directory, so several processes may share one set of
//! partitions. Whole-partition rewrites go through a temporary file and a
//! rename; readers never see a partial file.
//!
//! # Example
//!
//! ```rust,ignore
//! use ticket_intake::config::AppConfig;
//! use ticket_intake::lifecycle::LifecycleManager;
//! use ticket_intake::validation::SubmissionForm;
//!
//! let manager = LifecycleManager::from_config(&AppConfig::load(None)?)?;
//! let outcome = manager.submit(&SubmissionForm {
//!     name: "Jane Doe".into(),
//!     email: "jane.doe@gmail.com".into(),
//!     product: "laptpo".into(),
//!     purchase_date: "2025-01-15".into(),
//!     description: "The laptop screen flickers constantly".into(),
//! })?;
//! println!("{}", outcome.message());
//! ```

pub mod audit;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod lifecycle;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod test_utils;
