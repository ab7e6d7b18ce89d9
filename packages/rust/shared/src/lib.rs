//! Shared types, error model, and configuration for BrandGate.
//!
//! This crate is the foundation depended on by all other BrandGate crates.
//! It provides:
//! - [`BrandGateError`] — the unified error type
//! - Domain types ([`SubmissionRequest`], [`QueueEntry`], [`RequestId`],
//!   [`Channel`], [`RequestStatus`], [`CompanyCandidate`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, NotifierConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, resolve_db_path, validate_webhook,
};
pub use error::{BrandGateError, Result};
pub use types::{
    Channel, CompanyCandidate, Environment, Provenance, QueueEntry, RequestId, RequestStatus,
    Requestor, SubjectKind, SubmissionRequest,
};
