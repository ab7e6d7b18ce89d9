//! Core domain logic for BrandGate.
//!
//! This crate ties validation, classification, and directory resolution
//! into the end-to-end submission workflow (`submit`, `submit_channels`)
//! over the ledger and queue storage seams.

pub mod classify;
pub mod directory;
pub mod store;
pub mod submit;
pub mod validate;

pub use directory::{Candidate, DirectoryLookup, LookupKind, StaticDirectory};
pub use store::{IngestionQueue, RequestLedger};
pub use submit::{
    ChannelOutcome, MultiChannelOutcome, SubjectOutcome, SubmissionBatch, SubmitContext,
    SubmitOutcome, submit, submit_channels,
};
