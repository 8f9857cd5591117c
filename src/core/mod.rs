//! core
//!
//! Core domain types, schemas, and operations for the metadata ledger.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Slug, Status, Category, CommitId
//! - [`table`] - Locating and rewriting the metadata table
//! - [`corpus`] - Document discovery and the document model
//! - [`slugs`] - Slug allocation
//! - [`validate`] - Per-document and corpus-wide checks
//! - [`issues`] - Validation findings and their diagnostics
//! - [`ledger`] - The assign-then-validate pass
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Parsing is tolerant and never fails; validation reports instead
//! - All checks are deterministic

pub mod config;
pub mod corpus;
pub mod issues;
pub mod ledger;
pub mod slugs;
pub mod table;
pub mod types;
pub mod validate;
