//! rfcledger - Metadata ledger and timeline engine for RFC document corpora
//!
//! Every document in the corpus carries a `| Field | Value |` metadata table
//! and a generated change-history block. This crate keeps both consistent
//! under repeated, unattended runs.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Table model, validation, slug allocation, configuration
//! - [`timeline`] - History extraction, fixed-point filter, rendering, injection
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. Slugs are unique across active documents and allocated deterministically
//! 2. Re-running either pass on unchanged input writes nothing
//! 3. The timeline never lists commits that only rewrote the timeline
//! 4. Documents are written only when their content changed

pub mod cli;
pub mod core;
pub mod git;
pub mod timeline;
pub mod ui;
