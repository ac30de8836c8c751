//! Purpose: Shared core library crate used by the `dialogite` CLI and tests.
//! Exports: `core` (record model, line parsing, store persistence, export, errors).
//! Role: Internal library backing the binary; not yet a stable public SDK.
//! Invariants: Treat the crate API as internal until a dedicated library release.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
#![allow(clippy::result_large_err)]
pub mod core;
