//! # Binary settings-object codec
//!
//! Saves and loads schema-registered object trees in a compact, versioned
//! binary format that tolerates schema evolution: fields are stored under
//! stable numeric IDs behind a per-block index table, so fields added,
//! removed, or reordered across versions neither corrupt nor fail the
//! fields that still match.
//!
//! ## File layout
//!
//! ```text
//! envelope:       magic[3] = "BSO", major: u8, minor: u8, build: u8,
//!                 data_start: i32
//! root:           one tagged object block (value_type = Class)
//! ```
//!
//! Each object block nests its base-level block and indexes its own
//! fields; the block module documents the block layout and its recovery
//! semantics.
//!
//! ## Degradation
//!
//! Only a bad magic number fails a load outright. Everything below that
//! degrades: an unreadable block is skipped through its length prefix, an
//! unreadable field is left at its default, an unresolvable external
//! reference decodes to no value. Incidents are reported through `tracing`
//! and never affect control flow.

mod block;
mod envelope;
mod file;
mod resolver;
mod rw;

pub use envelope::*;
pub use file::*;
pub use rw::{OnFieldRead, OnFieldWrite, ReadSeek};
