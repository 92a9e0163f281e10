//! # simroll provisioning pipeline
//!
//! Turns tabular account data into directory entries.
//!
//! Rows come in through the [`RowSource`] abstraction (CSV files in
//! production, in-memory fixtures in tests), are validated and
//! sanitized to the printable-ASCII range the directory accepts, get a
//! `uidNumber` from the [`UidAllocator`], and are submitted one add at
//! a time by the [`ProvisionPipeline`]. A failed add rolls the
//! allocator back so issued uids only ever correspond to entries that
//! exist.

pub mod error;
pub mod pipeline;
pub mod sanitize;
pub mod source;
pub mod uid;

pub use error::{ProvisionError, ProvisionResult};
pub use pipeline::{ProvisionConfig, ProvisionPipeline, ProvisionReport};
pub use sanitize::{sanitize_attributes, sanitize_text, sanitize_value};
pub use source::{CsvRowSource, RowRecord, RowSource};
pub use uid::UidAllocator;
