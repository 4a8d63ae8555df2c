//! Ordering and hashing of raw cells.
//!
//! Nulls sort first and are never affected by the descending flag; only
//! comparisons between two non-null values are negated.

mod collate;
mod hash;
mod order;

mod unit_tests;

pub use hash::{java_bytes_hash, java_string_hash};
