//! Storage representation dispatch.
//!
//! A row cell is a [`RawValue`](crate::types::RawValue) whose meaning
//! depends on the descriptor's [`StorageType`](crate::types::StorageType):
//!
//! - `Normal`: the native value itself
//! - `BinaryString`: encoded text, described by the storage metadata
//! - `Indexed`: a code into the descriptor's dictionary
//!
//! Every typed accessor first resolves the cell to a native value, then
//! hands it to the conversion engine.

mod access;
mod transcode;


pub use transcode::{COMPATIBLE_DATE_MASK, COMPATIBLE_TIMESTAMP_MASK};
pub(crate) use transcode::{compatible_text, parse_compatible_instant};
