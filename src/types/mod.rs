//! Core type vocabulary of the value layer.
//!
//! - `LogicalType`: what a column means
//! - `StorageType`: how a raw value is physically held
//! - `Value` / `RawValue`: native values and the raw cells carried in rows
//!
//! No conversion logic lives here.

pub mod logical;
pub mod storage;
pub mod value;


pub use logical::LogicalType;
pub use storage::{StorageType, TrimType};
pub use value::{RawValue, Value};
