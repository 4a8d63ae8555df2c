//! Bridge from SQL result-set metadata to type descriptors.
//!
//! The driver-facing side (connections, statements) lives elsewhere; this
//! module only maps a column's reported type, size and scale onto a
//! descriptor, with the database dialect supplying its quirks through
//! [`DialectCapabilities`].

mod dialect;
mod infer;
pub mod sql_types;


pub use dialect::{DialectCapabilities, DialectKind, GenericDialect};
pub use infer::{CLOB_LENGTH, SqlColumn, infer_descriptor};
