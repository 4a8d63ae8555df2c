//! Wire formats for descriptors and cells.
//!
//! - [`binary`]: big-endian records read and written through `std::io`
//! - [`xml`]: `value-meta` / `value-data` elements
//!
//! A metadata record and the data records that follow it always share one
//! descriptor: data records carry no type information of their own.

pub mod binary;
pub mod xml;
