//! Conversion engine.
//!
//! Rules are attached to [`TypeDescriptor`](crate::meta::TypeDescriptor)
//! so every conversion sees the holding descriptor's configuration.

pub mod charset;
mod native;
mod nulls;


pub(crate) use native::{f64_to_decimal, parse_boolean, round_half_up, truncate_to_millis};
