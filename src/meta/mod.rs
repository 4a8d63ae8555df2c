//! Type descriptors: per-column type, storage and formatting configuration.
//!
//! Descriptors are set up once (mutable) and then shared read-only across
//! worker threads. Formatter caches are rebuilt lazily behind a lock.

pub(crate) mod cache;
pub mod descriptor;
pub mod factory;

mod unit_tests;

pub use descriptor::{OriginalColumn, TypeDescriptor};
pub use factory::DescriptorFactory;
