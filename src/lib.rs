//! Row-value type layer: type descriptors, conversions, comparison and codecs
//! for values flowing through an ETL pipeline.

pub mod config;
pub mod error;

pub mod codec;
pub mod compare;
pub mod convert;
pub mod format;
pub mod jdbc;
pub mod meta;
pub mod storage;
pub mod types;

pub use config::EngineConfig;
pub use error::{ValueError, ValueResult};
pub use meta::{DescriptorFactory, TypeDescriptor};
pub use types::{LogicalType, RawValue, StorageType, TrimType, Value};
