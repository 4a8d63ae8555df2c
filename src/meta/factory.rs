use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{ValueError, ValueResult};
use crate::meta::TypeDescriptor;
use crate::types::LogicalType;

/// Builds descriptors that all share one engine configuration.
#[derive(Debug, Clone, Default)]
pub struct DescriptorFactory {
    config: Arc<EngineConfig>,
}

impl DescriptorFactory {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn from_shared(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    pub fn create(&self, name: impl Into<String>, logical_type: LogicalType) -> TypeDescriptor {
        self.create_with_length(name, logical_type, -1, -1)
    }

    pub fn create_with_length(
        &self,
        name: impl Into<String>,
        logical_type: LogicalType,
        length: i32,
        precision: i32,
    ) -> TypeDescriptor {
        TypeDescriptor::with_config(Arc::clone(&self.config), name, logical_type, length, precision)
    }

    /// Lookup by the numeric type code used on the wire.
    pub fn create_by_code(&self, name: impl Into<String>, code: i32) -> ValueResult<TypeDescriptor> {
        let logical_type = LogicalType::from_code(code).ok_or_else(|| ValueError::Config {
            reason: format!("unknown type code {code}"),
        })?;
        Ok(self.create(name, logical_type))
    }

    /// Lookup by human-readable type name, as used in XML.
    pub fn create_by_description(
        &self,
        name: impl Into<String>,
        description: &str,
    ) -> ValueResult<TypeDescriptor> {
        let logical_type =
            LogicalType::from_description(description).ok_or_else(|| ValueError::Config {
                reason: format!("unknown type '{description}'"),
            })?;
        Ok(self.create(name, logical_type))
    }
}
