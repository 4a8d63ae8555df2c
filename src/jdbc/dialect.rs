use std::collections::HashMap;

use crate::jdbc::SqlColumn;
use crate::meta::TypeDescriptor;

/// Database families whose metadata needs special handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialectKind {
    #[default]
    Generic,
    MySql,
    PostgreSql,
    Greenplum,
    Oracle,
    Teradata,
    Sqlite,
    Db2,
}

impl DialectKind {
    pub fn is_mysql_variant(self) -> bool {
        self == DialectKind::MySql
    }

    pub fn is_postgres_variant(self) -> bool {
        matches!(self, DialectKind::PostgreSql | DialectKind::Greenplum)
    }
}

/// What type inference needs to know about the database a column came from.
pub trait DialectCapabilities: Send + Sync {
    fn kind(&self) -> DialectKind;

    fn supports_timestamp_data_type(&self) -> bool {
        true
    }

    /// Oracle `NUMBER(38, 0)` becomes BigNumber instead of Integer.
    fn strict_big_number_interpretation(&self) -> bool {
        false
    }

    /// `CHAR(n) FOR BIT DATA` style binaries report a display size of twice
    /// their precision.
    fn display_size_twice_the_precision(&self) -> bool {
        false
    }

    fn connection_properties(&self) -> &HashMap<String, String>;

    /// MySQL `YEAR` columns are dates unless `yearIsDateType=false`.
    fn year_is_date_type(&self) -> bool {
        !self
            .connection_properties()
            .get("yearIsDateType")
            .is_some_and(|v| v.eq_ignore_ascii_case("false"))
    }

    /// Replaces the inferred descriptor when the dialect knows better.
    fn customize(&self, _column: &SqlColumn, _inferred: &TypeDescriptor) -> Option<TypeDescriptor> {
        None
    }
}

/// Capability flags without dialect-specific hooks.
#[derive(Debug, Clone)]
pub struct GenericDialect {
    kind: DialectKind,
    timestamps: bool,
    strict_big_numbers: bool,
    twice_precision: bool,
    properties: HashMap<String, String>,
}

impl GenericDialect {
    pub fn new(kind: DialectKind) -> Self {
        Self {
            kind,
            timestamps: true,
            strict_big_numbers: false,
            twice_precision: kind == DialectKind::Db2,
            properties: HashMap::new(),
        }
    }

    pub fn with_timestamps(mut self, supported: bool) -> Self {
        self.timestamps = supported;
        self
    }

    pub fn with_strict_big_numbers(mut self, strict: bool) -> Self {
        self.strict_big_numbers = strict;
        self
    }

    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }
}

impl Default for GenericDialect {
    fn default() -> Self {
        Self::new(DialectKind::Generic)
    }
}

impl DialectCapabilities for GenericDialect {
    fn kind(&self) -> DialectKind {
        self.kind
    }

    fn supports_timestamp_data_type(&self) -> bool {
        self.timestamps
    }

    fn strict_big_number_interpretation(&self) -> bool {
        self.strict_big_numbers
    }

    fn display_size_twice_the_precision(&self) -> bool {
        self.twice_precision
    }

    fn connection_properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}
