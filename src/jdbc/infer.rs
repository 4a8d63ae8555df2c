use tracing::debug;

use crate::jdbc::{DialectCapabilities, DialectKind};
use crate::jdbc::sql_types as sql;
use crate::meta::{DescriptorFactory, OriginalColumn, TypeDescriptor};
use crate::types::LogicalType;

/// Length given to character large objects.
pub const CLOB_LENGTH: i32 = 9_999_999;

/// One column of a SQL result set, as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SqlColumn {
    pub name: String,
    pub label: String,
    pub sql_type: i32,
    pub type_name: String,
    pub display_size: i32,
    pub precision: i32,
    pub scale: i32,
    pub signed: bool,
}

impl SqlColumn {
    pub fn new(name: impl Into<String>, sql_type: i32) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            sql_type,
            signed: true,
            ..Self::default()
        }
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn with_display_size(mut self, display_size: i32) -> Self {
        self.display_size = display_size;
        self
    }

    pub fn with_precision_and_scale(mut self, precision: i32, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.signed = false;
        self
    }
}

struct Inferred {
    logical_type: LogicalType,
    length: i32,
    precision: i32,
    large_text: bool,
}

impl Inferred {
    fn new(logical_type: LogicalType, length: i32, precision: i32) -> Self {
        Self {
            logical_type,
            length,
            precision,
            large_text: false,
        }
    }
}

/// Infers a descriptor for `column`.
///
/// With `lazy_conversion`, string columns keep their bytes undecoded in
/// binary-string storage until first use.
pub fn infer_descriptor(
    factory: &DescriptorFactory,
    dialect: &dyn DialectCapabilities,
    column: &SqlColumn,
    ignore_length: bool,
    lazy_conversion: bool,
) -> TypeDescriptor {
    let inferred = infer(dialect, column, ignore_length);

    let mut meta = factory.create_with_length(
        column.name.clone(),
        inferred.logical_type,
        inferred.length,
        inferred.precision,
    );
    meta.set_large_text_field(inferred.large_text);
    meta.set_comments(Some(column.label.clone()));
    meta.set_original_column(Some(OriginalColumn {
        sql_type: column.sql_type,
        type_name: column.type_name.clone(),
        precision: column.precision,
        scale: column.scale,
        signed: column.signed,
    }));

    if lazy_conversion && inferred.logical_type == LogicalType::String {
        meta.use_binary_string_storage();
    }

    debug!(
        column = %column.name, sql_type = column.sql_type, descriptor = %meta,
        "inferred descriptor from SQL metadata"
    );

    match dialect.customize(column, &meta) {
        Some(custom) => custom,
        None => meta,
    }
}

fn infer(dialect: &dyn DialectCapabilities, column: &SqlColumn, ignore_length: bool) -> Inferred {
    let kind = dialect.kind();
    match column.sql_type {
        sql::CHAR | sql::VARCHAR | sql::NVARCHAR | sql::LONGVARCHAR => {
            let length = if ignore_length { -1 } else { column.display_size };
            Inferred::new(LogicalType::String, length, -1)
        }
        sql::CLOB | sql::NCLOB => Inferred {
            large_text: true,
            ..Inferred::new(LogicalType::String, CLOB_LENGTH, -1)
        },
        // unsigned 64-bit values overflow i64
        sql::BIGINT if column.signed => Inferred::new(LogicalType::Integer, 15, 0),
        sql::BIGINT => Inferred::new(LogicalType::BigNumber, 16, 0),
        sql::INTEGER => Inferred::new(LogicalType::Integer, 9, 0),
        sql::SMALLINT => Inferred::new(LogicalType::Integer, 4, 0),
        sql::TINYINT => Inferred::new(LogicalType::Integer, 2, 0),
        sql::DECIMAL | sql::DOUBLE | sql::FLOAT | sql::REAL | sql::NUMERIC => {
            infer_numeric(dialect, column)
        }
        sql::TIMESTAMP => {
            if dialect.supports_timestamp_data_type() {
                Inferred::new(LogicalType::Timestamp, column.scale, -1)
            } else {
                Inferred::new(LogicalType::Date, -1, -1)
            }
        }
        sql::DATE | sql::TIME => {
            let precision =
                if column.sql_type == sql::DATE && kind == DialectKind::Teradata { 1 } else { -1 };
            if kind.is_mysql_variant()
                && !dialect.year_is_date_type()
                && column.type_name.eq_ignore_ascii_case("YEAR")
            {
                Inferred::new(LogicalType::Integer, 4, 0)
            } else {
                Inferred::new(LogicalType::Date, -1, precision)
            }
        }
        sql::BOOLEAN | sql::BIT => Inferred::new(LogicalType::Boolean, -1, -1),
        sql::BINARY | sql::BLOB | sql::VARBINARY | sql::LONGVARBINARY => infer_binary(dialect, column),
        _ => Inferred::new(LogicalType::String, -1, column.scale),
    }
}

fn infer_numeric(dialect: &dyn DialectCapabilities, column: &SqlColumn) -> Inferred {
    let kind = dialect.kind();
    let mut logical_type = LogicalType::Number;
    let mut length = if column.precision >= 126 { -1 } else { column.precision };
    let mut precision = if column.scale >= 126 { -1 } else { column.scale };

    let floating = matches!(column.sql_type, sql::DOUBLE | sql::FLOAT | sql::REAL);
    if floating {
        if precision == 0 {
            precision = -1;
        }
        if kind.is_postgres_variant()
            && column.sql_type == sql::DOUBLE
            && precision >= 16
            && length >= 16
        {
            precision = -1;
            length = -1;
        }
        // MySQL reports bogus (length, scale) pairs for doubles
        if kind.is_mysql_variant() && precision >= length {
            precision = -1;
            length = -1;
        }
        if length > 15 || precision > 15 {
            logical_type = LogicalType::BigNumber;
        }
    } else if precision == 0 {
        if length > 0 && length <= 18 {
            logical_type = LogicalType::Integer;
        } else if length > 18 {
            logical_type = LogicalType::BigNumber;
        }
    } else if length > 15 || precision > 15 {
        logical_type = LogicalType::BigNumber;
    }

    // undefined size means arbitrary precision
    if kind.is_postgres_variant() && column.sql_type == sql::NUMERIC && length == 0 && precision == 0 {
        logical_type = LogicalType::BigNumber;
        length = -1;
        precision = -1;
    }

    if kind == DialectKind::Oracle {
        if precision == 0 && length == 38 {
            logical_type = if dialect.strict_big_number_interpretation() {
                LogicalType::BigNumber
            } else {
                LogicalType::Integer
            };
        }
        if precision <= 0 && length <= 0 {
            logical_type = LogicalType::BigNumber;
            length = -1;
            precision = -1;
        }
    }

    Inferred::new(logical_type, length, precision)
}

fn infer_binary(dialect: &dyn DialectCapabilities, column: &SqlColumn) -> Inferred {
    let kind = dialect.kind();
    let variable = matches!(column.sql_type, sql::VARBINARY | sql::LONGVARBINARY);

    if dialect.display_size_twice_the_precision()
        && column.precision.checked_mul(2) == Some(column.display_size)
    {
        Inferred::new(LogicalType::Binary, column.precision, -1)
    } else if kind == DialectKind::Oracle && variable {
        // RAW / LONG RAW
        Inferred::new(LogicalType::String, column.display_size, -1)
    } else if kind == DialectKind::Sqlite {
        Inferred::new(LogicalType::String, -1, -1)
    } else {
        Inferred::new(LogicalType::Binary, -1, -1)
    }
}
