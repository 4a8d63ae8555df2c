use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{ValueError, ValueResult};
use crate::format::{
    DatePattern, DecimalPattern, DecimalSymbols, FormatError, MaskContext, resolve_mask,
};
use crate::meta::cache::{DateFormatter, FormatCaches};
use crate::types::{LogicalType, StorageType, TrimType, Value};

/// Column metadata recorded when a descriptor is inferred from a SQL result set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OriginalColumn {
    pub sql_type: i32,
    pub type_name: String,
    pub precision: i32,
    pub scale: i32,
    pub signed: bool,
}

/// Describes one column: its logical type, physical storage and every
/// formatting rule needed to convert, compare and serialize its values.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub(crate) config: Arc<EngineConfig>,

    name: String,
    logical_type: LogicalType,
    length: i32,
    precision: i32,
    storage_type: StorageType,
    trim_type: TrimType,

    origin: Option<String>,
    comments: Option<String>,

    conversion_mask: Option<String>,
    decimal_symbol: Option<String>,
    grouping_symbol: Option<String>,
    currency_symbol: Option<String>,
    string_encoding: Option<String>,

    case_insensitive: bool,
    collator_disabled: bool,
    collator_locale: Option<String>,
    collator_strength: i32,
    sorted_descending: bool,
    output_padding: bool,
    large_text_field: bool,

    date_format_lenient: bool,
    date_format_locale: Option<String>,
    date_format_time_zone: Option<String>,
    lenient_string_to_number: bool,

    storage_metadata: Option<Box<TypeDescriptor>>,
    conversion_metadata: Option<Box<TypeDescriptor>>,
    index: Option<Arc<Vec<Option<Value>>>>,
    original_column: Option<OriginalColumn>,

    identical_format: bool,
    caches: FormatCaches,
    binary_string_conversions: AtomicU64,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self::with_config(Arc::new(EngineConfig::default()), name, logical_type, -1, -1)
    }

    pub fn with_length(
        name: impl Into<String>,
        logical_type: LogicalType,
        length: i32,
        precision: i32,
    ) -> Self {
        Self::with_config(
            Arc::new(EngineConfig::default()),
            name,
            logical_type,
            length,
            precision,
        )
    }

    pub(crate) fn with_config(
        config: Arc<EngineConfig>,
        name: impl Into<String>,
        logical_type: LogicalType,
        length: i32,
        precision: i32,
    ) -> Self {
        let (decimal_symbol, grouping_symbol) = if logical_type == LogicalType::BigNumber {
            (Some(".".to_string()), None)
        } else {
            (
                Some(config.decimal_symbol.to_string()),
                Some(config.grouping_symbol.to_string()),
            )
        };

        Self {
            name: name.into(),
            logical_type,
            length,
            precision,
            storage_type: StorageType::Normal,
            trim_type: TrimType::None,
            origin: None,
            comments: None,
            conversion_mask: None,
            decimal_symbol,
            grouping_symbol,
            currency_symbol: Some(config.currency_symbol.clone()),
            string_encoding: None,
            case_insensitive: false,
            collator_disabled: true,
            collator_locale: Some(config.collator_locale.clone()),
            collator_strength: 0,
            sorted_descending: false,
            output_padding: false,
            large_text_field: false,
            date_format_lenient: config.date_format_lenient,
            date_format_locale: Some(config.date_locale.clone()),
            date_format_time_zone: Some(config.time_zone.clone()),
            lenient_string_to_number: config.lenient_string_to_number,
            storage_metadata: None,
            conversion_metadata: None,
            index: None,
            original_column: None,
            identical_format: true,
            caches: FormatCaches::new(),
            binary_string_conversions: AtomicU64::new(0),
            config,
        }
    }

    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    // -------- identity --------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    pub fn is_string(&self) -> bool {
        self.logical_type == LogicalType::String
    }

    pub fn is_numeric(&self) -> bool {
        self.logical_type.is_numeric()
    }

    pub fn is_temporal(&self) -> bool {
        self.logical_type.is_temporal()
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn set_length(&mut self, length: i32) {
        self.length = length;
        self.caches.invalidate_numbers();
        self.refresh_identical_format();
    }

    /// Integer and Binary always report 0, String and Boolean always -1,
    /// whatever was stored.
    pub fn precision(&self) -> i32 {
        match self.logical_type {
            LogicalType::Integer | LogicalType::Binary => 0,
            LogicalType::String | LogicalType::Boolean => -1,
            _ => self.precision,
        }
    }

    pub fn set_precision(&mut self, precision: i32) {
        self.precision = precision;
        self.caches.invalidate_numbers();
        self.refresh_identical_format();
    }

    pub fn set_length_and_precision(&mut self, length: i32, precision: i32) {
        self.length = length;
        self.precision = precision;
        self.caches.invalidate_numbers();
        self.refresh_identical_format();
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn set_origin(&mut self, origin: Option<String>) {
        self.origin = origin;
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn set_comments(&mut self, comments: Option<String>) {
        self.comments = comments;
    }

    pub fn is_large_text_field(&self) -> bool {
        self.large_text_field
    }

    pub fn set_large_text_field(&mut self, large: bool) {
        self.large_text_field = large;
    }

    pub fn original_column(&self) -> Option<&OriginalColumn> {
        self.original_column.as_ref()
    }

    pub fn set_original_column(&mut self, original: Option<OriginalColumn>) {
        self.original_column = original;
    }

    // -------- storage --------

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    /// Switching to binary-string storage leaves the storage metadata
    /// untouched; follow with [`set_storage_metadata`](Self::set_storage_metadata)
    /// or use [`use_binary_string_storage`](Self::use_binary_string_storage).
    /// Until then, decoding a binary-string cell is a storage error.
    pub fn set_storage_type(&mut self, storage_type: StorageType) {
        self.storage_type = storage_type;
    }

    pub fn storage_metadata(&self) -> Option<&TypeDescriptor> {
        self.storage_metadata.as_deref()
    }

    /// Storage metadata must be a String descriptor in normal storage.
    pub fn set_storage_metadata(&mut self, meta: Option<TypeDescriptor>) -> ValueResult<()> {
        if let Some(m) = &meta {
            if !m.is_string() || m.storage_type != StorageType::Normal {
                return Err(self.storage_error(format!(
                    "storage metadata must be a normal String descriptor, got {}",
                    m.signature()
                )));
            }
        }
        self.storage_metadata = meta.map(Box::new);
        self.refresh_identical_format();
        Ok(())
    }

    /// Switches to binary-string storage, deriving the storage metadata
    /// from this descriptor's current string rules.
    pub fn use_binary_string_storage(&mut self) {
        let mut storage = self.clone();
        storage.logical_type = LogicalType::String;
        storage.storage_type = StorageType::Normal;
        storage.storage_metadata = None;
        storage.index = None;
        self.storage_type = StorageType::BinaryString;
        self.storage_metadata = Some(Box::new(storage));
        self.refresh_identical_format();
    }

    pub fn conversion_metadata(&self) -> Option<&TypeDescriptor> {
        self.conversion_metadata.as_deref()
    }

    /// When present, formatters come from this descriptor instead of our own.
    pub fn set_conversion_metadata(&mut self, meta: Option<TypeDescriptor>) {
        self.conversion_metadata = meta.map(Box::new);
        self.caches.invalidate_numbers();
        self.caches.invalidate_dates();
    }

    pub fn index(&self) -> Option<&Arc<Vec<Option<Value>>>> {
        self.index.as_ref()
    }

    /// Installs the dictionary for indexed storage. Entries must be native
    /// values of this descriptor's type (or null).
    pub fn set_index(&mut self, index: Option<Vec<Option<Value>>>) -> ValueResult<()> {
        if let Some(entries) = &index {
            if let Some(bad) = entries
                .iter()
                .flatten()
                .find(|v| v.logical_type() != self.logical_type)
            {
                return Err(self.storage_error(format!(
                    "dictionary entry {bad} is not of type {}",
                    self.logical_type
                )));
            }
        }
        self.index = index.map(Arc::new);
        Ok(())
    }

    /// Shares an already-built dictionary without copying it.
    pub fn share_index(&mut self, index: Arc<Vec<Option<Value>>>) {
        self.index = Some(index);
    }

    pub fn is_identical_format(&self) -> bool {
        self.identical_format
    }

    pub fn binary_string_conversions(&self) -> u64 {
        self.binary_string_conversions.load(Ordering::Relaxed)
    }

    pub(crate) fn count_binary_string_conversion(&self) {
        self.binary_string_conversions.fetch_add(1, Ordering::Relaxed);
    }

    // -------- formatting config --------

    pub fn trim_type(&self) -> TrimType {
        self.trim_type
    }

    pub fn set_trim_type(&mut self, trim_type: TrimType) {
        self.trim_type = trim_type;
        self.refresh_identical_format();
    }

    pub fn conversion_mask(&self) -> Option<&str> {
        self.conversion_mask.as_deref()
    }

    pub fn set_conversion_mask(&mut self, mask: Option<String>) {
        self.conversion_mask = mask.filter(|m| !m.is_empty());
        self.caches.invalidate_numbers();
        self.caches.invalidate_dates();
        self.refresh_identical_format();
    }

    pub fn decimal_symbol(&self) -> Option<&str> {
        self.decimal_symbol.as_deref()
    }

    pub fn set_decimal_symbol(&mut self, symbol: Option<String>) {
        self.decimal_symbol = symbol;
        self.caches.invalidate_numbers();
        self.refresh_identical_format();
    }

    pub fn grouping_symbol(&self) -> Option<&str> {
        self.grouping_symbol.as_deref()
    }

    pub fn set_grouping_symbol(&mut self, symbol: Option<String>) {
        self.grouping_symbol = symbol;
        self.caches.invalidate_numbers();
        self.refresh_identical_format();
    }

    pub fn currency_symbol(&self) -> Option<&str> {
        self.currency_symbol.as_deref()
    }

    pub fn set_currency_symbol(&mut self, symbol: Option<String>) {
        self.currency_symbol = symbol;
        self.caches.invalidate_numbers();
    }

    pub fn string_encoding(&self) -> Option<&str> {
        self.string_encoding.as_deref()
    }

    pub fn set_string_encoding(&mut self, encoding: Option<String>) {
        self.string_encoding = encoding.filter(|e| !e.is_empty());
        self.refresh_identical_format();
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn set_case_insensitive(&mut self, case_insensitive: bool) {
        self.case_insensitive = case_insensitive;
    }

    pub fn is_collator_disabled(&self) -> bool {
        self.collator_disabled
    }

    pub fn set_collator_disabled(&mut self, disabled: bool) {
        self.collator_disabled = disabled;
        self.caches.invalidate_collator();
    }

    pub fn collator_locale(&self) -> Option<&str> {
        self.collator_locale.as_deref()
    }

    pub fn set_collator_locale(&mut self, locale: Option<String>) {
        self.collator_locale = locale;
        self.caches.invalidate_collator();
    }

    /// 0 primary, 1 secondary, 2 tertiary, 3 identical.
    pub fn collator_strength(&self) -> i32 {
        self.collator_strength
    }

    pub fn set_collator_strength(&mut self, strength: i32) {
        self.collator_strength = strength;
        self.caches.invalidate_collator();
    }

    pub fn is_sorted_descending(&self) -> bool {
        self.sorted_descending
    }

    pub fn set_sorted_descending(&mut self, descending: bool) {
        self.sorted_descending = descending;
    }

    pub fn is_output_padding(&self) -> bool {
        self.output_padding
    }

    pub fn set_output_padding(&mut self, padding: bool) {
        self.output_padding = padding;
    }

    pub fn is_date_format_lenient(&self) -> bool {
        self.date_format_lenient
    }

    pub fn set_date_format_lenient(&mut self, lenient: bool) {
        self.date_format_lenient = lenient;
        self.caches.invalidate_dates();
    }

    pub fn date_format_locale(&self) -> Option<&str> {
        self.date_format_locale.as_deref()
    }

    pub fn set_date_format_locale(&mut self, locale: Option<String>) {
        self.date_format_locale = locale;
        self.caches.invalidate_dates();
    }

    pub fn date_format_time_zone(&self) -> Option<&str> {
        self.date_format_time_zone.as_deref()
    }

    pub fn set_date_format_time_zone(&mut self, zone: Option<String>) {
        self.date_format_time_zone = zone;
        self.caches.invalidate_dates();
    }

    pub fn is_lenient_string_to_number(&self) -> bool {
        self.lenient_string_to_number
    }

    pub fn set_lenient_string_to_number(&mut self, lenient: bool) {
        self.lenient_string_to_number = lenient;
    }

    // -------- derived --------

    /// Whether binary-string bytes already match what this descriptor would
    /// render, so they can be passed through without re-encoding.
    fn compute_identical_format(&self) -> bool {
        let Some(storage) = self.storage_metadata.as_deref() else {
            return true;
        };
        if self.trim_type != TrimType::None {
            return false;
        }
        if self.string_encoding != storage.string_encoding {
            return false;
        }

        if self.is_temporal() {
            return self.conversion_mask == storage.conversion_mask;
        }
        if self.is_numeric() {
            return self.length == storage.length
                && self.precision() == storage.precision()
                && self.conversion_mask == storage.conversion_mask
                && (self.grouping_symbol == storage.grouping_symbol
                    || (self.conversion_mask.is_none() && storage.conversion_mask.is_none()))
                && self.decimal_symbol == storage.decimal_symbol;
        }
        true
    }

    fn refresh_identical_format(&mut self) {
        self.identical_format = self.compute_identical_format();
    }

    /// `Type(len)` / `Type(len, prec)` followed by `<storage>` when not normal.
    pub fn signature(&self) -> String {
        let mut out = self.logical_type.description().to_string();
        match self.logical_type {
            LogicalType::String | LogicalType::Integer if self.length > 0 => {
                out.push_str(&format!("({})", self.length));
            }
            LogicalType::Number | LogicalType::BigNumber if self.length > 0 => {
                if self.precision() > 0 {
                    out.push_str(&format!("({}, {})", self.length, self.precision()));
                } else {
                    out.push_str(&format!("({})", self.length));
                }
            }
            _ => {}
        }
        if self.storage_type != StorageType::Normal {
            out.push_str(&format!("<{}>", self.storage_type.code()));
        }
        out
    }

    /// Effective mask when this descriptor handles a value of `requested`.
    pub fn mask_for(&self, requested: LogicalType) -> Option<String> {
        let ctx = MaskContext {
            explicit: self.conversion_mask.as_deref(),
            descriptor_type: self.logical_type,
            length: self.length,
            precision: self.precision(),
        };
        resolve_mask(ctx, requested, &self.config)
    }

    pub fn format_mask(&self) -> Option<String> {
        self.mask_for(self.logical_type)
    }

    pub fn decimal_symbols(&self) -> DecimalSymbols {
        let first = |s: &Option<String>| s.as_deref().and_then(|s| s.chars().next());
        DecimalSymbols {
            decimal: first(&self.decimal_symbol).unwrap_or(self.config.decimal_symbol),
            grouping: first(&self.grouping_symbol),
            currency: self
                .currency_symbol
                .clone()
                .unwrap_or_else(|| self.config.currency_symbol.clone()),
        }
    }

    /// Zone used for date rendering; unknown ids fall back to the configured default.
    pub fn time_zone(&self) -> Tz {
        let requested = self
            .date_format_time_zone
            .as_deref()
            .unwrap_or(self.config.time_zone.as_str());
        match requested.parse::<Tz>() {
            Ok(zone) => zone,
            Err(_) => {
                warn!(descriptor = %self.name, zone = requested, "unknown time zone, using default");
                self.config.time_zone.parse::<Tz>().unwrap_or(Tz::UTC)
            }
        }
    }

    pub(crate) fn number_format(&self, requested: LogicalType) -> ValueResult<Arc<DecimalPattern>> {
        if let Some(meta) = self.conversion_metadata.as_deref() {
            return meta.number_format(requested);
        }
        self.caches.numbers.get_or_try_init(requested, || {
            let mask = self
                .mask_for(requested)
                .unwrap_or_else(|| self.config.number_parse_mask.clone());
            debug!(descriptor = %self.name, %mask, "building number formatter");
            DecimalPattern::compile(&mask, self.decimal_symbols()).map_err(|e| self.mask_error(&mask, e))
        })
    }

    pub(crate) fn date_format(&self, requested: LogicalType) -> ValueResult<Arc<DateFormatter>> {
        if let Some(meta) = self.conversion_metadata.as_deref() {
            return meta.date_format(requested);
        }
        self.caches.dates.get_or_try_init(requested, || {
            let mask = self
                .mask_for(requested)
                .unwrap_or_else(|| self.config.date_format_mask.clone());
            debug!(descriptor = %self.name, %mask, "building date formatter");
            let pattern = DatePattern::compile(&mask).map_err(|e| self.mask_error(&mask, e))?;
            Ok(DateFormatter {
                pattern,
                zone: self.time_zone(),
                lenient: self.date_format_lenient,
            })
        })
    }

    pub(crate) fn caches(&self) -> &FormatCaches {
        &self.caches
    }

    // -------- errors --------

    pub(crate) fn parse_error(&self, value: &str, offset: usize, reason: impl Into<String>) -> ValueError {
        ValueError::Parse {
            signature: self.to_string(),
            value: value.to_string(),
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(&self, value: impl fmt::Display, target: LogicalType) -> ValueError {
        ValueError::UnsupportedConversion {
            signature: self.to_string(),
            value: value.to_string(),
            target,
        }
    }

    pub(crate) fn storage_error(&self, reason: impl Into<String>) -> ValueError {
        ValueError::StorageType {
            signature: self.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn mask_error(&self, mask: &str, err: FormatError) -> ValueError {
        ValueError::Mask {
            signature: self.to_string(),
            mask: mask.to_string(),
            reason: err.to_string(),
        }
    }
}

impl Clone for TypeDescriptor {
    /// Copies configuration only; caches start empty and the identical-format
    /// flag is recomputed.
    fn clone(&self) -> Self {
        let mut copy = Self {
            config: Arc::clone(&self.config),
            name: self.name.clone(),
            logical_type: self.logical_type,
            length: self.length,
            precision: self.precision,
            storage_type: self.storage_type,
            trim_type: self.trim_type,
            origin: self.origin.clone(),
            comments: self.comments.clone(),
            conversion_mask: self.conversion_mask.clone(),
            decimal_symbol: self.decimal_symbol.clone(),
            grouping_symbol: self.grouping_symbol.clone(),
            currency_symbol: self.currency_symbol.clone(),
            string_encoding: self.string_encoding.clone(),
            case_insensitive: self.case_insensitive,
            collator_disabled: self.collator_disabled,
            collator_locale: self.collator_locale.clone(),
            collator_strength: self.collator_strength,
            sorted_descending: self.sorted_descending,
            output_padding: self.output_padding,
            large_text_field: self.large_text_field,
            date_format_lenient: self.date_format_lenient,
            date_format_locale: self.date_format_locale.clone(),
            date_format_time_zone: self.date_format_time_zone.clone(),
            lenient_string_to_number: self.lenient_string_to_number,
            storage_metadata: self.storage_metadata.clone(),
            conversion_metadata: self.conversion_metadata.clone(),
            index: self.index.clone(),
            original_column: self.original_column.clone(),
            identical_format: true,
            caches: FormatCaches::new(),
            binary_string_conversions: AtomicU64::new(0),
        };
        copy.refresh_identical_format();
        copy
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.signature())
    }
}
