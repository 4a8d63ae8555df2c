//! XML form of descriptors (`value-meta`) and cells (`value-data`).
//!
//! Booleans are written `Y`/`N`; binary payloads as base64 of gzip.

use std::io::{Read, Write};
use std::net::IpAddr;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use roxmltree::{Document, Node};
use rust_decimal::Decimal;

use crate::codec::binary::bcp47;
use crate::convert::parse_boolean;
use crate::error::{ValueError, ValueResult};
use crate::meta::{DescriptorFactory, TypeDescriptor};
use crate::storage::{compatible_text, parse_compatible_instant};
use crate::types::{LogicalType, RawValue, StorageType, TrimType, Value};

pub const META_TAG: &str = "value-meta";
pub const DATA_TAG: &str = "value-data";

const BINARY_STRING_TAG: &str = "binary-string";
const INDEX_VALUE_TAG: &str = "index-value";
/// Marks an empty string when it is kept apart from null.
const EMPTY_ATTR: &str = "empty";

// -------- writing --------

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // parsers fold raw carriage returns into line feeds
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_tag(out: &mut String, depth: usize, tag: &str, value: Option<&str>) {
    out.push_str(&"  ".repeat(depth));
    match value {
        Some(v) if !v.is_empty() => {
            out.push_str(&format!("<{tag}>{}</{tag}>", escape(v)));
        }
        _ => out.push_str(&format!("<{tag}/>")),
    }
    out.push('\n');
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Y" } else { "N" }
}

fn gzip_base64(bytes: &[u8]) -> ValueResult<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .and_then(|_| encoder.finish())
        .map(|compressed| STANDARD.encode(compressed))
        .map_err(|e| ValueError::Xml {
            reason: format!("unable to compress binary payload: {e}"),
        })
}

fn gunzip_base64(text: &str) -> ValueResult<Vec<u8>> {
    let compressed = STANDARD.decode(text.trim()).map_err(|e| ValueError::Xml {
        reason: format!("invalid base64 payload: {e}"),
    })?;
    let mut bytes = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut bytes)
        .map_err(|e| ValueError::Xml {
            reason: format!("invalid gzip payload: {e}"),
        })?;
    Ok(bytes)
}

impl TypeDescriptor {
    pub fn meta_to_xml(&self) -> ValueResult<String> {
        let mut out = String::new();
        self.push_meta_xml(&mut out, 0)?;
        Ok(out)
    }

    fn push_meta_xml(&self, out: &mut String, depth: usize) -> ValueResult<()> {
        let pad = "  ".repeat(depth);
        out.push_str(&format!("{pad}<{META_TAG}>\n"));
        let inner = depth + 1;

        push_tag(out, inner, "type", Some(self.logical_type().description()));
        push_tag(out, inner, "storagetype", Some(self.storage_type().code()));

        match self.storage_type() {
            StorageType::Indexed => {
                if let Some(entries) = self.index() {
                    out.push_str(&format!("{}<index>\n", "  ".repeat(inner)));
                    for entry in entries.iter() {
                        let text = match entry {
                            Some(value) => self.native_xml_text(value)?,
                            None => None,
                        };
                        push_tag(out, inner + 1, "value", text.as_deref());
                    }
                    out.push_str(&format!("{}</index>\n", "  ".repeat(inner)));
                }
            }
            StorageType::BinaryString => {
                if let Some(storage) = self.storage_metadata() {
                    out.push_str(&format!("{}<storage-meta>\n", "  ".repeat(inner)));
                    storage.push_meta_xml(out, inner + 1)?;
                    out.push_str(&format!("{}</storage-meta>\n", "  ".repeat(inner)));
                }
            }
            StorageType::Normal => {}
        }

        push_tag(out, inner, "name", Some(self.name()));
        push_tag(out, inner, "length", Some(&self.length().to_string()));
        push_tag(out, inner, "precision", Some(&self.precision().to_string()));
        push_tag(out, inner, "origin", self.origin());
        push_tag(out, inner, "comments", self.comments());
        push_tag(out, inner, "conversion_Mask", self.conversion_mask());
        push_tag(out, inner, "decimal_symbol", self.decimal_symbol());
        push_tag(out, inner, "grouping_symbol", self.grouping_symbol());
        push_tag(out, inner, "currency_symbol", self.currency_symbol());
        push_tag(out, inner, "trim_type", Some(self.trim_type().code()));
        push_tag(out, inner, "case_insensitive", Some(yes_no(self.is_case_insensitive())));
        push_tag(out, inner, "collator_locale", self.collator_locale().map(bcp47).as_deref());
        push_tag(out, inner, "collator_disabled", Some(yes_no(self.is_collator_disabled())));
        push_tag(out, inner, "collator_strength", Some(&self.collator_strength().to_string()));
        push_tag(out, inner, "sort_descending", Some(yes_no(self.is_sorted_descending())));
        push_tag(out, inner, "output_padding", Some(yes_no(self.is_output_padding())));
        push_tag(out, inner, "date_format_lenient", Some(yes_no(self.is_date_format_lenient())));
        push_tag(out, inner, "date_format_locale", self.date_format_locale().map(bcp47).as_deref());
        push_tag(out, inner, "date_format_timezone", self.date_format_time_zone());
        push_tag(
            out,
            inner,
            "lenient_string_to_number",
            Some(yes_no(self.is_lenient_string_to_number())),
        );

        out.push_str(&format!("{pad}</{META_TAG}>\n"));
        Ok(())
    }

    /// One `value-data` element. Binary-string cells keep their encoded
    /// bytes and indexed cells their code.
    pub fn data_to_xml(&self, raw: &RawValue) -> ValueResult<String> {
        let mut out = String::new();
        match (self.storage_type(), raw) {
            (_, RawValue::Null) => out.push_str(&format!("<{DATA_TAG}/>")),
            (StorageType::BinaryString, RawValue::BinaryString(bytes)) => {
                out.push_str(&format!("<{DATA_TAG}>"));
                out.push_str(&format!(
                    "<{BINARY_STRING_TAG}>{}</{BINARY_STRING_TAG}>",
                    gzip_base64(bytes)?
                ));
                out.push_str(&format!("</{DATA_TAG}>"));
            }
            (StorageType::Indexed, RawValue::Index(code)) => {
                out.push_str(&format!(
                    "<{DATA_TAG}><{INDEX_VALUE_TAG}>{code}</{INDEX_VALUE_TAG}></{DATA_TAG}>"
                ));
            }
            (StorageType::Normal, RawValue::Native(value)) => {
                let value = if value.logical_type() == self.logical_type() {
                    value.clone()
                } else {
                    self.convert_value(value, self.logical_type())?
                        .ok_or_else(|| self.unsupported(value, self.logical_type()))?
                };
                match self.native_xml_text(&value)? {
                    Some(text) if text.is_empty() && self.keeps_empty_strings() => {
                        out.push_str(&format!("<{DATA_TAG} {EMPTY_ATTR}=\"Y\"/>"));
                    }
                    Some(text) => out.push_str(&format!("<{DATA_TAG}>{}</{DATA_TAG}>", escape(&text))),
                    None => out.push_str(&format!("<{DATA_TAG}/>")),
                }
            }
            (storage, other) => {
                return Err(self.storage_error(format!(
                    "cannot write '{}' under {storage} storage",
                    other.describe()
                )));
            }
        }
        Ok(out)
    }

    fn native_xml_text(&self, value: &Value) -> ValueResult<Option<String>> {
        Ok(match value {
            Value::Boolean(b) => Some(yes_no(*b).to_string()),
            Value::Binary(bytes) | Value::Serializable(bytes) => Some(gzip_base64(bytes)?),
            Value::String(s) => Some(s.clone()),
            other => Some(compatible_text(other).unwrap_or_else(|| other.to_string())),
        })
    }

    // -------- reading data --------

    pub fn data_from_xml(&self, xml: &str) -> ValueResult<RawValue> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        expect_tag(root, DATA_TAG)?;
        self.data_from_node(root)
    }

    pub(crate) fn data_from_node(&self, node: Node<'_, '_>) -> ValueResult<RawValue> {
        match self.storage_type() {
            StorageType::BinaryString => match child_text(node, BINARY_STRING_TAG) {
                Some(text) => Ok(RawValue::BinaryString(gunzip_base64(text)?)),
                None => Ok(RawValue::Null),
            },
            StorageType::Indexed => match child_text(node, INDEX_VALUE_TAG) {
                Some(text) => text
                    .trim()
                    .parse::<i32>()
                    .map(RawValue::Index)
                    .map_err(|_| self.xml_error(format!("invalid index code '{text}'"))),
                None => Ok(RawValue::Null),
            },
            StorageType::Normal => match node.text() {
                Some(text) if !text.is_empty() => Ok(self.native_from_xml_text(text)?.into()),
                _ if node.attribute(EMPTY_ATTR) == Some("Y") && self.keeps_empty_strings() => {
                    Ok(RawValue::string(""))
                }
                _ => Ok(RawValue::Null),
            },
        }
    }

    fn keeps_empty_strings(&self) -> bool {
        self.is_string() && self.config.empty_string_differs_from_null
    }

    fn native_from_xml_text(&self, text: &str) -> ValueResult<Option<Value>> {
        let bad = |what: &str| self.xml_error(format!("invalid {what} '{text}'"));
        Ok(Some(match self.logical_type() {
            LogicalType::String => Value::String(text.to_string()),
            LogicalType::Number => Value::Number(text.trim().parse().map_err(|_| bad("number"))?),
            LogicalType::Integer => Value::Integer(text.trim().parse().map_err(|_| bad("integer"))?),
            LogicalType::BigNumber => Value::BigNumber(
                Decimal::from_str(text.trim())
                    .or_else(|_| Decimal::from_scientific(text.trim()))
                    .map_err(|_| bad("big number"))?,
            ),
            LogicalType::Date => {
                Value::Date(parse_compatible_instant(text).ok_or_else(|| bad("date"))?)
            }
            LogicalType::Timestamp => {
                Value::Timestamp(parse_compatible_instant(text).ok_or_else(|| bad("timestamp"))?)
            }
            LogicalType::Boolean => return Ok(parse_boolean(text.trim()).map(Value::Boolean)),
            LogicalType::Binary => Value::Binary(gunzip_base64(text)?),
            LogicalType::Serializable => Value::Serializable(gunzip_base64(text)?),
            LogicalType::InternetAddress => Value::InternetAddress(
                IpAddr::from_str(text.trim()).map_err(|_| bad("address"))?,
            ),
            LogicalType::None => return Err(bad("value for type None")),
        }))
    }

    fn xml_error(&self, reason: String) -> ValueError {
        ValueError::Xml {
            reason: format!("{self}: {reason}"),
        }
    }
}

// -------- reading metadata --------

fn expect_tag(node: Node<'_, '_>, tag: &str) -> ValueResult<()> {
    if node.has_tag_name(tag) {
        Ok(())
    } else {
        Err(ValueError::Xml {
            reason: format!("expected <{tag}>, found <{}>", node.tag_name().name()),
        })
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(tag))
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child(node, tag).and_then(|c| c.text()).filter(|t| !t.is_empty())
}

fn child_string(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_text(node, tag).map(str::to_string)
}

fn child_flag(node: Node<'_, '_>, tag: &str) -> bool {
    child_text(node, tag).is_some_and(|t| t.trim().eq_ignore_ascii_case("Y"))
}

fn child_int(node: Node<'_, '_>, tag: &str, default: i32) -> ValueResult<i32> {
    match child_text(node, tag) {
        None => Ok(default),
        Some(text) => text.trim().parse().map_err(|_| ValueError::Xml {
            reason: format!("<{tag}> is not an integer: '{text}'"),
        }),
    }
}

impl DescriptorFactory {
    pub fn meta_from_xml(&self, xml: &str) -> ValueResult<TypeDescriptor> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        expect_tag(root, META_TAG)?;
        self.meta_from_node(root)
    }

    pub(crate) fn meta_from_node(&self, node: Node<'_, '_>) -> ValueResult<TypeDescriptor> {
        let type_name = child_text(node, "type").unwrap_or("-");
        let mut meta = self.create_by_description(child_string(node, "name").unwrap_or_default(), type_name)?;

        let storage_code = child_text(node, "storagetype").unwrap_or("normal");
        let storage_type = StorageType::from_code(storage_code).ok_or_else(|| ValueError::Xml {
            reason: format!("unknown storage type '{storage_code}'"),
        })?;
        meta.set_storage_type(storage_type);

        let length = child_int(node, "length", -1)?;
        let precision = child_int(node, "precision", -1)?;
        meta.set_length_and_precision(length, precision);
        meta.set_origin(child_string(node, "origin"));
        meta.set_comments(child_string(node, "comments"));
        meta.set_conversion_mask(child_string(node, "conversion_Mask"));
        meta.set_decimal_symbol(child_string(node, "decimal_symbol"));
        meta.set_grouping_symbol(child_string(node, "grouping_symbol"));
        meta.set_currency_symbol(child_string(node, "currency_symbol"));
        meta.set_trim_type(TrimType::from_code(child_text(node, "trim_type").unwrap_or("none")));
        meta.set_case_insensitive(child_flag(node, "case_insensitive"));
        meta.set_collator_locale(child_string(node, "collator_locale"));
        meta.set_collator_disabled(child_flag(node, "collator_disabled"));
        meta.set_collator_strength(child_int(node, "collator_strength", 0)?);
        meta.set_sorted_descending(child_flag(node, "sort_descending"));
        meta.set_output_padding(child_flag(node, "output_padding"));
        meta.set_date_format_lenient(child_flag(node, "date_format_lenient"));
        meta.set_date_format_locale(child_string(node, "date_format_locale"));
        meta.set_date_format_time_zone(child_string(node, "date_format_timezone"));
        meta.set_lenient_string_to_number(child_flag(node, "lenient_string_to_number"));

        match storage_type {
            StorageType::Indexed => {
                if let Some(index) = child(node, "index") {
                    let mut entries = Vec::new();
                    for value in index.children().filter(|c| c.has_tag_name("value")) {
                        entries.push(match value.text().filter(|t| !t.is_empty()) {
                            Some(text) => meta.native_from_xml_text(text)?,
                            None => None,
                        });
                    }
                    meta.set_index(Some(entries))?;
                }
            }
            StorageType::BinaryString => {
                if let Some(nested) = child(node, "storage-meta").and_then(|s| child(s, META_TAG)) {
                    meta.set_storage_metadata(Some(self.meta_from_node(nested)?))?;
                }
            }
            StorageType::Normal => {}
        }
        Ok(meta)
    }
}
