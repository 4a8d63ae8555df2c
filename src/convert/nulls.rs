//! Text ingestion with null tokens.

use crate::error::ValueResult;
use crate::meta::TypeDescriptor;
use crate::types::{LogicalType, RawValue, TrimType};

impl TypeDescriptor {
    /// Converts text read under `source` (a String descriptor describing the
    /// input) into this descriptor's native type.
    ///
    /// Before parsing:
    /// - `if_null` replaces blank input and input matching the null token
    /// - input equal to the null token (case-insensitive, right-padded with
    ///   spaces to the input length) becomes the empty value
    /// - with no null token, all-space input becomes the empty value
    ///
    /// The empty value is `""` for String targets and null otherwise.
    pub fn convert_from_string(
        &self,
        text: Option<&str>,
        source: &TypeDescriptor,
        null_if: Option<&str>,
        if_null: Option<&str>,
        trim: TrimType,
    ) -> ValueResult<RawValue> {
        let null_token = null_if.unwrap_or("");
        let is_string_target = self.logical_type() == LogicalType::String;
        let empty_value = || {
            if is_string_target {
                RawValue::string("")
            } else {
                RawValue::Null
            }
        };

        let mut text: Option<String> = text.map(str::to_string);

        if let Some(replacement) = if_null.filter(|r| !r.is_empty()) {
            let matches_token = text
                .as_deref()
                .is_none_or(|t| t.is_empty() || matches_null_token(t, null_token));
            if matches_token {
                text = Some(replacement.to_string());
            }
        }

        if text.is_none() && is_string_target && self.config.empty_string_differs_from_null {
            text = Some(String::new());
        }

        let Some(text) = text else {
            return Ok(RawValue::Null);
        };
        if text.is_empty() && !is_string_target {
            return Ok(RawValue::Null);
        }

        if null_token.is_empty() {
            if text.chars().all(|c| c == ' ') {
                return Ok(empty_value());
            }
        } else if null_token.chars().count() <= text.chars().count()
            && matches_null_token(&text, null_token)
        {
            return Ok(empty_value());
        }

        let trimmed = match trim {
            TrimType::None => text.as_str(),
            TrimType::Left => text.trim_start_matches(' '),
            TrimType::Right => text.trim_end_matches(' '),
            TrimType::Both => text.trim_matches(' '),
        };

        self.convert_data(source, &RawValue::string(trimmed))
    }

    /// Converts a raw value held under `source` into this descriptor's type,
    /// using `source`'s formatting rules.
    pub fn convert_data(&self, source: &TypeDescriptor, raw: &RawValue) -> ValueResult<RawValue> {
        if self.logical_type() == LogicalType::String {
            return Ok(source.get_string(raw)?.map_or(RawValue::Null, RawValue::string));
        }
        Ok(source.get_as(raw, self.logical_type())?.into())
    }

    /// Converts through the conversion metadata when one is configured.
    pub fn convert_with_conversion_metadata(&self, raw: &RawValue) -> ValueResult<RawValue> {
        match self.conversion_metadata() {
            Some(meta) => self.convert_data(meta, raw),
            None => Ok(raw.clone()),
        }
    }
}

/// Case-insensitive match against the token right-padded with spaces to the
/// length of `text`.
fn matches_null_token(text: &str, token: &str) -> bool {
    let text_len = text.chars().count();
    let token_len = token.chars().count();
    if token_len > text_len {
        return false;
    }
    let padded: String = token
        .chars()
        .chain(std::iter::repeat_n(' ', text_len - token_len))
        .collect();
    text.to_lowercase() == padded.to_lowercase()
}
