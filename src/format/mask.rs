//! Effective mask resolution.
//!
//! Priority: an explicit mask, then a built-in default when the length is
//! unusable, then a mask synthesized from length and precision.

use crate::config::EngineConfig;
use crate::types::LogicalType;

/// Inputs the resolver needs from a descriptor.
#[derive(Debug, Clone, Copy)]
pub struct MaskContext<'a> {
    pub explicit: Option<&'a str>,
    pub descriptor_type: LogicalType,
    pub length: i32,
    pub precision: i32,
}

/// Mask used when `ctx`'s descriptor formats or parses a value of `requested`.
///
/// String descriptors use the parse-side defaults so that text produced
/// elsewhere reads back without a length-derived mask.
pub fn resolve_mask(ctx: MaskContext<'_>, requested: LogicalType, config: &EngineConfig) -> Option<String> {
    if let Some(mask) = ctx.explicit.filter(|m| !m.is_empty()) {
        return Some(mask.to_string());
    }

    if ctx.descriptor_type == LogicalType::String {
        return config.parse_mask(requested).map(str::to_string);
    }

    let unusable_length = ctx.length < 1;
    match requested {
        LogicalType::Integer if !unusable_length => Some(synthesize_integer_mask(ctx.length)),
        LogicalType::Number | LogicalType::BigNumber if !unusable_length => {
            Some(synthesize_number_mask(ctx.length, ctx.precision))
        }
        other => config.format_mask(other).map(str::to_string),
    }
}

/// `length` zero digits, mirrored with a `-` prefix for negatives.
///
/// The leading blank in the positive clause lines up with the minus sign.
pub fn synthesize_integer_mask(length: i32) -> String {
    let zeros = "0".repeat(length.max(0) as usize);
    format!(" {zeros};-{zeros}")
}

/// `length + 1` zero digits with the decimal point placed at
/// `length - precision + 1`; a negative precision means two default decimals.
pub fn synthesize_number_mask(length: i32, precision: i32) -> String {
    let length = length.max(0) as usize;

    let mut positive: Vec<char> = Vec::with_capacity(length + 4);
    positive.push(' ');
    if precision < 0 {
        positive.extend(std::iter::repeat_n('0', length));
        positive.extend(".00".chars());
    } else {
        positive.extend(std::iter::repeat_n('0', length + 1));
        let point = length as i64 - i64::from(precision) + 1;
        if point >= 0 && (point as usize) < positive.len() {
            positive[point as usize] = '.';
        }
    }

    let mut negative = positive.clone();
    negative[0] = '-';

    let positive: String = positive.into_iter().collect();
    let negative: String = negative.into_iter().collect();
    format!("{positive};{negative}")
}
