//! Character-set bridge for binary-string storage and Binary values.

use encoding_rs::Encoding;

/// Resolves a charset label, accepting a few legacy aliases besides the
/// WHATWG labels (`ISO8859_1`, `Cp1252`, `UTF8`).
pub fn lookup(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    if let Some(enc) = Encoding::for_label(label.as_bytes()) {
        return Some(enc);
    }

    let lower = label.to_ascii_lowercase();
    let alias = if let Some(rest) = lower.strip_prefix("cp") {
        format!("windows-{rest}")
    } else if let Some(rest) = lower.strip_prefix("iso8859_") {
        format!("iso-8859-{rest}")
    } else if lower == "utf8" {
        "utf-8".to_string()
    } else {
        return None;
    };
    Encoding::for_label(alias.as_bytes())
}

/// Decodes without BOM sniffing; malformed sequences become U+FFFD.
pub fn decode(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _had_errors) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Unmappable characters are written as numeric character references.
pub fn encode(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let (bytes, _used, _had_errors) = encoding.encode(text);
    bytes.into_owned()
}

pub fn is_single_byte(encoding: &'static Encoding) -> bool {
    encoding.is_single_byte()
}
