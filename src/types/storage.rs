//! Physical storage representations and trim modes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageType {
    /// The raw value is the native value.
    #[default]
    Normal,
    /// The raw value is the encoded bytes of the string form.
    BinaryString,
    /// The raw value is a code into the descriptor's dictionary.
    Indexed,
}

impl StorageType {
    pub fn id(self) -> i32 {
        match self {
            StorageType::Normal => 0,
            StorageType::BinaryString => 1,
            StorageType::Indexed => 2,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(StorageType::Normal),
            1 => Some(StorageType::BinaryString),
            2 => Some(StorageType::Indexed),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            StorageType::Normal => "normal",
            StorageType::BinaryString => "binary-string",
            StorageType::Indexed => "indexed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        [
            StorageType::Normal,
            StorageType::BinaryString,
            StorageType::Indexed,
        ]
        .into_iter()
        .find(|s| s.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrimType {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl TrimType {
    pub fn id(self) -> i32 {
        match self {
            TrimType::None => 0,
            TrimType::Left => 1,
            TrimType::Right => 2,
            TrimType::Both => 3,
        }
    }

    /// Unknown ids fall back to `None`.
    pub fn from_id(id: i32) -> Self {
        match id {
            1 => TrimType::Left,
            2 => TrimType::Right,
            3 => TrimType::Both,
            _ => TrimType::None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            TrimType::None => "none",
            TrimType::Left => "left",
            TrimType::Right => "right",
            TrimType::Both => "both",
        }
    }

    /// Unknown codes fall back to `None`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "left" => TrimType::Left,
            "right" => TrimType::Right,
            "both" => TrimType::Both,
            _ => TrimType::None,
        }
    }

    /// Strips whitespace on the configured sides.
    pub fn apply(self, s: &str) -> &str {
        match self {
            TrimType::None => s,
            TrimType::Left => s.trim_start(),
            TrimType::Right => s.trim_end(),
            TrimType::Both => s.trim(),
        }
    }
}
