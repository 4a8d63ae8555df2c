use thiserror::Error;

use crate::types::LogicalType;

pub type ValueResult<T> = Result<T, ValueError>;

/// Every failure the value layer reports.
///
/// `signature` is the rendered descriptor (`name Type(len, prec)<storage>`)
/// and `value` the textual form of the offending value.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("{signature}: unable to parse '{value}' at offset {offset}: {reason}")]
    Parse {
        signature: String,
        value: String,
        offset: usize,
        reason: String,
    },

    #[error("{signature}: no conversion from '{value}' to {target}")]
    UnsupportedConversion {
        signature: String,
        value: String,
        target: LogicalType,
    },

    #[error("{signature}: invalid format mask '{mask}': {reason}")]
    Mask {
        signature: String,
        mask: String,
        reason: String,
    },

    #[error("{signature}: storage type error ({reason})")]
    StorageType { signature: String, reason: String },

    #[error("{signature}: corrupted stream ({reason})")]
    StreamCorruption { signature: String, reason: String },

    #[error("end of stream")]
    EndOfStream,

    #[error("{signature}: unsupported character encoding '{encoding}'")]
    Encoding { signature: String, encoding: String },

    #[error("{signature}: timed out waiting for stream data")]
    Timeout { signature: String },

    #[error("{signature}: I/O error: {source}")]
    Io {
        signature: String,
        #[source]
        source: std::io::Error,
    },

    #[error("XML error: {reason}")]
    Xml { reason: String },

    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl ValueError {
    /// Clean end of a record stream; callers treat it as "no more rows".
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ValueError::EndOfStream)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ValueError::Timeout { .. })
    }

    /// Offset for parse failures, `None` otherwise.
    pub fn parse_offset(&self) -> Option<usize> {
        match self {
            ValueError::Parse { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for ValueError {
    fn from(err: roxmltree::Error) -> Self {
        ValueError::Xml {
            reason: err.to_string(),
        }
    }
}
