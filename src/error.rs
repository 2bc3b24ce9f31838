//! Error types for the milorust library

use std::io;
use thiserror::Error;

/// Main error type for milorust operations
#[derive(Debug, Error)]
pub enum MiloError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Stream exhausted before the expected fields were consumed
    #[error("Truncated data: needed {needed} bytes, {remaining} remaining")]
    TruncatedData { needed: usize, remaining: usize },

    /// Sanity-check failure (implausible count, bad flag byte, malformed header)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A revision value outside every modeled range for the type
    #[error("Unsupported {type_name} revision: {revision}")]
    UnsupportedRevision {
        type_name: &'static str,
        revision: u16,
    },

    /// The standalone end marker was absent or mismatched
    #[error("Missing end marker: expected AD DE AD DE, found {found:#010X}")]
    MissingEndMarker { found: u32 },

    /// A type name with no registered codec where one is required
    #[error("Unknown asset type: {0}")]
    UnknownType(String),

    /// A replace transaction failed and the prior state was restored
    #[error("Replace rolled back: {source}")]
    ReplaceRolledBack {
        #[source]
        source: Box<MiloError>,
    },

    /// Error during block compression/decompression
    #[error("Compression error: {0}")]
    Compression(String),
}

/// Result type alias for milorust operations
pub type Result<T> = std::result::Result<T, MiloError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_revision_display() {
        let err = MiloError::UnsupportedRevision {
            type_name: "CharHair",
            revision: 99,
        };
        assert_eq!(err.to_string(), "Unsupported CharHair revision: 99");
    }

    #[test]
    fn test_missing_end_marker_display() {
        let err = MiloError::MissingEndMarker { found: 0xDEADBEEF };
        assert!(err.to_string().contains("0xDEADBEEF"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let milo_err: MiloError = io_err.into();
        assert!(matches!(milo_err, MiloError::Io(_)));
    }

    #[test]
    fn test_rolled_back_wraps_source() {
        let err = MiloError::ReplaceRolledBack {
            source: Box::new(MiloError::InvalidData("bad count".to_string())),
        };
        assert!(err.to_string().contains("bad count"));
    }
}
