//! Stream byte-order selector.

use std::fmt;

/// Byte order of multi-byte primitives in an archive stream.
///
/// Fixed at stream construction; PC-era archives are little-endian,
/// console-era archives big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    Big,
}

impl Default for Endian {
    fn default() -> Self {
        Endian::Little
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => write!(f, "little-endian"),
            Endian::Big => write!(f, "big-endian"),
        }
    }
}
