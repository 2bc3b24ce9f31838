//! Interned-string value type used pervasively as object names, type tags,
//! and cross-references.
//!
//! Wire encoding: u32 byte length + raw text bytes.  The engine's text
//! encoding is 8-bit WINDOWS-1252, decoded through `encoding_rs` so that
//! accented characters in asset names survive a round trip.

use std::fmt;

use encoding_rs::WINDOWS_1252;

use crate::error::{MiloError, Result};
use crate::io::{EndianReader, EndianWriter};

/// Longest symbol the codec will accept; a larger declared length is a
/// corrupt stream, rejected before allocation.
pub const MAX_SYMBOL_LEN: usize = 0x800;

/// An immutable string value.
///
/// Two symbols are equal iff their text is equal, which makes them usable
/// as map keys with no reference semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol from text.
    pub fn new(text: impl Into<String>) -> Self {
        Symbol(text.into())
    }

    /// The symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the text in characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the symbol is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a length-prefixed symbol from the stream.
    pub fn read(r: &mut EndianReader) -> Result<Symbol> {
        let length = r.read_u32()? as usize;
        if length > MAX_SYMBOL_LEN {
            return Err(MiloError::InvalidData(format!(
                "symbol length {length} exceeds maximum of {MAX_SYMBOL_LEN}"
            )));
        }
        let bytes = r.read_block(length)?;
        let (text, _, _) = WINDOWS_1252.decode(&bytes);
        Ok(Symbol(text.into_owned()))
    }

    /// Write the symbol as a length prefix plus raw text bytes.
    pub fn write(&self, w: &mut EndianWriter) -> Result<()> {
        let (bytes, _, _) = WINDOWS_1252.encode(&self.0);
        w.write_u32(bytes.len() as u32)?;
        w.write_block(&bytes)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
