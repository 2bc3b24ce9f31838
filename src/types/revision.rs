//! Packing of the per-object revision pair into its 32-bit wire word.
//!
//! Every object starts with one 32-bit word holding two 16-bit version
//! numbers.  Which half holds `revision` is decided by the *host platform*
//! byte order, not the stream byte order: the half that lands at the low
//! memory address on a little-endian host is `revision`, and the reverse on
//! a big-endian host.  The word itself is then written with the stream's
//! declared endianness like any other u32.

use crate::error::Result;
use crate::io::{EndianReader, EndianWriter};

/// Pack `(revision, alt_revision)` into the combined wire word.
pub fn pack_revision(revision: u16, alt_revision: u16) -> u32 {
    if cfg!(target_endian = "little") {
        ((alt_revision as u32) << 16) | revision as u32
    } else {
        ((revision as u32) << 16) | alt_revision as u32
    }
}

/// Unpack the combined wire word into `(revision, alt_revision)`.
pub fn unpack_revision(word: u32) -> (u16, u16) {
    let low = (word & 0xFFFF) as u16;
    let high = (word >> 16) as u16;
    if cfg!(target_endian = "little") {
        (low, high)
    } else {
        (high, low)
    }
}

/// Read and unpack a revision word from the stream.
pub fn read_revision(r: &mut EndianReader) -> Result<(u16, u16)> {
    Ok(unpack_revision(r.read_u32()?))
}

/// Pack and write a revision word to the stream.
pub fn write_revision(w: &mut EndianWriter, revision: u16, alt_revision: u16) -> Result<()> {
    w.write_u32(pack_revision(revision, alt_revision))
}
