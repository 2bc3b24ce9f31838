//! Motion-capture sequence asset, deliberately kept as an opaque blob.
//!
//! The capture payload has no public layout; the codec's only job is to
//! carry the bytes through a round trip untouched.

use crate::error::Result;
use crate::io::{EndianReader, EndianWriter};

use super::dir::{DirectoryMeta, Entry};
use super::object::{read_end_marker, write_end_marker, ObjectCodec};

/// An undecoded motion-capture sequence.
///
/// The revision pair is carried for entry metadata only; it never reaches
/// the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DancerSequence {
    pub revision: u16,
    pub alt_revision: u16,
    pub data: Vec<u8>,
}

impl DancerSequence {
    /// Create an empty sequence at the given revision.
    pub fn new(revision: u16, alt_revision: u16) -> DancerSequence {
        DancerSequence {
            revision,
            alt_revision,
            data: Vec::new(),
        }
    }
}

impl ObjectCodec for DancerSequence {
    const TYPE_NAME: &'static str = "DancerSequence";

    fn read(
        r: &mut EndianReader,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        _entry: Option<&Entry>,
    ) -> Result<DancerSequence> {
        let mut seq = DancerSequence::new(28, 0);
        if standalone {
            // everything up to the trailing sentinel is capture data
            let remaining = r.remaining() as usize;
            let body = remaining.saturating_sub(4);
            seq.data = r.read_block(body)?;
            read_end_marker(r)?;
        } else {
            seq.data = r.read_to_end();
        }
        Ok(seq)
    }

    fn write(
        &self,
        w: &mut EndianWriter,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        _entry: Option<&Entry>,
    ) -> Result<()> {
        w.write_block(&self.data)?;
        if standalone {
            write_end_marker(w)?;
        }
        Ok(())
    }
}
