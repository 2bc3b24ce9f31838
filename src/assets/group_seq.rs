//! Audio group sequence: a sequence which plays other sequences, referenced
//! by name.

use crate::error::{MiloError, Result};
use crate::io::{EndianReader, EndianWriter};
use crate::types::{read_revision, write_revision, Symbol};

use super::dir::{DirectoryMeta, Entry};
use super::object::{ensure_revision, read_end_marker, write_end_marker, ObjectCodec};

const MAX_REVISION: u16 = 2;
const SEQUENCE_MAX_REVISION: u16 = 1;

/// Upper bound on the declared child count.
pub const MAX_CHILDREN: u32 = 0x1000;

/// Playback parameters shared by every sequence kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub revision: u16,
    pub alt_revision: u16,
    pub volume: f32,
    pub pan: f32,
    pub transpose: f32,
    pub can_stop: bool,
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence {
            revision: SEQUENCE_MAX_REVISION,
            alt_revision: 0,
            volume: 1.0,
            pan: 0.0,
            transpose: 0.0,
            can_stop: true,
        }
    }
}

impl Sequence {
    fn read(r: &mut EndianReader) -> Result<Sequence> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision("Sequence", revision, SEQUENCE_MAX_REVISION)?;
        let volume = r.read_f32()?;
        let pan = r.read_f32()?;
        let transpose = r.read_f32()?;
        let can_stop = if revision >= 1 { r.read_bool()? } else { true };
        Ok(Sequence {
            revision,
            alt_revision,
            volume,
            pan,
            transpose,
            can_stop,
        })
    }

    fn write(&self, w: &mut EndianWriter) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;
        w.write_f32(self.volume)?;
        w.write_f32(self.pan)?;
        w.write_f32(self.transpose)?;
        if self.revision >= 1 {
            w.write_bool(self.can_stop)?;
        }
        Ok(())
    }
}

/// A sequence which plays other sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSeq {
    pub revision: u16,
    pub alt_revision: u16,
    pub seq: Sequence,
    /// The children of this sequence.
    pub children: Vec<Symbol>,
}

impl GroupSeq {
    /// Create an empty group at the given revision.
    pub fn new(revision: u16, alt_revision: u16) -> GroupSeq {
        GroupSeq {
            revision,
            alt_revision,
            seq: Sequence::default(),
            children: Vec::new(),
        }
    }
}

impl ObjectCodec for GroupSeq {
    const TYPE_NAME: &'static str = "GroupSeq";

    fn read(
        r: &mut EndianReader,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        _entry: Option<&Entry>,
    ) -> Result<GroupSeq> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision(Self::TYPE_NAME, revision, MAX_REVISION)?;

        let mut group = GroupSeq::new(revision, alt_revision);

        if revision > 1 {
            group.seq = Sequence::read(r)?;

            let child_count = r.read_u32()?;
            if child_count > MAX_CHILDREN {
                return Err(MiloError::InvalidData(format!(
                    "sequence child count {child_count} exceeds maximum of {MAX_CHILDREN}"
                )));
            }
            for _ in 0..child_count {
                group.children.push(Symbol::read(r)?);
            }
        }

        if standalone {
            read_end_marker(r)?;
        }

        Ok(group)
    }

    fn write(
        &self,
        w: &mut EndianWriter,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        _entry: Option<&Entry>,
    ) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;

        if self.revision > 1 {
            self.seq.write(w)?;

            w.write_u32(self.children.len() as u32)?;
            for child in &self.children {
                child.write(w)?;
            }
        }

        if standalone {
            write_end_marker(w)?;
        }

        Ok(())
    }
}
