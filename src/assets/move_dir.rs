//! Move directory extension: debugging metadata layered over a skeleton
//! directory.
//!
//! The body depends on how the directory is referenced: a regular entry
//! carries four counters, a proxy reference carries reserved zero blocks
//! instead.

use crate::error::Result;
use crate::io::{EndianReader, EndianWriter};
use crate::types::{read_revision, write_revision};

use super::dir::Entry;
use super::object::ensure_revision;

const MAX_REVISION: u16 = 35;
const SKELETON_MAX_REVISION: u16 = 6;

/// Fixed tag block written into the reserved tail from revision 34 on:
/// a length-prefixed ASCII "ham2".
pub const MOVE_DIR_TAG: [u8; 5] = [0x04, 0x68, 0x61, 0x6D, 0x32];

/// Skeleton directory record; nothing beyond its revision word has ever
/// been observed on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonDirFields {
    pub revision: u16,
    pub alt_revision: u16,
}

impl Default for SkeletonDirFields {
    fn default() -> Self {
        SkeletonDirFields {
            revision: SKELETON_MAX_REVISION,
            alt_revision: 0,
        }
    }
}

impl SkeletonDirFields {
    fn read(r: &mut EndianReader) -> Result<SkeletonDirFields> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision("SkeletonDir", revision, SKELETON_MAX_REVISION)?;
        Ok(SkeletonDirFields {
            revision,
            alt_revision,
        })
    }

    fn write(&self, w: &mut EndianWriter) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)
    }
}

/// The move directory record proper.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDirFields {
    pub revision: u16,
    pub alt_revision: u16,
    pub skeleton: SkeletonDirFields,
    pub unk_int1: u32,
    pub unk_int2: u32,
    pub unk_int3: u32,
    pub unk_int4: u32,
}

impl MoveDirFields {
    /// Create a default record at the given revision.
    pub fn new(revision: u16, alt_revision: u16) -> MoveDirFields {
        MoveDirFields {
            revision,
            alt_revision,
            skeleton: SkeletonDirFields::default(),
            unk_int1: 0,
            unk_int2: 0,
            unk_int3: 0,
            unk_int4: 0,
        }
    }

    fn is_proxy_form(entry: Option<&Entry>) -> bool {
        !matches!(entry, Some(e) if !e.is_proxy)
    }

    /// Read the record; the entry decides between counter and proxy forms.
    pub fn read(r: &mut EndianReader, entry: Option<&Entry>) -> Result<MoveDirFields> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision("MoveDir", revision, MAX_REVISION)?;

        let mut fields = MoveDirFields::new(revision, alt_revision);
        fields.skeleton = SkeletonDirFields::read(r)?;

        if Self::is_proxy_form(entry) {
            // reserved; always observed empty
            r.read_block(13)?;
            if revision == 34 {
                r.read_block(12)?;
            }
        } else {
            fields.unk_int1 = r.read_u32()?;
            fields.unk_int2 = r.read_u32()?;
            fields.unk_int3 = r.read_u32()?;
            fields.unk_int4 = r.read_u32()?;
        }

        if revision >= 34 {
            r.read_block(5)?;
        }

        Ok(fields)
    }

    /// Write the record in the same form `read` would consume.
    pub fn write(&self, w: &mut EndianWriter, entry: Option<&Entry>) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;
        self.skeleton.write(w)?;

        if Self::is_proxy_form(entry) {
            w.write_block(&[0u8; 13])?;
            if self.revision == 34 {
                w.write_block(&[0u8; 12])?;
            }
        } else {
            w.write_u32(self.unk_int1)?;
            w.write_u32(self.unk_int2)?;
            w.write_u32(self.unk_int3)?;
            w.write_u32(self.unk_int4)?;
        }

        if self.revision >= 34 {
            w.write_block(&MOVE_DIR_TAG)?;
        }

        Ok(())
    }
}
