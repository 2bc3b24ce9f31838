//! Asset codecs: the directory container, the object protocol, the type
//! registry, and every concrete asset record.

pub mod char_hair;
pub mod color_palette;
pub mod dancer_sequence;
pub mod dir;
pub mod group_seq;
pub mod merge;
pub mod move_dir;
pub mod object;
pub mod registry;
pub mod replace;
pub mod rnd_dir;

pub use char_hair::{CharHair, HairPoint, HairStrand};
pub use color_palette::ColorPalette;
pub use dancer_sequence::DancerSequence;
pub use dir::{DirFlags, DirKind, DirectoryMeta, Entry, EntryFlags, ReferenceType};
pub use group_seq::{GroupSeq, Sequence};
pub use merge::{AlwaysOverwrite, MergeChoice, MergePolicy, NeverOverwrite};
pub use move_dir::{MoveDirFields, SkeletonDirFields};
pub use object::{ObjectCodec, ObjectFields, END_MARKER_BYTES};
pub use registry::new_asset;
pub use replace::replace_entry;
pub use rnd_dir::{RndAnimatable, RndDirFields, RndDrawable, RndTrans};

use crate::error::Result;
use crate::io::EndianWriter;

/// A parsed leaf asset: the closed union of every non-directory type the
/// registry knows.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    CharHair(CharHair),
    ColorPalette(ColorPalette),
    DancerSequence(DancerSequence),
    GroupSeq(GroupSeq),
}

impl Asset {
    /// The wire type name of the contained asset.
    pub fn type_name(&self) -> &'static str {
        match self {
            Asset::CharHair(_) => CharHair::TYPE_NAME,
            Asset::ColorPalette(_) => ColorPalette::TYPE_NAME,
            Asset::DancerSequence(_) => DancerSequence::TYPE_NAME,
            Asset::GroupSeq(_) => GroupSeq::TYPE_NAME,
        }
    }

    /// The asset's current revision.
    pub fn revision(&self) -> u16 {
        match self {
            Asset::CharHair(a) => a.revision,
            Asset::ColorPalette(a) => a.revision,
            Asset::DancerSequence(a) => a.revision,
            Asset::GroupSeq(a) => a.revision,
        }
    }

    /// Serialize the contained asset.
    pub fn write(
        &self,
        w: &mut EndianWriter,
        standalone: bool,
        parent: Option<&DirectoryMeta>,
        entry: Option<&Entry>,
    ) -> Result<()> {
        match self {
            Asset::CharHair(a) => a.write(w, standalone, parent, entry),
            Asset::ColorPalette(a) => a.write(w, standalone, parent, entry),
            Asset::DancerSequence(a) => a.write(w, standalone, parent, entry),
            Asset::GroupSeq(a) => a.write(w, standalone, parent, entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_dispatch() {
        let asset = Asset::ColorPalette(ColorPalette::new(1, 0));
        assert_eq!(asset.type_name(), "ColorPalette");
        assert_eq!(asset.revision(), 1);
    }
}
