//! Type-name dispatch table.
//!
//! The original engine resolved codecs by reflecting over class metadata;
//! here the mapping is an explicit table built once at process start.  Each
//! row carries the read and construct hooks for one wire type name plus the
//! structural facts the container needs (directory or leaf, inline
//! subdirectory support).

use ahash::RandomState;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::error::{MiloError, Result};
use crate::io::EndianReader;

use super::char_hair::CharHair;
use super::color_palette::ColorPalette;
use super::dancer_sequence::DancerSequence;
use super::dir::{DirectoryMeta, Entry};
use super::group_seq::GroupSeq;
use super::object::ObjectCodec;
use super::Asset;

type ReadFn = fn(&mut EndianReader, Option<&DirectoryMeta>, Option<&Entry>) -> Result<Asset>;
type NewFn = fn(u16, u16) -> Asset;

/// One registry row.
pub struct CodecInfo {
    /// Whether the type is a directory kind.
    pub is_dir: bool,
    /// Whether the directory kind carries the inline subdirectory block.
    pub inline_sub_dirs: bool,
    /// Revision pair used when no explicit one is requested.
    pub default_revision: (u16, u16),
    read: Option<ReadFn>,
    new_obj: Option<NewFn>,
}

fn read_char_hair(
    r: &mut EndianReader,
    parent: Option<&DirectoryMeta>,
    entry: Option<&Entry>,
) -> Result<Asset> {
    CharHair::read(r, false, parent, entry).map(Asset::CharHair)
}

fn read_color_palette(
    r: &mut EndianReader,
    parent: Option<&DirectoryMeta>,
    entry: Option<&Entry>,
) -> Result<Asset> {
    ColorPalette::read(r, false, parent, entry).map(Asset::ColorPalette)
}

fn read_dancer_sequence(
    r: &mut EndianReader,
    parent: Option<&DirectoryMeta>,
    entry: Option<&Entry>,
) -> Result<Asset> {
    DancerSequence::read(r, false, parent, entry).map(Asset::DancerSequence)
}

fn read_group_seq(
    r: &mut EndianReader,
    parent: Option<&DirectoryMeta>,
    entry: Option<&Entry>,
) -> Result<Asset> {
    GroupSeq::read(r, false, parent, entry).map(Asset::GroupSeq)
}

static REGISTRY: Lazy<IndexMap<&'static str, CodecInfo, RandomState>> = Lazy::new(|| {
    let mut table: IndexMap<&'static str, CodecInfo, RandomState> =
        IndexMap::with_hasher(RandomState::new());

    table.insert(
        CharHair::TYPE_NAME,
        CodecInfo {
            is_dir: false,
            inline_sub_dirs: false,
            default_revision: (10, 0),
            read: Some(read_char_hair),
            new_obj: Some(|rev, alt| Asset::CharHair(CharHair::new(rev, alt))),
        },
    );
    table.insert(
        ColorPalette::TYPE_NAME,
        CodecInfo {
            is_dir: false,
            inline_sub_dirs: false,
            default_revision: (1, 0),
            read: Some(read_color_palette),
            new_obj: Some(|rev, alt| Asset::ColorPalette(ColorPalette::new(rev, alt))),
        },
    );
    table.insert(
        DancerSequence::TYPE_NAME,
        CodecInfo {
            is_dir: false,
            inline_sub_dirs: false,
            default_revision: (28, 0),
            read: Some(read_dancer_sequence),
            new_obj: Some(|rev, alt| Asset::DancerSequence(DancerSequence::new(rev, alt))),
        },
    );
    table.insert(
        GroupSeq::TYPE_NAME,
        CodecInfo {
            is_dir: false,
            inline_sub_dirs: false,
            default_revision: (2, 0),
            read: Some(read_group_seq),
            new_obj: Some(|rev, alt| Asset::GroupSeq(GroupSeq::new(rev, alt))),
        },
    );
    table.insert(
        "ObjectDir",
        CodecInfo {
            is_dir: true,
            inline_sub_dirs: true,
            default_revision: (2, 0),
            read: None,
            new_obj: None,
        },
    );
    table.insert(
        "RndDir",
        CodecInfo {
            is_dir: true,
            inline_sub_dirs: true,
            default_revision: (10, 0),
            read: None,
            new_obj: None,
        },
    );
    table.insert(
        "MoveDir",
        CodecInfo {
            is_dir: true,
            inline_sub_dirs: false,
            default_revision: (35, 0),
            read: None,
            new_obj: None,
        },
    );

    table
});

/// Look up a registered type.
pub fn lookup(type_name: &str) -> Option<&'static CodecInfo> {
    REGISTRY.get(type_name)
}

/// Whether the name denotes a registered directory kind.
pub fn is_dir_type(type_name: &str) -> bool {
    lookup(type_name).map_or(false, |info| info.is_dir)
}

/// Whether the directory kind carries the inline subdirectory block.
pub fn dir_supports_inline_sub_dirs(type_name: &str) -> bool {
    lookup(type_name).map_or(false, |info| info.inline_sub_dirs)
}

/// All registered type names, in registration order.
pub fn registered_types() -> impl Iterator<Item = &'static str> {
    REGISTRY.keys().copied()
}

/// Decode a leaf asset by type name.
///
/// Returns `Ok(None)` when the name has no leaf codec; the caller keeps the
/// payload opaque.
pub fn read_asset(
    type_name: &str,
    r: &mut EndianReader,
    parent: Option<&DirectoryMeta>,
    entry: Option<&Entry>,
) -> Result<Option<Asset>> {
    match lookup(type_name).and_then(|info| info.read) {
        Some(read) => read(r, parent, entry).map(Some),
        None => Ok(None),
    }
}

/// Construct a default-initialized asset of a named type, wrapped in a
/// fresh entry.
pub fn new_asset(
    type_name: &str,
    name: impl Into<crate::types::Symbol>,
    revision: u16,
    alt_revision: u16,
) -> Result<Entry> {
    let info =
        lookup(type_name).ok_or_else(|| MiloError::UnknownType(type_name.to_string()))?;
    if info.is_dir {
        let dir = DirectoryMeta::new(type_name, name.into(), revision, alt_revision)?;
        let entry_name = dir.name.clone();
        Ok(Entry::new_dir(entry_name, dir))
    } else {
        let new_obj = info
            .new_obj
            .ok_or_else(|| MiloError::UnknownType(type_name.to_string()))?;
        Ok(Entry::new_object(
            type_name,
            name,
            new_obj(revision, alt_revision),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_types() {
        assert!(lookup("CharHair").is_some());
        assert!(lookup("ObjectDir").is_some());
        assert!(lookup("Tex").is_none());
    }

    #[test]
    fn test_dir_classification() {
        assert!(is_dir_type("RndDir"));
        assert!(is_dir_type("MoveDir"));
        assert!(!is_dir_type("CharHair"));
        assert!(!is_dir_type("NoSuchThing"));
    }

    #[test]
    fn test_inline_sub_dir_support() {
        assert!(dir_supports_inline_sub_dirs("ObjectDir"));
        assert!(dir_supports_inline_sub_dirs("RndDir"));
        assert!(!dir_supports_inline_sub_dirs("MoveDir"));
    }

    #[test]
    fn test_registration_order_is_stable() {
        let types: Vec<_> = registered_types().collect();
        assert_eq!(types[0], "CharHair");
        assert!(types.contains(&"MoveDir"));
    }

    #[test]
    fn test_new_asset_leaf_and_dir() {
        let leaf = new_asset("ColorPalette", "palette", 1, 0).unwrap();
        assert!(!leaf.is_dir);
        assert!(leaf.obj.is_some());

        let dir = new_asset("MoveDir", "moves", 35, 0).unwrap();
        assert!(dir.is_dir);
        assert!(dir.dir.is_some());

        assert!(new_asset("Tex", "skin", 1, 0).is_err());
    }
}
