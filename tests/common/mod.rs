//! Shared builders and helpers for the integration suites.

#![allow(dead_code)]

use milorust::assets::{HairPoint, HairStrand};
use milorust::{
    new_asset, CharHair, DirectoryMeta, Endian, EndianReader, EndianWriter, HmxColor4,
    NotificationCollection, Symbol, Vector3,
};

/// Hair object at revision 10 with two strands of one point each: the
/// canonical fixture for serialization passes.
pub fn hair_rev10_two_strands() -> CharHair {
    let mut hair = CharHair::new(10, 0);
    hair.stiffness = 0.4;
    hair.torsion = 0.1;
    hair.gravity = 1.0;
    hair.weight = 1.0;
    hair.simulate = true;
    for (index, bone) in ["bone_hair_a", "bone_hair_b"].iter().enumerate() {
        hair.strands.push(HairStrand {
            root: Symbol::new(format!("strand{index}")),
            angle: index as f32,
            points: vec![HairPoint {
                pos: Vector3::new(0.0, 1.0 + index as f32, 0.0),
                bone: Symbol::new(*bone),
                length: 2.0,
                radius: 0.05,
                outer_radius: 0.1,
                side_length: 0.2,
                ..HairPoint::default()
            }],
            hookup_flags: 1,
            ..HairStrand::default()
        });
    }
    hair
}

/// A root directory holding a hair entry and a palette entry.
pub fn sample_dir() -> DirectoryMeta {
    let mut dir = DirectoryMeta::new("ObjectDir", "root", 2, 0).unwrap();

    let mut hair_entry = new_asset("CharHair", "hair01", 10, 0).unwrap();
    hair_entry.obj = Some(milorust::Asset::CharHair(hair_rev10_two_strands()));
    dir.entries.push(hair_entry);

    let mut palette_entry = new_asset("ColorPalette", "skin_tones", 1, 0).unwrap();
    if let Some(milorust::Asset::ColorPalette(p)) = &mut palette_entry.obj {
        p.colors.push(HmxColor4::new(0.8, 0.6, 0.5, 1.0));
        p.colors.push(HmxColor4::new(0.4, 0.3, 0.2, 1.0));
    }
    dir.entries.push(palette_entry);

    dir
}

/// Serialize a directory as a standalone top-level asset.
pub fn write_standalone(dir: &DirectoryMeta, endian: Endian) -> Vec<u8> {
    let mut w = EndianWriter::new(endian);
    dir.write(&mut w, true, None, None).unwrap();
    w.into_inner()
}

/// Read a standalone directory, returning the tree and its notifications.
pub fn read_standalone(bytes: &[u8], endian: Endian) -> (DirectoryMeta, NotificationCollection) {
    let mut notes = NotificationCollection::new();
    let mut r = EndianReader::from_slice(bytes, endian);
    let dir = DirectoryMeta::read(&mut r, true, None, None, &mut notes).unwrap();
    assert_eq!(r.remaining(), 0, "standalone read left trailing bytes");
    (dir, notes)
}
