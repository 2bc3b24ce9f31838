//! Render directory extension: tracks the drawable, animatable and
//! transformable facets of a scene directory.

use crate::error::Result;
use crate::io::{EndianReader, EndianWriter};
use crate::types::{read_revision, write_revision, Symbol, Transform};

use super::dir::Entry;
use super::object::ensure_revision;

const MAX_REVISION: u16 = 10;
const ANIM_MAX_REVISION: u16 = 4;
const DRAW_MAX_REVISION: u16 = 3;
const TRANS_MAX_REVISION: u16 = 9;

/// Nested directory entry types that still carry the full render body.
///
/// Every other type name ends the record right after its revision word when
/// read as a nested directory entry.  This is an engine-specific exception
/// list carried over verbatim; do not try to infer a rule from it.
pub const RND_DIR_FULL_BODY_TYPES: [&str; 8] = [
    "Character",
    "RndDir",
    "BandCrowdMeterDir",
    "CrowdMeterIcon",
    "EndingBonusDir",
    "UnisonIcon",
    "BandScoreboard",
    "BandStarDisplay",
];

fn reads_full_body(entry: Option<&Entry>) -> bool {
    match entry {
        Some(e) if e.is_dir => RND_DIR_FULL_BODY_TYPES.contains(&e.entry_type.as_str()),
        _ => true,
    }
}

/// Animation playback facet.
#[derive(Debug, Clone, PartialEq)]
pub struct RndAnimatable {
    pub revision: u16,
    pub alt_revision: u16,
    pub frame: f32,
    pub rate: u32,
}

impl Default for RndAnimatable {
    fn default() -> Self {
        RndAnimatable {
            revision: ANIM_MAX_REVISION,
            alt_revision: 0,
            frame: 0.0,
            rate: 0,
        }
    }
}

impl RndAnimatable {
    fn read(r: &mut EndianReader) -> Result<RndAnimatable> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision("RndAnimatable", revision, ANIM_MAX_REVISION)?;
        let frame = r.read_f32()?;
        let rate = if revision > 1 { r.read_u32()? } else { 0 };
        Ok(RndAnimatable {
            revision,
            alt_revision,
            frame,
            rate,
        })
    }

    fn write(&self, w: &mut EndianWriter) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;
        w.write_f32(self.frame)?;
        if self.revision > 1 {
            w.write_u32(self.rate)?;
        }
        Ok(())
    }
}

/// Draw-visibility facet.
#[derive(Debug, Clone, PartialEq)]
pub struct RndDrawable {
    pub revision: u16,
    pub alt_revision: u16,
    pub showing: bool,
    /// Bounding sphere: center xyz plus radius.
    pub sphere: [f32; 4],
    pub draw_order: f32,
}

impl Default for RndDrawable {
    fn default() -> Self {
        RndDrawable {
            revision: DRAW_MAX_REVISION,
            alt_revision: 0,
            showing: true,
            sphere: [0.0; 4],
            draw_order: 0.0,
        }
    }
}

impl RndDrawable {
    fn read(r: &mut EndianReader) -> Result<RndDrawable> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision("RndDrawable", revision, DRAW_MAX_REVISION)?;
        let showing = r.read_bool()?;
        let mut sphere = [0.0f32; 4];
        if revision > 0 {
            for value in &mut sphere {
                *value = r.read_f32()?;
            }
        }
        let draw_order = if revision > 2 { r.read_f32()? } else { 0.0 };
        Ok(RndDrawable {
            revision,
            alt_revision,
            showing,
            sphere,
            draw_order,
        })
    }

    fn write(&self, w: &mut EndianWriter) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;
        w.write_bool(self.showing)?;
        if self.revision > 0 {
            for value in &self.sphere {
                w.write_f32(*value)?;
            }
        }
        if self.revision > 2 {
            w.write_f32(self.draw_order)?;
        }
        Ok(())
    }
}

/// Spatial transform facet.
#[derive(Debug, Clone, PartialEq)]
pub struct RndTrans {
    pub revision: u16,
    pub alt_revision: u16,
    pub local: Transform,
    pub world: Transform,
    pub constraint: u32,
    pub target: Symbol,
    pub preserve_scale: bool,
    pub parent: Symbol,
}

impl Default for RndTrans {
    fn default() -> Self {
        RndTrans {
            revision: TRANS_MAX_REVISION,
            alt_revision: 0,
            local: Transform::default(),
            world: Transform::default(),
            constraint: 0,
            target: Symbol::default(),
            preserve_scale: false,
            parent: Symbol::default(),
        }
    }
}

impl RndTrans {
    fn read(r: &mut EndianReader) -> Result<RndTrans> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision("RndTrans", revision, TRANS_MAX_REVISION)?;
        let mut trans = RndTrans {
            revision,
            alt_revision,
            local: Transform::read(r)?,
            world: Transform::read(r)?,
            ..RndTrans::default()
        };
        if revision > 6 {
            trans.constraint = r.read_u32()?;
            trans.target = Symbol::read(r)?;
        }
        if revision > 8 {
            trans.preserve_scale = r.read_bool()?;
            trans.parent = Symbol::read(r)?;
        }
        Ok(trans)
    }

    fn write(&self, w: &mut EndianWriter) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;
        self.local.write(w)?;
        self.world.write(w)?;
        if self.revision > 6 {
            w.write_u32(self.constraint)?;
            self.target.write(w)?;
        }
        if self.revision > 8 {
            w.write_bool(self.preserve_scale)?;
            self.parent.write(w)?;
        }
        Ok(())
    }
}

/// The render directory record proper.
#[derive(Debug, Clone, PartialEq)]
pub struct RndDirFields {
    pub revision: u16,
    pub alt_revision: u16,
    pub anim: RndAnimatable,
    pub draw: RndDrawable,
    pub trans: RndTrans,
    pub environ: Symbol,
    pub test_event: Symbol,
    pub unk_symbol1: Symbol,
    pub unk_symbol2: Symbol,
    /// Only present at revision 6; always eight values on the wire.
    pub unknown_floats: Vec<f32>,
}

impl RndDirFields {
    /// Create a default record at the given revision.
    pub fn new(revision: u16, alt_revision: u16) -> RndDirFields {
        RndDirFields {
            revision,
            alt_revision,
            anim: RndAnimatable::default(),
            draw: RndDrawable::default(),
            trans: RndTrans::default(),
            environ: Symbol::default(),
            test_event: Symbol::default(),
            unk_symbol1: Symbol::default(),
            unk_symbol2: Symbol::default(),
            unknown_floats: Vec::new(),
        }
    }

    /// Read the record, honoring the nested-entry early exit.
    pub fn read(r: &mut EndianReader, entry: Option<&Entry>) -> Result<RndDirFields> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision("RndDir", revision, MAX_REVISION)?;

        let mut fields = RndDirFields::new(revision, alt_revision);

        if !reads_full_body(entry) {
            return Ok(fields);
        }

        fields.anim = RndAnimatable::read(r)?;
        fields.draw = RndDrawable::read(r)?;
        fields.trans = RndTrans::read(r)?;

        if revision < 9 {
            // the pollable facet of this era contributes no bytes
            fields.unk_symbol1 = Symbol::read(r)?;
            fields.unk_symbol2 = Symbol::read(r)?;
        } else {
            fields.environ = Symbol::read(r)?;
            if revision >= 10 {
                fields.test_event = Symbol::read(r)?;
            }
        }

        if revision == 6 {
            for _ in 0..8 {
                fields.unknown_floats.push(r.read_f32()?);
            }
        }

        Ok(fields)
    }

    /// Write the record, honoring the same early exit as `read`.
    pub fn write(&self, w: &mut EndianWriter, entry: Option<&Entry>) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;

        if !reads_full_body(entry) {
            return Ok(());
        }

        self.anim.write(w)?;
        self.draw.write(w)?;
        self.trans.write(w)?;

        if self.revision < 9 {
            self.unk_symbol1.write(w)?;
            self.unk_symbol2.write(w)?;
        } else {
            self.environ.write(w)?;
            if self.revision >= 10 {
                self.test_event.write(w)?;
            }
        }

        if self.revision == 6 {
            for i in 0..8 {
                w.write_f32(self.unknown_floats.get(i).copied().unwrap_or(0.0))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Endian;

    fn roundtrip(fields: &RndDirFields, entry: Option<&Entry>) -> RndDirFields {
        let mut w = EndianWriter::new(Endian::Big);
        fields.write(&mut w, entry).unwrap();
        let mut r = EndianReader::new(w.into_inner(), Endian::Big);
        let back = RndDirFields::read(&mut r, entry).unwrap();
        assert_eq!(r.remaining(), 0);
        back
    }

    #[test]
    fn test_rev10_full_body_roundtrip() {
        let mut fields = RndDirFields::new(10, 0);
        fields.environ = Symbol::new("environ01");
        fields.test_event = Symbol::new("test_start");
        fields.anim.frame = 12.0;
        assert_eq!(roundtrip(&fields, None), fields);
    }

    #[test]
    fn test_rev6_eight_float_block() {
        let mut fields = RndDirFields::new(6, 0);
        fields.unk_symbol1 = Symbol::new("a");
        fields.unk_symbol2 = Symbol::new("b");
        fields.unknown_floats = (0..8).map(|i| i as f32).collect();
        assert_eq!(roundtrip(&fields, None), fields);
    }

    #[test]
    fn test_nested_entry_early_exit() {
        let entry = Entry {
            entry_type: Symbol::new("PanelDir"),
            name: Symbol::new("panel"),
            is_dir: true,
            is_proxy: false,
            obj_bytes: Vec::new(),
            obj: None,
            dir: None,
        };
        let fields = RndDirFields::new(10, 0);
        let mut w = EndianWriter::new(Endian::Little);
        fields.write(&mut w, Some(&entry)).unwrap();
        // only the revision word
        assert_eq!(w.len(), 4);
        assert_eq!(roundtrip(&fields, Some(&entry)), fields);
    }

    #[test]
    fn test_exempted_type_keeps_full_body() {
        let entry = Entry {
            entry_type: Symbol::new("BandScoreboard"),
            name: Symbol::new("scoreboard"),
            is_dir: true,
            is_proxy: false,
            obj_bytes: Vec::new(),
            obj: None,
            dir: None,
        };
        let fields = RndDirFields::new(9, 0);
        let mut w = EndianWriter::new(Endian::Little);
        fields.write(&mut w, Some(&entry)).unwrap();
        assert!(w.len() > 4);
    }
}
