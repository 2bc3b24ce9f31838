//! Hair physics asset: strands of simulated hair, each a chain of points
//! anchored to a bone.
//!
//! The point layout changed in nearly every engine revision; the gate rules
//! below are a field-by-field port of that history and must not be
//! "simplified" — each branch is load-bearing for byte fidelity.

use crate::error::{MiloError, Result};
use crate::io::{EndianReader, EndianWriter};
use crate::types::{read_revision, write_revision, Matrix3, Symbol, Vector3};

use super::dir::{DirectoryMeta, Entry};
use super::object::{
    ensure_revision, read_end_marker, write_end_marker, ObjectCodec, ObjectFields,
};

const MAX_REVISION: u16 = 11;

/// Upper bound on the declared strand count; anything higher is corrupt.
pub const MAX_STRANDS: u32 = 0x1000;
/// Upper bound on the declared per-strand point count.
pub const MAX_POINTS: u32 = 0x1000;

/// One simulated point along a strand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HairPoint {
    pub pos: Vector3,
    pub bone: Symbol,
    pub length: f32,
    pub radius: f32,
    pub outer_radius: f32,
    pub side_length: f32,
    pub add_to_radius: f32,
    pub unk_int1: i32,
    pub unk_int2: i32,
    pub unk_int3: i32,
    pub unk_sym: Symbol,
    pub unk_sym2: Symbol,
    pub unk_bool: bool,
    pub unk_5c: Vector3,
}

impl HairPoint {
    fn read(r: &mut EndianReader, revision: u16) -> Result<HairPoint> {
        let mut point = HairPoint {
            pos: Vector3::read(r)?,
            bone: Symbol::read(r)?,
            length: r.read_f32()?,
            ..HairPoint::default()
        };
        if revision < 3 {
            point.unk_int3 = r.read_i32()?;
            point.unk_sym = Symbol::read(r)?;
        } else if revision == 3 {
            point.unk_int1 = r.read_i32()?;
        }

        point.radius = r.read_f32()?;

        if revision > 1 {
            point.outer_radius = r.read_f32()?;
        }

        if (6..=8).contains(&revision) {
            point.add_to_radius = r.read_f32()?;
        }

        if revision == 6 {
            point.unk_sym2 = Symbol::read(r)?;
        }

        if revision < 8 {
            if revision > 5 {
                point.unk_int2 = r.read_i32()?;
            }
        } else {
            if revision < 9 {
                point.unk_bool = r.read_bool()?;
            }
            point.side_length = r.read_f32()?;
        }
        if revision > 9 {
            point.unk_5c = Vector3::read(r)?;
        }

        Ok(point)
    }

    fn write(&self, w: &mut EndianWriter, revision: u16) -> Result<()> {
        self.pos.write(w)?;
        self.bone.write(w)?;
        w.write_f32(self.length)?;
        if revision < 3 {
            w.write_i32(self.unk_int3)?;
            self.unk_sym.write(w)?;
        } else if revision == 3 {
            w.write_i32(self.unk_int1)?;
        }

        w.write_f32(self.radius)?;

        if revision > 1 {
            w.write_f32(self.outer_radius)?;
        }

        if (6..=8).contains(&revision) {
            w.write_f32(self.add_to_radius)?;
        }

        if revision == 6 {
            self.unk_sym2.write(w)?;
        }

        if revision < 8 {
            if revision > 5 {
                w.write_i32(self.unk_int2)?;
            }
        } else {
            if revision < 9 {
                w.write_bool(self.unk_bool)?;
            }
            w.write_f32(self.side_length)?;
        }
        if revision > 9 {
            self.unk_5c.write(w)?;
        }
        Ok(())
    }
}

/// One strand: a rooted chain of points plus its rest-pose matrices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HairStrand {
    pub root: Symbol,
    pub angle: f32,
    pub points: Vec<HairPoint>,
    pub base_mat: Matrix3,
    pub root_mat: Matrix3,
    pub hookup_flags: i32,
}

impl HairStrand {
    fn read(r: &mut EndianReader, revision: u16) -> Result<HairStrand> {
        let root = Symbol::read(r)?;
        let angle = r.read_f32()?;
        let point_count = r.read_u32()?;
        if point_count > MAX_POINTS {
            return Err(MiloError::InvalidData(format!(
                "hair point count {point_count} exceeds maximum of {MAX_POINTS}"
            )));
        }
        let mut points = Vec::with_capacity(point_count as usize);
        for _ in 0..point_count {
            points.push(HairPoint::read(r, revision)?);
        }
        let base_mat = Matrix3::read(r)?;
        let root_mat = Matrix3::read(r)?;
        let hookup_flags = if revision > 2 { r.read_i32()? } else { 0 };

        Ok(HairStrand {
            root,
            angle,
            points,
            base_mat,
            root_mat,
            hookup_flags,
        })
    }

    fn write(&self, w: &mut EndianWriter, revision: u16) -> Result<()> {
        self.root.write(w)?;
        w.write_f32(self.angle)?;
        w.write_u32(self.points.len() as u32)?;
        for point in &self.points {
            point.write(w, revision)?;
        }
        self.base_mat.write(w)?;
        self.root_mat.write(w)?;
        if revision > 2 {
            w.write_i32(self.hookup_flags)?;
        }
        Ok(())
    }
}

/// Hair physics object: global simulation parameters plus the strand list.
#[derive(Debug, Clone, PartialEq)]
pub struct CharHair {
    pub revision: u16,
    pub alt_revision: u16,
    pub base: ObjectFields,
    /// Stiffness of each strand.
    pub stiffness: f32,
    /// Rotational stiffness of each strand.
    pub torsion: f32,
    pub inertia: f32,
    pub gravity: f32,
    pub weight: f32,
    /// Hair friction against each other.
    pub friction: f32,
    pub min_slack: f32,
    pub max_slack: f32,
    pub strands: Vec<HairStrand>,
    /// Simulate physics or not.
    pub simulate: bool,
    /// Wind object to use.
    pub wind: Symbol,
}

impl CharHair {
    /// Create a default-initialized hair object at the given revision.
    pub fn new(revision: u16, alt_revision: u16) -> CharHair {
        CharHair {
            revision,
            alt_revision,
            base: ObjectFields::default(),
            stiffness: 0.0,
            torsion: 0.0,
            inertia: 0.0,
            gravity: 1.0,
            weight: 1.0,
            friction: 0.0,
            min_slack: 0.0,
            max_slack: 0.0,
            strands: Vec::new(),
            simulate: false,
            wind: Symbol::default(),
        }
    }
}

impl ObjectCodec for CharHair {
    const TYPE_NAME: &'static str = "CharHair";

    fn read(
        r: &mut EndianReader,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        _entry: Option<&Entry>,
    ) -> Result<CharHair> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision(Self::TYPE_NAME, revision, MAX_REVISION)?;

        let base = ObjectFields::read(r)?;

        let mut hair = CharHair {
            revision,
            alt_revision,
            base,
            ..CharHair::new(revision, alt_revision)
        };

        hair.stiffness = r.read_f32()?;
        hair.torsion = r.read_f32()?;
        hair.inertia = r.read_f32()?;
        hair.gravity = r.read_f32()?;
        hair.weight = r.read_f32()?;
        hair.friction = r.read_f32()?;
        if revision > 8 {
            hair.min_slack = r.read_f32()?;
            hair.max_slack = r.read_f32()?;
        }

        let strand_count = r.read_u32()?;
        if strand_count > MAX_STRANDS {
            return Err(MiloError::InvalidData(format!(
                "hair strand count {strand_count} exceeds maximum of {MAX_STRANDS}"
            )));
        }
        for _ in 0..strand_count {
            hair.strands.push(HairStrand::read(r, revision)?);
        }

        hair.simulate = r.read_bool()?;

        if revision > 10 {
            hair.wind = Symbol::read(r)?;
        }

        if standalone {
            read_end_marker(r)?;
        }

        Ok(hair)
    }

    fn write(
        &self,
        w: &mut EndianWriter,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        _entry: Option<&Entry>,
    ) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;

        self.base.write(w)?;

        w.write_f32(self.stiffness)?;
        w.write_f32(self.torsion)?;
        w.write_f32(self.inertia)?;
        w.write_f32(self.gravity)?;
        w.write_f32(self.weight)?;
        w.write_f32(self.friction)?;
        if self.revision > 8 {
            w.write_f32(self.min_slack)?;
            w.write_f32(self.max_slack)?;
        }

        w.write_u32(self.strands.len() as u32)?;
        for strand in &self.strands {
            strand.write(w, self.revision)?;
        }

        w.write_bool(self.simulate)?;

        if self.revision > 10 {
            self.wind.write(w)?;
        }

        if standalone {
            write_end_marker(w)?;
        }

        Ok(())
    }
}
