//! Color palette asset: the list of primary/secondary colors an outfit
//! configuration picks from.

use crate::error::{MiloError, Result};
use crate::io::{EndianReader, EndianWriter};
use crate::types::{read_revision, write_revision, HmxColor4};

use super::dir::{DirectoryMeta, Entry};
use super::object::{read_end_marker, write_end_marker, ObjectCodec, ObjectFields};

/// Upper bound on the declared color count; checked before any allocation.
pub const MAX_COLORS: u32 = 0x100;

/// A flat list of material colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    pub revision: u16,
    pub alt_revision: u16,
    pub base: ObjectFields,
    pub colors: Vec<HmxColor4>,
}

impl ColorPalette {
    /// Create an empty palette at the given revision.
    pub fn new(revision: u16, alt_revision: u16) -> ColorPalette {
        ColorPalette {
            revision,
            alt_revision,
            base: ObjectFields::default(),
            colors: Vec::new(),
        }
    }
}

impl ObjectCodec for ColorPalette {
    const TYPE_NAME: &'static str = "ColorPalette";

    fn read(
        r: &mut EndianReader,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        _entry: Option<&Entry>,
    ) -> Result<ColorPalette> {
        let (revision, alt_revision) = read_revision(r)?;
        // only one layout ever shipped
        if revision != 1 {
            return Err(MiloError::UnsupportedRevision {
                type_name: Self::TYPE_NAME,
                revision,
            });
        }

        let base = ObjectFields::read(r)?;

        let color_count = r.read_u32()?;
        if color_count > MAX_COLORS {
            return Err(MiloError::InvalidData(format!(
                "color count {color_count} exceeds maximum of {MAX_COLORS}"
            )));
        }

        let mut colors = Vec::with_capacity(color_count as usize);
        for _ in 0..color_count {
            colors.push(HmxColor4::read(r)?);
        }

        if standalone {
            read_end_marker(r)?;
        }

        Ok(ColorPalette {
            revision,
            alt_revision,
            base,
            colors,
        })
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

        w.write_u32(self.colors.len() as u32)?;
        for color in &self.colors {
            color.write(w)?;
        }

        if standalone {
            write_end_marker(w)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Endian;

    #[test]
    fn test_roundtrip() {
        let mut palette = ColorPalette::new(1, 0);
        palette.colors.push(HmxColor4::new(1.0, 0.0, 0.0, 1.0));
        palette.colors.push(HmxColor4::new(0.0, 0.5, 1.0, 0.5));

        let mut w = EndianWriter::new(Endian::Big);
        palette.write(&mut w, true, None, None).unwrap();
        let bytes = w.into_inner();

        let mut r = EndianReader::new(bytes.clone(), Endian::Big);
        let back = ColorPalette::read(&mut r, true, None, None).unwrap();
        assert_eq!(back, palette);

        let mut w2 = EndianWriter::new(Endian::Big);
        back.write(&mut w2, true, None, None).unwrap();
        assert_eq!(w2.into_inner(), bytes);
    }

    #[test]
    fn test_rejects_other_revisions() {
        let mut w = EndianWriter::new(Endian::Little);
        write_revision(&mut w, 2, 0).unwrap();
        let mut r = EndianReader::new(w.into_inner(), Endian::Little);
        assert!(matches!(
            ColorPalette::read(&mut r, false, None, None).unwrap_err(),
            MiloError::UnsupportedRevision { .. }
        ));
    }

    #[test]
    fn test_bogus_color_count_rejected_before_allocation() {
        let mut w = EndianWriter::new(Endian::Little);
        write_revision(&mut w, 1, 0).unwrap();
        ObjectFields::default().write(&mut w).unwrap();
        w.write_u32(0x8000_0000).unwrap();
        let mut r = EndianReader::new(w.into_inner(), Endian::Little);
        assert!(matches!(
            ColorPalette::read(&mut r, false, None, None).unwrap_err(),
            MiloError::InvalidData(_)
        ));
    }
}
