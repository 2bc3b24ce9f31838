//! Color record used by palette assets.

use crate::error::Result;
use crate::io::{EndianReader, EndianWriter};

/// RGBA color with f32 channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HmxColor4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl HmxColor4 {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        HmxColor4 { r, g, b, a }
    }

    /// Read four floats in r, g, b, a order.
    pub fn read(reader: &mut EndianReader) -> Result<HmxColor4> {
        Ok(HmxColor4 {
            r: reader.read_f32()?,
            g: reader.read_f32()?,
            b: reader.read_f32()?,
            a: reader.read_f32()?,
        })
    }

    /// Write four floats in r, g, b, a order.
    pub fn write(&self, writer: &mut EndianWriter) -> Result<()> {
        writer.write_f32(self.r)?;
        writer.write_f32(self.g)?;
        writer.write_f32(self.b)?;
        writer.write_f32(self.a)
    }
}

impl Default for HmxColor4 {
    fn default() -> Self {
        HmxColor4::new(1.0, 1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Endian;

    #[test]
    fn test_color_roundtrip() {
        let c = HmxColor4::new(0.25, 0.5, 0.75, 1.0);
        let mut w = EndianWriter::new(Endian::Big);
        c.write(&mut w).unwrap();
        let mut r = EndianReader::new(w.into_inner(), Endian::Big);
        assert_eq!(HmxColor4::read(&mut r).unwrap(), c);
    }
}
