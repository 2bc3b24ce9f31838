//! Sequential byte-order aware writer over a growable buffer.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::error::Result;

use super::endian::Endian;

/// Buffered writer with a byte order fixed at construction.
///
/// Mirrors [`super::EndianReader`]: every value a reader method consumes has
/// a writer method emitting the identical byte layout.
pub struct EndianWriter {
    buffer: Vec<u8>,
    endian: Endian,
}

impl EndianWriter {
    /// Create a new empty writer.
    pub fn new(endian: Endian) -> Self {
        Self {
            buffer: Vec::new(),
            endian,
        }
    }

    /// The stream byte order.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// View the written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer, returning the written bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Write a single unsigned byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.buffer.write_u8(value)?;
        Ok(())
    }

    /// Write a single signed byte.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.buffer.write_i8(value)?;
        Ok(())
    }

    /// Write an unsigned 16-bit integer.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        match self.endian {
            Endian::Little => self.buffer.write_u16::<LittleEndian>(value)?,
            Endian::Big => self.buffer.write_u16::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write a signed 16-bit integer.
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        match self.endian {
            Endian::Little => self.buffer.write_i16::<LittleEndian>(value)?,
            Endian::Big => self.buffer.write_i16::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write an unsigned 32-bit integer.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        match self.endian {
            Endian::Little => self.buffer.write_u32::<LittleEndian>(value)?,
            Endian::Big => self.buffer.write_u32::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write a signed 32-bit integer.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        match self.endian {
            Endian::Little => self.buffer.write_i32::<LittleEndian>(value)?,
            Endian::Big => self.buffer.write_i32::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write an unsigned 64-bit integer.
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        match self.endian {
            Endian::Little => self.buffer.write_u64::<LittleEndian>(value)?,
            Endian::Big => self.buffer.write_u64::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write a signed 64-bit integer.
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        match self.endian {
            Endian::Little => self.buffer.write_i64::<LittleEndian>(value)?,
            Endian::Big => self.buffer.write_i64::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write a 32-bit float.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        match self.endian {
            Endian::Little => self.buffer.write_f32::<LittleEndian>(value)?,
            Endian::Big => self.buffer.write_f32::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write a 64-bit float.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        match self.endian {
            Endian::Little => self.buffer.write_f64::<LittleEndian>(value)?,
            Endian::Big => self.buffer.write_f64::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write a one-byte boolean (1 or 0).
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Write a raw block of bytes.
    pub fn write_block(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::EndianReader;

    #[test]
    fn test_writer_reader_symmetry() {
        for endian in [Endian::Little, Endian::Big] {
            let mut w = EndianWriter::new(endian);
            w.write_u16(0x1234).unwrap();
            w.write_i32(-5).unwrap();
            w.write_f32(2.5).unwrap();
            w.write_bool(true).unwrap();
            w.write_block(&[9, 8, 7]).unwrap();

            let mut r = EndianReader::new(w.into_inner(), endian);
            assert_eq!(r.read_u16().unwrap(), 0x1234);
            assert_eq!(r.read_i32().unwrap(), -5);
            assert_eq!(r.read_f32().unwrap(), 2.5);
            assert!(r.read_bool().unwrap());
            assert_eq!(r.read_block(3).unwrap(), vec![9, 8, 7]);
            assert_eq!(r.remaining(), 0);
        }
    }

    #[test]
    fn test_endianness_differs_on_wire() {
        let mut le = EndianWriter::new(Endian::Little);
        let mut be = EndianWriter::new(Endian::Big);
        le.write_u32(1).unwrap();
        be.write_u32(1).unwrap();
        assert_eq!(le.as_slice(), &[1, 0, 0, 0]);
        assert_eq!(be.as_slice(), &[0, 0, 0, 1]);
    }
}
