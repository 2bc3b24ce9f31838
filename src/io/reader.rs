//! Sequential byte-order aware reader over an in-memory buffer.

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{MiloError, Result};

use super::endian::Endian;

/// Buffered reader with a byte order fixed at construction.
///
/// Multi-byte primitives honor the stream endianness.  Reading past the end
/// of the buffer fails with [`MiloError::TruncatedData`]; higher-level codecs
/// treat that as unrecoverable for the current asset but recoverable for the
/// surrounding directory read.
pub struct EndianReader {
    stream: Cursor<Vec<u8>>,
    endian: Endian,
}

impl EndianReader {
    /// Create a new reader wrapping raw data bytes.
    pub fn new(data: Vec<u8>, endian: Endian) -> Self {
        Self {
            stream: Cursor::new(data),
            endian,
        }
    }

    /// Create a reader over a copy of a byte slice.
    pub fn from_slice(data: &[u8], endian: Endian) -> Self {
        Self::new(data.to_vec(), endian)
    }

    /// The stream byte order.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Current byte position.
    pub fn position(&self) -> u64 {
        self.stream.position()
    }

    /// Set the byte position.
    pub fn set_position(&mut self, pos: u64) {
        self.stream.set_position(pos);
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> u64 {
        self.stream.get_ref().len() as u64
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.stream.get_ref().is_empty()
    }

    /// Bytes left between the current position and the end of the buffer.
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining() as usize;
        if remaining < needed {
            return Err(MiloError::TruncatedData { needed, remaining });
        }
        Ok(())
    }

    /// Read a single unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.stream.read_u8()?)
    }

    /// Read a single signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.stream.read_i8()?)
    }

    /// Read an unsigned 16-bit integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(match self.endian {
            Endian::Little => self.stream.read_u16::<LittleEndian>()?,
            Endian::Big => self.stream.read_u16::<BigEndian>()?,
        })
    }

    /// Read a signed 16-bit integer.
    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(match self.endian {
            Endian::Little => self.stream.read_i16::<LittleEndian>()?,
            Endian::Big => self.stream.read_i16::<BigEndian>()?,
        })
    }

    /// Read an unsigned 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(match self.endian {
            Endian::Little => self.stream.read_u32::<LittleEndian>()?,
            Endian::Big => self.stream.read_u32::<BigEndian>()?,
        })
    }

    /// Read a signed 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(match self.endian {
            Endian::Little => self.stream.read_i32::<LittleEndian>()?,
            Endian::Big => self.stream.read_i32::<BigEndian>()?,
        })
    }

    /// Read an unsigned 64-bit integer.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(match self.endian {
            Endian::Little => self.stream.read_u64::<LittleEndian>()?,
            Endian::Big => self.stream.read_u64::<BigEndian>()?,
        })
    }

    /// Read a signed 64-bit integer.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(match self.endian {
            Endian::Little => self.stream.read_i64::<LittleEndian>()?,
            Endian::Big => self.stream.read_i64::<BigEndian>()?,
        })
    }

    /// Read a 32-bit float.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(match self.endian {
            Endian::Little => self.stream.read_f32::<LittleEndian>()?,
            Endian::Big => self.stream.read_f32::<BigEndian>()?,
        })
    }

    /// Read a 64-bit float.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        Ok(match self.endian {
            Endian::Little => self.stream.read_f64::<LittleEndian>()?,
            Endian::Big => self.stream.read_f64::<BigEndian>()?,
        })
    }

    /// Read a one-byte boolean (nonzero = true).
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a raw block of `length` bytes.
    pub fn read_block(&mut self, length: usize) -> Result<Vec<u8>> {
        self.ensure(length)?;
        let pos = self.position() as usize;
        let bytes = self.stream.get_ref()[pos..pos + length].to_vec();
        self.set_position((pos + length) as u64);
        Ok(bytes)
    }

    /// Read every byte from the current position to the end of the buffer.
    pub fn read_to_end(&mut self) -> Vec<u8> {
        let remaining = self.remaining() as usize;
        // ensure() trivially holds
        self.read_block(remaining).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_little_endian() {
        let data = vec![0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0xFF];
        let mut r = EndianReader::new(data, Endian::Little);
        assert_eq!(r.read_u16().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 2);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_i8().unwrap(), -1);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_primitives_big_endian() {
        let data = vec![0x00, 0x01, 0x3F, 0x80, 0x00, 0x00];
        let mut r = EndianReader::new(data, Endian::Big);
        assert_eq!(r.read_u16().unwrap(), 1);
        assert_eq!(r.read_f32().unwrap(), 1.0);
    }

    #[test]
    fn test_truncated_read() {
        let mut r = EndianReader::new(vec![0x01, 0x02], Endian::Little);
        let err = r.read_u32().unwrap_err();
        assert!(matches!(
            err,
            crate::error::MiloError::TruncatedData {
                needed: 4,
                remaining: 2
            }
        ));
        // failed read leaves the position untouched
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_read_block_and_to_end() {
        let mut r = EndianReader::new(vec![1, 2, 3, 4, 5], Endian::Little);
        assert_eq!(r.read_block(2).unwrap(), vec![1, 2]);
        assert_eq!(r.read_to_end(), vec![3, 4, 5]);
        assert_eq!(r.remaining(), 0);
    }
}
