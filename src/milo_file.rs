//! Outer archive container: the framing around a serialized directory
//! tree.
//!
//! An archive is a little-endian header (magic, data offset, block table)
//! followed by block bodies that concatenate into the root directory's
//! byte stream.  Block bodies may be stored raw or deflate-compressed
//! depending on the magic.  The directory stream's own endianness is
//! independent of the header and is detected from the root revision word.

use std::io::Read;
use std::path::Path;

use flate2::read::{DeflateDecoder, GzDecoder};
use flate2::write::DeflateEncoder;
use flate2::Compression as Flate2Level;

use crate::assets::DirectoryMeta;
use crate::error::{MiloError, Result};
use crate::io::{Endian, EndianReader, EndianWriter};
use crate::notification::NotificationCollection;
use crate::types::unpack_revision;

const MAGIC_NONE: u32 = 0xCABE_DEAF;
const MAGIC_ZLIB: u32 = 0xCBBE_DEAF;
const MAGIC_GZIP: u32 = 0xCCBE_DEAF;
const MAGIC_ZLIB_SIZED: u32 = 0xCDBE_DEAF;

/// Bit set in a sized-zlib block's table entry when that block is stored
/// uncompressed.
const BLOCK_UNCOMPRESSED_FLAG: u32 = 0x0100_0000;

/// Upper bound on the declared block count.
pub const MAX_BLOCKS: u32 = 0x10000;
/// Upper bound on a single block's stored size.
const MAX_BLOCK_STORED: u32 = 0x0100_0000;

/// How the archive's block bodies are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Raw block bodies.
    None,
    /// Deflate-compressed block bodies.
    Zlib,
    /// Gzip-compressed block bodies; read-only.
    Gzip,
    /// Deflate with a per-block inflated-size prefix; read-only, written
    /// back as plain deflate.
    ZlibSized,
}

impl Compression {
    fn from_magic(magic: u32) -> Result<Compression> {
        match magic {
            MAGIC_NONE => Ok(Compression::None),
            MAGIC_ZLIB => Ok(Compression::Zlib),
            MAGIC_GZIP => Ok(Compression::Gzip),
            MAGIC_ZLIB_SIZED => Ok(Compression::ZlibSized),
            other => Err(MiloError::InvalidData(format!(
                "bad archive magic {other:#010X}"
            ))),
        }
    }
}

/// A scene archive: the root directory tree plus its container framing.
#[derive(Debug, Clone)]
pub struct MiloFile {
    /// Endianness of the directory byte stream.
    pub endian: Endian,
    /// Block storage of the source archive; controls how `write` stores
    /// blocks.
    pub compression: Compression,
    /// The root directory.
    pub dir: DirectoryMeta,
    /// Issues recovered during the read.
    pub notifications: NotificationCollection,
}

impl MiloFile {
    /// Wrap a directory tree in a new uncompressed archive.
    pub fn new(dir: DirectoryMeta, endian: Endian) -> MiloFile {
        MiloFile {
            endian,
            compression: Compression::None,
            dir,
            notifications: NotificationCollection::new(),
        }
    }

    /// Read an archive, detecting the directory stream's endianness.
    pub fn read(bytes: &[u8]) -> Result<MiloFile> {
        let (compression, body) = Self::read_container(bytes)?;
        let endian = Self::detect_endian(&body);
        Self::read_body(body, compression, endian)
    }

    /// Read an archive with an explicit directory-stream endianness.
    pub fn read_with_endian(bytes: &[u8], endian: Endian) -> Result<MiloFile> {
        let (compression, body) = Self::read_container(bytes)?;
        Self::read_body(body, compression, endian)
    }

    /// Read an archive from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<MiloFile> {
        let bytes = std::fs::read(path)?;
        Self::read(&bytes)
    }

    fn read_container(bytes: &[u8]) -> Result<(Compression, Vec<u8>)> {
        let mut header = EndianReader::from_slice(bytes, Endian::Little);
        let compression = Compression::from_magic(header.read_u32()?)?;
        let data_offset = header.read_u32()? as u64;
        let block_count = header.read_u32()?;
        if block_count > MAX_BLOCKS {
            return Err(MiloError::InvalidData(format!(
                "block count {block_count} exceeds maximum of {MAX_BLOCKS}"
            )));
        }
        let _max_block_size = header.read_u32()?;

        let mut stored_sizes = Vec::with_capacity(block_count as usize);
        for _ in 0..block_count {
            let size = header.read_u32()?;
            if (size & !BLOCK_UNCOMPRESSED_FLAG) > MAX_BLOCK_STORED {
                return Err(MiloError::InvalidData(format!(
                    "block stored size {size:#X} exceeds maximum of {MAX_BLOCK_STORED:#X}"
                )));
            }
            stored_sizes.push(size);
        }

        if data_offset > bytes.len() as u64 {
            return Err(MiloError::InvalidData(format!(
                "data offset {data_offset} past end of archive"
            )));
        }
        header.set_position(data_offset);

        let mut body = Vec::new();
        for size in stored_sizes {
            let raw_stored = size & !BLOCK_UNCOMPRESSED_FLAG;
            let block = header.read_block(raw_stored as usize)?;
            let inflated = match compression {
                Compression::None => block,
                Compression::Zlib => inflate_deflate(&block)?,
                Compression::Gzip => inflate_gzip(&block)?,
                Compression::ZlibSized => {
                    if size & BLOCK_UNCOMPRESSED_FLAG != 0 {
                        block
                    } else {
                        // four-byte inflated-size prefix, then deflate data
                        if block.len() < 4 {
                            return Err(MiloError::Compression(
                                "sized block shorter than its size prefix".to_string(),
                            ));
                        }
                        inflate_deflate(&block[4..])?
                    }
                }
            };
            body.extend_from_slice(&inflated);
        }

        Ok((compression, body))
    }

    fn read_body(body: Vec<u8>, compression: Compression, endian: Endian) -> Result<MiloFile> {
        let mut notes = NotificationCollection::new();
        let mut r = EndianReader::new(body, endian);
        let dir = DirectoryMeta::read(&mut r, true, None, None, &mut notes)?;
        Ok(MiloFile {
            endian,
            compression,
            dir,
            notifications: notes,
        })
    }

    /// Guess the directory stream's byte order from the root revision word.
    fn detect_endian(body: &[u8]) -> Endian {
        let Some(word) = body.get(0..4) else {
            return Endian::Little;
        };
        let bytes: [u8; 4] = [word[0], word[1], word[2], word[3]];
        let plausible = |word: u32| {
            let (revision, alt_revision) = unpack_revision(word);
            revision <= 0x100 && alt_revision <= 0x100
        };
        if plausible(u32::from_le_bytes(bytes)) {
            Endian::Little
        } else if plausible(u32::from_be_bytes(bytes)) {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    /// Serialize the archive: directory body plus container framing.
    pub fn write(&self) -> Result<Vec<u8>> {
        let mut body_writer = EndianWriter::new(self.endian);
        self.dir.write(&mut body_writer, true, None, None)?;
        let body = body_writer.into_inner();

        let (magic, block) = match self.compression {
            Compression::None => (MAGIC_NONE, body),
            _ => (MAGIC_ZLIB, deflate(&body)?),
        };

        let mut out = EndianWriter::new(Endian::Little);
        out.write_u32(magic)?;
        // magic + offset + count + max size + one table slot
        out.write_u32(20)?;
        out.write_u32(1)?;
        out.write_u32(block.len() as u32)?;
        out.write_u32(block.len() as u32)?;
        out.write_block(&block)?;
        Ok(out.into_inner())
    }

    /// Serialize the archive to disk.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.write()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn inflate_deflate(block: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(block)
        .read_to_end(&mut out)
        .map_err(|e| MiloError::Compression(format!("deflate: {e}")))?;
    Ok(out)
}

fn inflate_gzip(block: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(block)
        .read_to_end(&mut out)
        .map_err(|e| MiloError::Compression(format!("gzip: {e}")))?;
    Ok(out)
}

fn deflate(body: &[u8]) -> Result<Vec<u8>> {
    use std::io::Write;
    let mut encoder = DeflateEncoder::new(Vec::new(), Flate2Level::default());
    encoder
        .write_all(body)
        .map_err(|e| MiloError::Compression(format!("deflate: {e}")))?;
    encoder
        .finish()
        .map_err(|e| MiloError::Compression(format!("deflate: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::new_asset;

    fn sample_dir() -> DirectoryMeta {
        let mut dir = DirectoryMeta::new("ObjectDir", "root", 2, 0).unwrap();
        dir.entries
            .push(new_asset("ColorPalette", "pal", 1, 0).unwrap());
        dir
    }

    #[test]
    fn test_uncompressed_roundtrip() {
        let file = MiloFile::new(sample_dir(), Endian::Little);
        let bytes = file.write().unwrap();
        let back = MiloFile::read(&bytes).unwrap();
        assert_eq!(back.endian, Endian::Little);
        assert_eq!(back.compression, Compression::None);
        assert_eq!(back.dir, file.dir);
        assert!(back.notifications.is_empty());
    }

    #[test]
    fn test_zlib_roundtrip() {
        let mut file = MiloFile::new(sample_dir(), Endian::Big);
        file.compression = Compression::Zlib;
        let bytes = file.write().unwrap();
        let back = MiloFile::read(&bytes).unwrap();
        assert_eq!(back.compression, Compression::Zlib);
        assert_eq!(back.endian, Endian::Big);
        assert_eq!(back.dir, file.dir);
    }

    #[test]
    fn test_big_endian_detection() {
        let file = MiloFile::new(sample_dir(), Endian::Big);
        let bytes = file.write().unwrap();
        assert_eq!(MiloFile::read(&bytes).unwrap().endian, Endian::Big);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let bytes = [0u8; 32];
        assert!(matches!(
            MiloFile::read(&bytes).unwrap_err(),
            MiloError::InvalidData(_)
        ));
    }

    #[test]
    fn test_bogus_block_count_rejected() {
        let mut w = EndianWriter::new(Endian::Little);
        w.write_u32(MAGIC_NONE).unwrap();
        w.write_u32(16).unwrap();
        w.write_u32(u32::MAX).unwrap();
        w.write_u32(0).unwrap();
        assert!(matches!(
            MiloFile::read(w.as_slice()).unwrap_err(),
            MiloError::InvalidData(_)
        ));
    }
}
