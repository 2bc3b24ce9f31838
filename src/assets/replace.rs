//! In-place asset replacement with two-phase (try/rollback) semantics.
//!
//! The entry's current state is serialized into a backup buffer before the
//! new bytes are decoded into it.  A failed decode restores the entry from
//! the backup and reports the failure against the *new* data; the entry is
//! never left partially mutated.

use crate::error::{MiloError, Result};
use crate::io::{Endian, EndianReader, EndianWriter};
use crate::notification::NotificationCollection;

use super::dir::{DirectoryMeta, Entry};
use super::registry;

/// Decode `bytes` into the entry's parsed slot, clearing it first so a
/// failure is observable to the rollback path.
fn decode_into(
    entry: &mut Entry,
    bytes: &[u8],
    parent: Option<&DirectoryMeta>,
    endian: Endian,
) -> Result<()> {
    let header = entry.shallow();
    entry.obj = None;
    entry.dir = None;

    let mut r = EndianReader::from_slice(bytes, endian);
    if entry.is_dir {
        let mut notes = NotificationCollection::new();
        let dir = DirectoryMeta::read(&mut r, false, parent, Some(&header), &mut notes)?;
        if r.remaining() != 0 {
            return Err(MiloError::InvalidData(format!(
                "{} trailing bytes after directory payload",
                r.remaining()
            )));
        }
        entry.dir = Some(dir);
    } else {
        let asset = registry::read_asset(header.entry_type.as_str(), &mut r, parent, Some(&header))?
            .ok_or_else(|| MiloError::UnknownType(header.entry_type.as_str().to_string()))?;
        if r.remaining() != 0 {
            return Err(MiloError::InvalidData(format!(
                "{} trailing bytes after {} payload",
                r.remaining(),
                header.entry_type
            )));
        }
        entry.obj = Some(asset);
    }
    Ok(())
}

/// Replace a live entry's contents from externally supplied bytes.
///
/// On success the entry holds the newly decoded object and `obj_bytes` is
/// the supplied buffer.  On failure the entry is restored from its backup
/// and [`MiloError::ReplaceRolledBack`] carries the original failure.
pub fn replace_entry(
    parent: Option<&DirectoryMeta>,
    entry: &mut Entry,
    new_bytes: &[u8],
    endian: Endian,
) -> Result<()> {
    // an unparsed entry has no decodable state to protect
    if !entry.is_resolved() {
        entry.obj_bytes = new_bytes.to_vec();
        return Ok(());
    }

    // phase one: back up the current state
    let backup = {
        let mut w = EndianWriter::new(endian);
        if let Some(dir) = &entry.dir {
            dir.write(&mut w, false, parent, Some(entry))?;
        } else if let Some(obj) = &entry.obj {
            obj.write(&mut w, false, parent, Some(entry))?;
        }
        w.into_inner()
    };
    let old_bytes = std::mem::take(&mut entry.obj_bytes);

    // phase two: attempt the new data
    match decode_into(entry, new_bytes, parent, endian) {
        Ok(()) => {
            entry.obj_bytes = new_bytes.to_vec();
            Ok(())
        }
        Err(err) => {
            // the backup was produced by this codec's own writer, so the
            // restore cannot fail for data reasons; surface it if it does
            decode_into(entry, &backup, parent, endian)?;
            entry.obj_bytes = old_bytes;
            Err(MiloError::ReplaceRolledBack {
                source: Box::new(err),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::new_asset;
    use crate::assets::Asset;
    use crate::assets::color_palette::ColorPalette;
    use crate::assets::object::ObjectCodec;
    use crate::types::HmxColor4;

    fn serialized(entry: &Entry, endian: Endian) -> Vec<u8> {
        entry.serialize_payload(None, endian).unwrap()
    }

    #[test]
    fn test_replace_success() {
        let mut entry = new_asset("ColorPalette", "pal", 1, 0).unwrap();

        let mut replacement = ColorPalette::new(1, 0);
        replacement.colors.push(HmxColor4::new(0.0, 0.0, 0.0, 1.0));
        let mut w = EndianWriter::new(Endian::Little);
        replacement.write(&mut w, false, None, None).unwrap();
        let new_bytes = w.into_inner();

        replace_entry(None, &mut entry, &new_bytes, Endian::Little).unwrap();
        assert_eq!(entry.obj_bytes, new_bytes);
        match &entry.obj {
            Some(Asset::ColorPalette(p)) => assert_eq!(p.colors.len(), 1),
            other => panic!("unexpected object: {other:?}"),
        }
    }

    #[test]
    fn test_replace_failure_rolls_back_byte_identical() {
        let mut entry = new_asset("ColorPalette", "pal", 1, 0).unwrap();
        if let Some(Asset::ColorPalette(p)) = &mut entry.obj {
            p.colors.push(HmxColor4::new(0.5, 0.5, 0.5, 1.0));
        }
        let before = serialized(&entry, Endian::Little);

        let err = replace_entry(None, &mut entry, &[0xFF, 0xEE], Endian::Little).unwrap_err();
        assert!(matches!(err, MiloError::ReplaceRolledBack { .. }));

        let after = serialized(&entry, Endian::Little);
        assert_eq!(after, before);
    }

    #[test]
    fn test_replace_unparsed_entry_swaps_bytes() {
        let mut entry = Entry::new_proxy("Tex", "skin.tex", vec![1, 2, 3]);
        replace_entry(None, &mut entry, &[9, 9], Endian::Little).unwrap();
        assert_eq!(entry.obj_bytes, vec![9, 9]);
        assert!(!entry.is_resolved());
    }
}
