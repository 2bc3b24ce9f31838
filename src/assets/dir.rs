//! The recursive directory container: a tree of named, typed entries, each
//! either a nested directory, a proxy blob, or a parsed leaf object.
//!
//! Entry payloads are length-prefixed on the wire, so an unrecognized or
//! proxy payload round-trips opaquely and a corrupt entry never
//! desynchronizes the surrounding read.  Counts are recomputed from live
//! collections on write; nothing is cached.

use bitflags::bitflags;

use crate::error::{MiloError, Result};
use crate::io::{EndianReader, EndianWriter};
use crate::notification::{NotificationCollection, NotificationKind};
use crate::types::{read_revision, write_revision, Symbol};

use super::move_dir::MoveDirFields;
use super::object::{read_end_marker, write_end_marker, ensure_revision, ObjectFields};
use super::registry;
use super::rnd_dir::RndDirFields;
use super::Asset;

const MAX_DIR_REVISION: u16 = 2;

/// Upper bound on the declared entry count.
pub const MAX_ENTRIES: u32 = 0x4000;
/// Upper bound on the declared inline subdirectory count.
pub const MAX_SUBDIRS: u32 = 0x400;
/// Upper bound on a single entry's declared payload length.
pub const MAX_ENTRY_PAYLOAD: u32 = 0x0100_0000;

bitflags! {
    /// Per-entry flag byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntryFlags: u8 {
        /// The payload is a nested directory.
        const DIR = 1;
        /// The payload is deliberately left unparsed.
        const PROXY = 1 << 1;
    }
}

bitflags! {
    /// Directory-level flag word.  Unknown bits are preserved for
    /// round-tripping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DirFlags: u32 {
        /// Directory contents are cached alongside the parent archive.
        const CACHED = 1;
        /// Directory was pulled in through an external reference.
        const EXTERNAL = 1 << 1;
    }
}

/// How an inline subdirectory is referenced by its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceType {
    None,
    Cached,
    Shared,
    SharedCached,
}

impl ReferenceType {
    /// Decode a wire tag.
    pub fn from_raw(value: u32) -> Result<ReferenceType> {
        match value {
            0 => Ok(ReferenceType::None),
            1 => Ok(ReferenceType::Cached),
            2 => Ok(ReferenceType::Shared),
            3 => Ok(ReferenceType::SharedCached),
            other => Err(MiloError::InvalidData(format!(
                "unknown reference type tag {other}"
            ))),
        }
    }

    /// The wire tag.
    pub fn as_raw(&self) -> u32 {
        match self {
            ReferenceType::None => 0,
            ReferenceType::Cached => 1,
            ReferenceType::Shared => 2,
            ReferenceType::SharedCached => 3,
        }
    }
}

/// A named, typed slot inside a directory.
///
/// A resolved entry populates exactly one of `obj`/`dir`.  A proxy entry
/// populates neither; its payload lives only in `obj_bytes` and is
/// re-emitted verbatim.
#[derive(Debug, Clone)]
pub struct Entry {
    pub entry_type: Symbol,
    pub name: Symbol,
    pub is_dir: bool,
    pub is_proxy: bool,
    /// Raw serialized payload as last read; authoritative for proxy and
    /// unrecognized entries.
    pub obj_bytes: Vec<u8>,
    /// The parsed leaf object, when one was decoded.
    pub obj: Option<Asset>,
    /// The parsed nested directory, when `is_dir`.
    pub dir: Option<DirectoryMeta>,
}

impl Entry {
    /// Create an entry holding a parsed leaf object.
    pub fn new_object(entry_type: impl Into<Symbol>, name: impl Into<Symbol>, obj: Asset) -> Entry {
        Entry {
            entry_type: entry_type.into(),
            name: name.into(),
            is_dir: false,
            is_proxy: false,
            obj_bytes: Vec::new(),
            obj: Some(obj),
            dir: None,
        }
    }

    /// Create an entry holding a nested directory.
    pub fn new_dir(name: impl Into<Symbol>, dir: DirectoryMeta) -> Entry {
        Entry {
            entry_type: dir.dir_type.clone(),
            name: name.into(),
            is_dir: true,
            is_proxy: false,
            obj_bytes: Vec::new(),
            obj: None,
            dir: Some(dir),
        }
    }

    /// Create a proxy entry whose payload is never decoded.
    pub fn new_proxy(
        entry_type: impl Into<Symbol>,
        name: impl Into<Symbol>,
        bytes: Vec<u8>,
    ) -> Entry {
        Entry {
            entry_type: entry_type.into(),
            name: name.into(),
            is_dir: false,
            is_proxy: true,
            obj_bytes: bytes,
            obj: None,
            dir: None,
        }
    }

    /// Whether a parsed representation is attached.
    pub fn is_resolved(&self) -> bool {
        self.obj.is_some() || self.dir.is_some()
    }

    /// Deep-copy this entry under a new name.
    pub fn duplicate(&self, new_name: impl Into<Symbol>) -> Entry {
        let mut copy = self.clone();
        copy.name = new_name.into();
        if let Some(dir) = &mut copy.dir {
            dir.name = copy.name.clone();
        }
        copy
    }

    /// Header-only copy: type, name and flags without any payload.  Used as
    /// read context while the payload itself is being (re)decoded.
    pub(crate) fn shallow(&self) -> Entry {
        Entry {
            entry_type: self.entry_type.clone(),
            name: self.name.clone(),
            is_dir: self.is_dir,
            is_proxy: self.is_proxy,
            obj_bytes: Vec::new(),
            obj: None,
            dir: None,
        }
    }

    /// Logical equality: the parsed form decides when both sides carry
    /// one, the retained payload bytes otherwise.  `obj_bytes` is a cache
    /// of the last read, not part of an entry's identity.
    fn logically_eq(&self, other: &Entry) -> bool {
        if self.entry_type != other.entry_type
            || self.name != other.name
            || self.is_dir != other.is_dir
            || self.is_proxy != other.is_proxy
        {
            return false;
        }
        match (self.is_resolved(), other.is_resolved()) {
            (true, true) => self.obj == other.obj && self.dir == other.dir,
            (false, false) => self.obj_bytes == other.obj_bytes,
            _ => false,
        }
    }

    fn flags_byte(&self) -> u8 {
        let mut flags = EntryFlags::empty();
        flags.set(EntryFlags::DIR, self.is_dir);
        flags.set(EntryFlags::PROXY, self.is_proxy);
        flags.bits()
    }

    /// Serialize this entry's payload: the parsed form when one is
    /// attached, the retained raw bytes otherwise.
    pub(crate) fn serialize_payload(
        &self,
        parent: Option<&DirectoryMeta>,
        endian: crate::io::Endian,
    ) -> Result<Vec<u8>> {
        if let Some(dir) = &self.dir {
            let mut w = EndianWriter::new(endian);
            dir.write(&mut w, false, parent, Some(self))?;
            Ok(w.into_inner())
        } else if let Some(obj) = &self.obj {
            let mut w = EndianWriter::new(endian);
            obj.write(&mut w, false, parent, Some(self))?;
            Ok(w.into_inner())
        } else {
            Ok(self.obj_bytes.clone())
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Entry) -> bool {
        self.logically_eq(other)
    }
}

/// Typed extension record of a directory, dispatched on its type name.
///
/// Composition form of the original chain: a generic directory carries no
/// extension, render and move directories layer their records on top.
#[derive(Debug, Clone, PartialEq)]
pub enum DirKind {
    ObjectDir,
    RndDir(RndDirFields),
    MoveDir(MoveDirFields),
}

impl Default for DirKind {
    fn default() -> Self {
        DirKind::ObjectDir
    }
}

/// A node in the asset tree: ordered entries plus optional inline child
/// directories cached alongside the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryMeta {
    pub revision: u16,
    pub alt_revision: u16,
    pub dir_type: Symbol,
    pub name: Symbol,
    pub base: ObjectFields,
    pub flags: DirFlags,
    pub entries: Vec<Entry>,
    /// Parallel arrays; `inline_sub_dirs`, `inline_sub_dir_names` and
    /// `reference_types` always have equal lengths.
    pub inline_sub_dirs: Vec<DirectoryMeta>,
    pub inline_sub_dir_names: Vec<Symbol>,
    pub reference_types: Vec<ReferenceType>,
    pub kind: DirKind,
}

impl DirectoryMeta {
    /// Create an empty directory of the given type.  `revision` and
    /// `alt_revision` seed the typed extension record; the container itself
    /// always starts at the current layout.
    pub fn new(
        dir_type: &str,
        name: impl Into<Symbol>,
        revision: u16,
        alt_revision: u16,
    ) -> Result<DirectoryMeta> {
        let kind = match dir_type {
            "ObjectDir" => DirKind::ObjectDir,
            "RndDir" => DirKind::RndDir(RndDirFields::new(revision, alt_revision)),
            "MoveDir" => DirKind::MoveDir(MoveDirFields::new(revision, alt_revision)),
            other => return Err(MiloError::UnknownType(other.to_string())),
        };
        Ok(DirectoryMeta {
            revision: MAX_DIR_REVISION,
            alt_revision: 0,
            dir_type: Symbol::new(dir_type),
            name: name.into(),
            base: ObjectFields::default(),
            flags: DirFlags::empty(),
            entries: Vec::new(),
            inline_sub_dirs: Vec::new(),
            inline_sub_dir_names: Vec::new(),
            reference_types: Vec::new(),
            kind,
        })
    }

    /// Whether this directory's type carries the inline subdirectory block.
    pub fn supports_inline_sub_dirs(&self) -> bool {
        registry::dir_supports_inline_sub_dirs(self.dir_type.as_str())
    }

    /// Find an entry by name.
    pub fn find_entry(&self, name: &Symbol) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.name == name)
    }

    /// Find an entry by name, mutably.
    pub fn find_entry_mut(&mut self, name: &Symbol) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| &e.name == name)
    }

    /// Read a directory tree from the stream.
    ///
    /// Entry-level failures are recovered: the offending entry keeps its
    /// raw payload and a notification is recorded.  Structural failures
    /// (bad counts, truncated headers, missing standalone marker) abort the
    /// read; the caller receives no partial tree.
    pub fn read(
        r: &mut EndianReader,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        entry: Option<&Entry>,
        notes: &mut NotificationCollection,
    ) -> Result<DirectoryMeta> {
        let (revision, alt_revision) = read_revision(r)?;
        ensure_revision("DirectoryMeta", revision, MAX_DIR_REVISION)?;

        let dir_type = Symbol::read(r)?;
        let name = Symbol::read(r)?;
        let base = ObjectFields::read(r)?;
        let flags = DirFlags::from_bits_retain(r.read_u32()?);

        if !registry::is_dir_type(dir_type.as_str()) {
            return Err(MiloError::UnknownType(dir_type.as_str().to_string()));
        }

        let mut dir = DirectoryMeta {
            revision,
            alt_revision,
            dir_type,
            name,
            base,
            flags,
            entries: Vec::new(),
            inline_sub_dirs: Vec::new(),
            inline_sub_dir_names: Vec::new(),
            reference_types: Vec::new(),
            kind: DirKind::ObjectDir,
        };

        let entry_count = r.read_u32()?;
        if entry_count > MAX_ENTRIES {
            return Err(MiloError::InvalidData(format!(
                "entry count {entry_count} exceeds maximum of {MAX_ENTRIES}"
            )));
        }

        for _ in 0..entry_count {
            let child = Self::read_entry(r, &dir, notes)?;
            dir.entries.push(child);
        }

        if dir.supports_inline_sub_dirs() {
            let sub_count = r.read_u32()?;
            if sub_count > MAX_SUBDIRS {
                return Err(MiloError::InvalidData(format!(
                    "inline subdirectory count {sub_count} exceeds maximum of {MAX_SUBDIRS}"
                )));
            }
            for _ in 0..sub_count {
                let sub = DirectoryMeta::read(r, false, Some(&dir), None, notes)?;
                let filename = Symbol::read(r)?;
                let reference_type = ReferenceType::from_raw(r.read_u32()?)?;
                dir.inline_sub_dirs.push(sub);
                dir.inline_sub_dir_names.push(filename);
                dir.reference_types.push(reference_type);
            }
        }

        dir.kind = match dir.dir_type.as_str() {
            "RndDir" => DirKind::RndDir(RndDirFields::read(r, entry)?),
            "MoveDir" => DirKind::MoveDir(MoveDirFields::read(r, entry)?),
            _ => DirKind::ObjectDir,
        };

        if standalone {
            read_end_marker(r)?;
        }

        Ok(dir)
    }

    fn read_entry(
        r: &mut EndianReader,
        parent: &DirectoryMeta,
        notes: &mut NotificationCollection,
    ) -> Result<Entry> {
        let entry_type = Symbol::read(r)?;
        let name = Symbol::read(r)?;
        let flag_byte = r.read_u8()?;
        let flags = EntryFlags::from_bits(flag_byte).ok_or_else(|| {
            MiloError::InvalidData(format!("unknown entry flag bits {flag_byte:#04X}"))
        })?;

        let payload_len = r.read_u32()?;
        if payload_len > MAX_ENTRY_PAYLOAD {
            return Err(MiloError::InvalidData(format!(
                "entry payload length {payload_len} exceeds maximum of {MAX_ENTRY_PAYLOAD}"
            )));
        }
        let payload = r.read_block(payload_len as usize)?;

        let mut entry = Entry {
            entry_type,
            name,
            is_dir: flags.contains(EntryFlags::DIR),
            is_proxy: flags.contains(EntryFlags::PROXY),
            obj_bytes: payload,
            obj: None,
            dir: None,
        };

        // proxies are never field-decoded beyond the header just read
        if entry.is_proxy {
            return Ok(entry);
        }

        let mut sub = EndianReader::from_slice(&entry.obj_bytes, r.endian());
        if entry.is_dir {
            match DirectoryMeta::read(&mut sub, false, Some(parent), Some(&entry), notes) {
                Ok(nested) if sub.remaining() == 0 => entry.dir = Some(nested),
                Ok(_) => notes.notify(
                    NotificationKind::Warning,
                    format!(
                        "directory entry \"{}\" left {} trailing payload bytes; kept opaque",
                        entry.name,
                        sub.remaining()
                    ),
                ),
                Err(err) => notes.notify(
                    NotificationKind::RecoveredError,
                    format!("directory entry \"{}\" kept opaque: {err}", entry.name),
                ),
            }
        } else {
            match registry::read_asset(entry.entry_type.as_str(), &mut sub, Some(parent), Some(&entry)) {
                Ok(Some(asset)) => {
                    if sub.remaining() == 0 {
                        entry.obj = Some(asset);
                    } else {
                        notes.notify(
                            NotificationKind::Warning,
                            format!(
                                "entry \"{}\" ({}) left {} trailing payload bytes; kept opaque",
                                entry.name,
                                entry.entry_type,
                                sub.remaining()
                            ),
                        );
                    }
                }
                Ok(None) => notes.notify(
                    NotificationKind::UnknownType,
                    format!(
                        "no codec for type \"{}\" (entry \"{}\"); kept opaque",
                        entry.entry_type, entry.name
                    ),
                ),
                Err(err) => notes.notify(
                    NotificationKind::RecoveredError,
                    format!(
                        "entry \"{}\" ({}) kept opaque: {err}",
                        entry.name, entry.entry_type
                    ),
                ),
            }
        }

        Ok(entry)
    }

    /// Write the directory tree: the exact inverse of `read`, with every
    /// count taken from the live collection lengths.
    pub fn write(
        &self,
        w: &mut EndianWriter,
        standalone: bool,
        _parent: Option<&DirectoryMeta>,
        entry: Option<&Entry>,
    ) -> Result<()> {
        write_revision(w, self.revision, self.alt_revision)?;
        self.dir_type.write(w)?;
        self.name.write(w)?;
        self.base.write(w)?;
        w.write_u32(self.flags.bits())?;

        w.write_u32(self.entries.len() as u32)?;
        for child in &self.entries {
            child.entry_type.write(w)?;
            child.name.write(w)?;
            w.write_u8(child.flags_byte())?;
            let payload = child.serialize_payload(Some(self), w.endian())?;
            w.write_u32(payload.len() as u32)?;
            w.write_block(&payload)?;
        }

        if self.supports_inline_sub_dirs() {
            if self.inline_sub_dirs.len() != self.inline_sub_dir_names.len()
                || self.inline_sub_dirs.len() != self.reference_types.len()
            {
                return Err(MiloError::InvalidData(format!(
                    "inline subdirectory arrays out of sync: {} dirs, {} names, {} reference types",
                    self.inline_sub_dirs.len(),
                    self.inline_sub_dir_names.len(),
                    self.reference_types.len()
                )));
            }
            w.write_u32(self.inline_sub_dirs.len() as u32)?;
            for i in 0..self.inline_sub_dirs.len() {
                self.inline_sub_dirs[i].write(w, false, Some(self), None)?;
                self.inline_sub_dir_names[i].write(w)?;
                w.write_u32(self.reference_types[i].as_raw())?;
            }
        }

        match &self.kind {
            DirKind::ObjectDir => {}
            DirKind::RndDir(fields) => fields.write(w, entry)?,
            DirKind::MoveDir(fields) => fields.write(w, entry)?,
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
    fn test_reference_type_tags() {
        for tag in 0..4 {
            assert_eq!(ReferenceType::from_raw(tag).unwrap().as_raw(), tag);
        }
        assert!(ReferenceType::from_raw(7).is_err());
    }

    #[test]
    fn test_entry_flags_byte() {
        let mut e = Entry::new_proxy("Tex", "skin.tex", vec![1, 2]);
        assert_eq!(e.flags_byte(), 0b10);
        e.is_dir = true;
        assert_eq!(e.flags_byte(), 0b11);
    }

    #[test]
    fn test_empty_dir_roundtrip() {
        let dir = DirectoryMeta::new("ObjectDir", "root", 2, 0).unwrap();
        let mut w = EndianWriter::new(Endian::Little);
        dir.write(&mut w, true, None, None).unwrap();
        let bytes = w.into_inner();

        let mut notes = NotificationCollection::new();
        let mut r = EndianReader::new(bytes.clone(), Endian::Little);
        let back = DirectoryMeta::read(&mut r, true, None, None, &mut notes).unwrap();
        assert_eq!(back, dir);
        assert!(notes.is_empty());

        let mut w2 = EndianWriter::new(Endian::Little);
        back.write(&mut w2, true, None, None).unwrap();
        assert_eq!(w2.into_inner(), bytes);
    }

    #[test]
    fn test_unknown_dir_type_rejected() {
        assert!(matches!(
            DirectoryMeta::new("TotallyNotADir", "x", 0, 0).unwrap_err(),
            MiloError::UnknownType(_)
        ));
    }

    #[test]
    fn test_inline_sub_dir_arrays_enforced_on_write() {
        let mut dir = DirectoryMeta::new("ObjectDir", "root", 2, 0).unwrap();
        dir.inline_sub_dirs
            .push(DirectoryMeta::new("ObjectDir", "sub", 2, 0).unwrap());
        // names and reference types deliberately not pushed
        let mut w = EndianWriter::new(Endian::Little);
        assert!(matches!(
            dir.write(&mut w, false, None, None).unwrap_err(),
            MiloError::InvalidData(_)
        ));
    }

    #[test]
    fn test_duplicate_renames_nested_dir() {
        let dir = DirectoryMeta::new("RndDir", "inner", 10, 0).unwrap();
        let entry = Entry::new_dir("inner", dir);
        let copy = entry.duplicate("inner_copy");
        assert_eq!(copy.name, Symbol::new("inner_copy"));
        assert_eq!(copy.dir.as_ref().map(|d| d.name.clone()), Some(Symbol::new("inner_copy")));
        // source untouched
        assert_eq!(entry.name, Symbol::new("inner"));
    }
}
