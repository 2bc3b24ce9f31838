//! # milorust
//!
//! A pure Rust library for reading and writing game engine scene archives
//! in the Milo container format.
//!
//! An archive is a recursive directory tree of typed objects, each
//! serialized under an independent per-type revision history spanning a
//! decade of engine versions.  The codec reproduces byte-for-byte output
//! given byte-for-byte input across mixed endianness, proxy objects that
//! are deliberately left unparsed, and the sentinel trailer carried by
//! standalone assets.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use milorust::MiloFile;
//!
//! // Read an archive
//! let file = MiloFile::from_file("band_hair.milo")?;
//!
//! // Walk the tree
//! for entry in &file.dir.entries {
//!     println!("{} ({})", entry.name, entry.entry_type);
//! }
//!
//! // Write it back
//! file.write_to_file("band_hair_out.milo")?;
//! # Ok::<(), milorust::MiloError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`io`] — byte-order aware reader/writer primitives
//! - [`types`] — `Symbol`, small math records, revision word packing
//! - [`assets`] — the directory container, the object codec protocol, the
//!   type registry and every concrete asset codec
//! - [`milo_file`] — the outer block-compressed archive framing
//!
//! Entry-level parse failures are recovered at the directory boundary and
//! surfaced through [`NotificationCollection`]; structural failures abort
//! the read with a [`MiloError`].

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod assets;
pub mod error;
pub mod io;
pub mod milo_file;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use error::{MiloError, Result};
pub use io::{Endian, EndianReader, EndianWriter};
pub use notification::{Notification, NotificationCollection, NotificationKind};
pub use types::{
    pack_revision, unpack_revision, HmxColor4, Matrix3, Symbol, Transform, Vector3,
};

// Re-export asset types
pub use assets::{
    new_asset, replace_entry, AlwaysOverwrite, Asset, CharHair, ColorPalette, DancerSequence,
    DirFlags, DirKind, DirectoryMeta, Entry, EntryFlags, GroupSeq, MergeChoice, MergePolicy,
    NeverOverwrite, ObjectCodec, ObjectFields, ReferenceType,
};

// Re-export the archive container
pub use milo_file::{Compression, MiloFile};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
