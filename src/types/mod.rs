//! Value types shared across the codec: interned strings, small math
//! records, colors, and the packed revision word.

pub mod color;
pub mod revision;
pub mod symbol;
pub mod vector;

pub use color::HmxColor4;
pub use revision::{pack_revision, read_revision, unpack_revision, write_revision};
pub use symbol::Symbol;
pub use vector::{Matrix3, Transform, Vector3};
