//! Directory merging under a caller-supplied conflict policy.
//!
//! The codec never prompts; the host supplies a [`MergePolicy`] and the
//! merge asks it once per same-name collision.  The `*All` answers latch
//! for the remainder of the operation, covering entries and inline
//! subdirectories alike.

use crate::types::Symbol;

use super::dir::{DirectoryMeta, Entry, ReferenceType};

/// Answer to a single merge collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeChoice {
    /// Replace the destination item with the source item.
    Overwrite,
    /// Leave the destination item untouched.
    Keep,
    /// Replace this and every later collision.
    OverwriteAll,
    /// Keep this and every later collision.
    KeepAll,
}

/// Conflict policy consulted when a source item collides with an existing
/// destination item of the same name.
pub trait MergePolicy {
    /// Decide what to do with the named collision.
    fn resolve(&mut self, name: &Symbol) -> MergeChoice;
}

/// Policy that overwrites every collision.
pub struct AlwaysOverwrite;

impl MergePolicy for AlwaysOverwrite {
    fn resolve(&mut self, _name: &Symbol) -> MergeChoice {
        MergeChoice::Overwrite
    }
}

/// Policy that keeps every destination item.
pub struct NeverOverwrite;

impl MergePolicy for NeverOverwrite {
    fn resolve(&mut self, _name: &Symbol) -> MergeChoice {
        MergeChoice::Keep
    }
}

impl Entry {
    /// Replace this entry's payload with another's, atomically, keeping the
    /// name and list position.
    fn overwrite_payload_from(&mut self, source: Entry) {
        self.entry_type = source.entry_type;
        self.is_dir = source.is_dir;
        self.is_proxy = source.is_proxy;
        self.obj_bytes = source.obj_bytes;
        self.obj = source.obj;
        self.dir = source.dir;
    }
}

impl DirectoryMeta {
    /// Merge `source` into this directory.
    ///
    /// For each source entry: a same-name destination entry is overwritten
    /// or kept per the policy; otherwise the entry is appended.  Inline
    /// subdirectories follow the same rule; an appended subdirectory also
    /// appends its cached filename and reference tag.
    pub fn merge_from(&mut self, source: DirectoryMeta, policy: &mut dyn MergePolicy) {
        let mut latched: Option<bool> = None;

        let mut resolve = |name: &Symbol, policy: &mut dyn MergePolicy, latched: &mut Option<bool>| {
            if let Some(overwrite) = *latched {
                return overwrite;
            }
            match policy.resolve(name) {
                MergeChoice::Overwrite => true,
                MergeChoice::Keep => false,
                MergeChoice::OverwriteAll => {
                    *latched = Some(true);
                    true
                }
                MergeChoice::KeepAll => {
                    *latched = Some(false);
                    false
                }
            }
        };

        for incoming in source.entries {
            match self.entries.iter_mut().find(|e| e.name == incoming.name) {
                Some(existing) => {
                    if resolve(&incoming.name, policy, &mut latched) {
                        existing.overwrite_payload_from(incoming);
                    }
                }
                None => self.entries.push(incoming),
            }
        }

        let sub_names = source.inline_sub_dir_names;
        for (index, incoming) in source.inline_sub_dirs.into_iter().enumerate() {
            match self
                .inline_sub_dirs
                .iter()
                .position(|d| d.name == incoming.name)
            {
                Some(existing) => {
                    if resolve(&incoming.name, policy, &mut latched) {
                        self.inline_sub_dirs[existing] = incoming;
                    }
                }
                None => {
                    let filename = sub_names
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| Symbol::new(format!("{}.milo", incoming.name)));
                    self.inline_sub_dirs.push(incoming);
                    self.inline_sub_dir_names.push(filename);
                    self.reference_types.push(ReferenceType::Cached);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::new_asset;

    fn dir_with_entries(names: &[&str]) -> DirectoryMeta {
        let mut dir = DirectoryMeta::new("ObjectDir", "dir", 2, 0).unwrap();
        for name in names {
            dir.entries
                .push(new_asset("ColorPalette", *name, 1, 0).unwrap());
        }
        dir
    }

    /// Policy that records how many times it was consulted.
    struct Counting(MergeChoice, usize);

    impl MergePolicy for Counting {
        fn resolve(&mut self, _name: &Symbol) -> MergeChoice {
            self.1 += 1;
            self.0
        }
    }

    #[test]
    fn test_append_when_no_collision() {
        let mut dest = dir_with_entries(&["a"]);
        let source = dir_with_entries(&["b", "c"]);
        dest.merge_from(source, &mut NeverOverwrite);
        assert_eq!(dest.entries.len(), 3);
    }

    #[test]
    fn test_keep_all_latches_and_stops_asking() {
        let mut dest = dir_with_entries(&["a", "b", "c"]);
        let source = dir_with_entries(&["a", "b", "c"]);
        let mut policy = Counting(MergeChoice::KeepAll, 0);
        dest.merge_from(source, &mut policy);
        assert_eq!(dest.entries.len(), 3);
        // latched after the first answer
        assert_eq!(policy.1, 1);
    }

    #[test]
    fn test_subdir_append_extends_parallel_arrays() {
        let mut dest = DirectoryMeta::new("ObjectDir", "dest", 2, 0).unwrap();
        let mut source = DirectoryMeta::new("ObjectDir", "src", 2, 0).unwrap();
        source
            .inline_sub_dirs
            .push(DirectoryMeta::new("RndDir", "props", 10, 0).unwrap());
        source.inline_sub_dir_names.push(Symbol::new("props.milo"));
        source.reference_types.push(ReferenceType::Shared);

        dest.merge_from(source, &mut AlwaysOverwrite);
        assert_eq!(dest.inline_sub_dirs.len(), 1);
        assert_eq!(dest.inline_sub_dir_names, vec![Symbol::new("props.milo")]);
        assert_eq!(dest.reference_types, vec![ReferenceType::Cached]);
    }
}
