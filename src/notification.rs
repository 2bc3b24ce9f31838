//! Parse notification / diagnostic system.
//!
//! One bad directory entry must not abort the surrounding read, but it must
//! never be silently dropped either.  Issues recovered at the entry boundary
//! are collected as `Notification` items and handed back alongside the
//! parsed tree.
//!
//! After a read the caller can inspect [`crate::MiloFile::notifications`]
//! (or the collection returned by a directory read) to see what was
//! encountered.

use std::fmt;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// An entry's type name has no registered codec; its bytes were kept
    /// opaque for round-tripping.
    UnknownType,
    /// An entry's codec failed; the entry was kept opaque and the read
    /// continued.
    RecoveredError,
    /// A non-fatal oddity (e.g. a codec that left trailing payload bytes).
    Warning,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType => write!(f, "UnknownType"),
            Self::RecoveredError => write!(f, "RecoveredError"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single notification produced during a read.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The category.
    pub kind: NotificationKind,
    /// A human-readable description of the issue.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Collects notifications during a read operation.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.items.push(Notification::new(kind, message));
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific kind.
    pub fn of_kind(&self, kind: NotificationKind) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.kind == kind).collect()
    }

    /// Check whether any notification of the given kind exists.
    pub fn has_kind(&self, kind: NotificationKind) -> bool {
        self.items.iter().any(|n| n.kind == kind)
    }

    /// Consume the collection into a `Vec`.
    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl IntoIterator for NotificationCollection {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
