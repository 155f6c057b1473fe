//! Newtype wrappers for semantic identifiers.
//!
//! These types provide compile-time type safety to prevent mixing up
//! different kinds of identifiers (layout-manager identities, document
//! anchor ids for cross-references).

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Identity of one layout manager for the duration of one breaking pass.
///
/// Break positions name the manager that created them through this id; the
/// replay dispatch matches on it to route position runs to child managers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ManagerId(u64);

impl ManagerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lm#{}", self.0)
    }
}

/// An identifier for a document anchor (e.g., for cross-references and
/// unresolved forward references).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct AnchorId(Arc<str>);

impl AnchorId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AnchorId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for AnchorId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for AnchorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
