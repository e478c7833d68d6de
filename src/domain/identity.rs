//! Identity handles and node families

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Process-unique node handle.
///
/// Identities start at 1 and grow monotonically; they are never reused
/// within a run. Equality and hashing of nodes go through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(u64);

impl Identity {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Identity> for u64 {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

/// Label identifying the kind of a node, independent of its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Family(Cow<'static, str>);

impl Family {
    /// Family of plain nodes.
    pub const ABSTRACT: Family = Family(Cow::Borrowed("Abstract"));
    /// Family of composite nodes.
    pub const ABSTRACT_COMPOSITE: Family = Family(Cow::Borrowed("AbstractComposite"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Family {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for Family {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}
