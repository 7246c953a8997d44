//! Producer-side resource descriptions.

use std::io::Read;

use crate::dictionary::Dictionary;

/// Priority assumed for resources whose producer does not declare one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// An installable resource as handed over by a producer: a declared
/// identity plus either a payload stream or a configuration dictionary,
/// with optional kind and digest hints.
pub struct ResourceInput {
    pub(crate) id: String,
    pub(crate) stream: Option<Box<dyn Read>>,
    pub(crate) dictionary: Option<Dictionary>,
    pub(crate) kind_hint: Option<String>,
    pub(crate) digest: Option<String>,
    pub(crate) priority: i32,
}

impl ResourceInput {
    /// A resource backed by a payload byte stream.
    pub fn from_stream(id: impl Into<String>, stream: impl Read + 'static) -> Self {
        Self {
            id: id.into(),
            stream: Some(Box::new(stream)),
            dictionary: None,
            kind_hint: None,
            digest: None,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// A configuration resource backed by an already-structured dictionary.
    pub fn from_dictionary(id: impl Into<String>, dictionary: Dictionary) -> Self {
        Self {
            id: id.into(),
            stream: None,
            dictionary: Some(dictionary),
            kind_hint: None,
            digest: None,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// A resource with neither payload nor dictionary; resolves to an
    /// empty configuration.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stream: None,
            dictionary: None,
            kind_hint: None,
            digest: None,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Declares the resource kind explicitly instead of deriving it from
    /// the id's extension.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind_hint = Some(kind.into());
        self
    }

    /// Supplies a precomputed digest, trusted verbatim when non-empty.
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }
}
