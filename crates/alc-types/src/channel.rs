//! Dotted-path channel names.
//!
//! Every logged container is identified by a [`Channel`]: a dotted-path
//! string naming its position in the configuration tree. The channel is
//! used both as the audit log channel and to derive child names:
//!
//! - mapping entries derive `parent.key`
//! - sequence and set elements share the synthetic segment `parent[...]`
//!   (element positions are not stable identifiers)
//! - copies derive `parent(copy)`

use std::fmt;

use serde::{Deserialize, Serialize};

/// Synthetic child segment shared by all sequence and set elements.
const ELEMENT_SEGMENT: &str = "[...]";

/// Suffix applied to the channel of a copied container.
const COPY_SUFFIX: &str = "(copy)";

/// The dotted-path name of a container node.
///
/// Channels are plain strings; no validation is applied beyond what the
/// underlying mapping requires of its keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(String);

impl Channel {
    /// A root channel for a freshly constructed container.
    pub fn root(name: impl Into<String>) -> Self {
        Channel(name.into())
    }

    /// The channel of the mapping entry stored under `key`.
    pub fn key(&self, key: &str) -> Self {
        Channel(format!("{}.{key}", self.0))
    }

    /// The shared channel of this container's sequence or set elements.
    pub fn element(&self) -> Self {
        Channel(format!("{}{ELEMENT_SEGMENT}", self.0))
    }

    /// The channel of a shallow or deep copy of this container.
    pub fn copied(&self) -> Self {
        Channel(format!("{}{COPY_SUFFIX}", self.0))
    }

    /// The channel as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Channel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Channel::root(name)
    }
}

impl From<String> for Channel {
    fn from(name: String) -> Self {
        Channel::root(name)
    }
}
