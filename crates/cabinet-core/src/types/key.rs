//! Blob store key layout.
//!
//! Keys mirror the folder hierarchy under the owner's username:
//! `owner/[folder/[subfolder/]]name`, with a trailing slash for folder
//! markers.

use std::fmt;

use crate::types::path::FolderPath;

/// A fully built blob store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Prefix holding everything `owner` has stored.
    pub fn owner_prefix(owner: &str) -> Self {
        Self(format!("{owner}/"))
    }

    /// Marker key for the folder at `path`. `path` must not be the root.
    pub fn folder_marker(owner: &str, path: &FolderPath) -> Self {
        Self(format!("{owner}/{path}/"))
    }

    /// Key for a file named `name` inside `path`.
    pub fn file(owner: &str, path: &FolderPath, name: &str) -> Self {
        if path.is_root() {
            Self(format!("{owner}/{name}"))
        } else {
            Self(format!("{owner}/{path}/{name}"))
        }
    }

    /// Whether the key is a folder marker.
    pub fn is_folder_marker(&self) -> bool {
        self.0.ends_with('/')
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
