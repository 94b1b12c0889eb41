//! Folder paths and name validation.
//!
//! The hierarchy is at most two levels deep: a folder at the root and a
//! subfolder inside it. [`FolderPath`] cannot represent anything deeper.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;
use crate::result::AppResult;

const MAX_NAME_LEN: usize = 255;

/// Check that `name` can be used as a single folder or file name.
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Name must be at most {MAX_NAME_LEN} bytes"
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(AppError::validation(format!(
            "Name ({name}) must not contain path separators"
        )));
    }
    if name == "." || name == ".." {
        return Err(AppError::validation(format!("Name ({name}) is reserved")));
    }
    if name.chars().any(char::is_control) {
        return Err(AppError::validation("Name must not contain control characters"));
    }
    Ok(())
}

/// Location of a folder: the root, a top-level folder, or a subfolder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// Maximum number of segments.
    pub const MAX_DEPTH: usize = 2;

    /// The root level.
    pub fn root() -> Self {
        Self::default()
    }

    /// A top-level folder.
    pub fn folder(name: &str) -> AppResult<Self> {
        validate_name(name)?;
        Ok(Self {
            segments: vec![name.to_string()],
        })
    }

    /// A subfolder inside a top-level folder.
    pub fn subfolder(parent: &str, sub: &str) -> AppResult<Self> {
        validate_name(parent)?;
        validate_name(sub)?;
        Ok(Self {
            segments: vec![parent.to_string(), sub.to_string()],
        })
    }

    /// Build a path from optional form fields.
    ///
    /// Empty strings count as absent. A subfolder without a parent folder
    /// is rejected.
    pub fn from_parts(parent: Option<&str>, sub: Option<&str>) -> AppResult<Self> {
        let parent = parent.map(str::trim).filter(|p| !p.is_empty());
        let sub = sub.map(str::trim).filter(|s| !s.is_empty());
        match (parent, sub) {
            (None, None) => Ok(Self::root()),
            (Some(p), None) => Self::folder(p),
            (Some(p), Some(s)) => Self::subfolder(p, s),
            (None, Some(_)) => Err(AppError::validation(
                "You have given a subfolder name, but no parent folder name",
            )),
        }
    }

    /// Parse `""`, `"folder"` or `"folder/sub"`. Surrounding slashes are
    /// ignored.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let parts: Vec<&str> = trimmed.split('/').collect();
        match parts.as_slice() {
            [folder] => Self::folder(folder),
            [folder, sub] => Self::subfolder(folder, sub),
            _ => Err(AppError::validation(format!(
                "Path ({trimmed}) is deeper than {} levels",
                Self::MAX_DEPTH
            ))),
        }
    }

    /// Whether this is the root level.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments (0, 1 or 2).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The innermost folder name, `None` at the root.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The enclosing path, `None` at the root.
    pub fn parent(&self) -> Option<FolderPath> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append a folder name. Fails if the result would exceed two levels.
    pub fn child(&self, name: &str) -> AppResult<FolderPath> {
        validate_name(name)?;
        if self.depth() >= Self::MAX_DEPTH {
            return Err(AppError::validation(format!(
                "Folders can only be nested {} levels deep",
                Self::MAX_DEPTH
            )));
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for FolderPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FolderPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FolderPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|e| serde::de::Error::custom(e.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_levels() {
        assert!(FolderPath::parse("").expect("root").is_root());
        assert_eq!(FolderPath::parse("docs/").expect("folder").depth(), 1);
        let sub = FolderPath::parse("docs/2024").expect("sub");
        assert_eq!(sub.segments(), ["docs", "2024"]);
        assert_eq!(sub.leaf(), Some("2024"));
        assert_eq!(sub.to_string(), "docs/2024");
    }

    #[test]
    fn test_depth_is_capped() {
        let err = FolderPath::parse("a/b/c").expect_err("too deep");
        assert_eq!(err.kind, ErrorKind::Validation);

        let sub = FolderPath::subfolder("a", "b").expect("sub");
        assert!(sub.child("c").is_err());
        assert_eq!(sub.parent(), Some(FolderPath::folder("a").expect("folder")));
    }

    #[test]
    fn test_sub_without_parent_is_rejected() {
        let err = FolderPath::from_parts(None, Some("2024")).expect_err("orphan sub");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("no parent folder name"));

        assert!(FolderPath::from_parts(Some(""), Some("")).expect("root").is_root());
    }

    #[test]
    fn test_invalid_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
        assert!(validate_name("report.pdf").is_ok());
    }
}
