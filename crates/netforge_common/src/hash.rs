//! Content hashing for generated HDL artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A 128-bit XXH3 digest of a generated artifact.
///
/// `netforge build` compares the digest of freshly generated text against
/// the file already on disk and skips the write when they agree, so
/// downstream tools watching the output directory only see real changes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Hashes a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Hashes generated source text.
    pub fn of_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Hashes the current contents of a file, or returns `None` if it cannot be read.
    pub fn of_file(path: &Path) -> Option<Self> {
        std::fs::read(path).ok().map(|bytes| Self::from_bytes(&bytes))
    }

    /// Returns the first eight hex digits, for progress output.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_hash() {
        let a = ContentHash::of_text("module top;\nendmodule\n");
        let b = ContentHash::of_text("module top;\nendmodule\n");
        assert_eq!(a, b);
    }

    #[test]
    fn whitespace_changes_hash() {
        let a = ContentHash::of_text("assign c = a & b;");
        let b = ContentHash::of_text("assign c = a &  b;");
        assert_ne!(a, b);
    }

    #[test]
    fn short_is_prefix_of_display() {
        let h = ContentHash::of_text("entity top is");
        let full = format!("{h}");
        assert_eq!(full.len(), 32);
        assert_eq!(h.short().len(), 8);
        assert!(full.starts_with(&h.short()));
    }

    #[test]
    fn missing_file_has_no_hash() {
        assert!(ContentHash::of_file(Path::new("/nonexistent/netforge/out.v")).is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::of_text("serde");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
