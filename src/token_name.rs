//! TokenName: compact, case-insensitive token identifiers
//!
//! Token names are short (`season`, `Relationship`, `HasValue`), so names up
//! to 31 bytes are stored inline on the stack with heap fallback for longer
//! ones.
//!
//! Identity is ASCII case-insensitive: `{{Season}}` and `{{season}}` refer
//! to the same token, so equality, ordering, and hashing all fold case while
//! the original spelling is kept for display. Because hashing is folded,
//! this type deliberately does NOT implement `Borrow<str>`: a plain `&str`
//! would hash differently than the name it equals.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Maximum size for inline storage.
const INLINE_CAPACITY: usize = 31;

/// A token name with inline storage for typical short names.
#[derive(Clone)]
pub enum TokenName {
    /// Inline storage for names up to 31 bytes.
    Inline {
        /// Actual length of the name.
        len: u8,
        /// Fixed-size buffer for inline storage.
        buf: [u8; INLINE_CAPACITY],
    },
    /// Heap-allocated for longer names.
    Heap(String),
}

impl TokenName {
    /// Create a new token name.
    pub fn new(name: &str) -> Self {
        let bytes = name.as_bytes();
        let len = bytes.len();

        if len <= INLINE_CAPACITY {
            let mut buf = [0u8; INLINE_CAPACITY];
            buf[..len].copy_from_slice(bytes);
            TokenName::Inline {
                len: len as u8,
                buf,
            }
        } else {
            TokenName::Heap(name.to_string())
        }
    }

    /// Get the name as originally spelled.
    pub fn as_str(&self) -> &str {
        match self {
            TokenName::Inline { len, buf } => {
                // SAFETY: the buffer only ever holds bytes copied from a &str.
                unsafe { std::str::from_utf8_unchecked(&buf[..*len as usize]) }
            }
            TokenName::Heap(name) => name.as_str(),
        }
    }

    /// Check if this name is using inline storage.
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self, TokenName::Inline { .. })
    }

    /// Length of the name in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            TokenName::Inline { len, .. } => *len as usize,
            TokenName::Heap(name) => name.len(),
        }
    }

    /// Check if the name is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Case-folded bytes used for identity.
    fn folded_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_str().bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl From<&str> for TokenName {
    fn from(name: &str) -> Self {
        TokenName::new(name)
    }
}

impl From<String> for TokenName {
    fn from(name: String) -> Self {
        if name.len() <= INLINE_CAPACITY {
            TokenName::new(&name)
        } else {
            TokenName::Heap(name)
        }
    }
}

impl AsRef<str> for TokenName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TokenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TokenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenName(\"{}\")", self.as_str())
    }
}

impl PartialEq for TokenName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl Eq for TokenName {}

impl PartialEq<str> for TokenName {
    fn eq(&self, other: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for TokenName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str().eq_ignore_ascii_case(other)
    }
}

impl PartialOrd for TokenName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TokenName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.folded_bytes().cmp(other.folded_bytes())
    }
}

impl Hash for TokenName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.folded_bytes() {
            state.write_u8(byte);
        }
        state.write_usize(self.len());
    }
}

impl Serialize for TokenName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};

    #[test]
    fn inline_storage_for_short_names() {
        let name = TokenName::new("season");
        assert!(name.is_inline());
        assert_eq!(name.as_str(), "season");
        assert_eq!(name.len(), 6);
    }

    #[test]
    fn heap_storage_for_long_names() {
        let long = "a".repeat(32);
        let name = TokenName::new(&long);
        assert!(!name.is_inline());
        assert_eq!(name.as_str(), &long);
    }

    #[test]
    fn boundary_fits_inline() {
        let name = TokenName::new(&"a".repeat(31));
        assert!(name.is_inline());
        assert_eq!(name.len(), 31);
    }

    #[test]
    fn identity_is_case_insensitive() {
        assert_eq!(TokenName::new("Season"), TokenName::new("season"));
        assert_eq!(TokenName::new("SEASON"), "season");
        assert_ne!(TokenName::new("season"), TokenName::new("weather"));
    }

    #[test]
    fn display_preserves_original_spelling() {
        assert_eq!(TokenName::new("Relationship").to_string(), "Relationship");
    }

    #[test]
    fn hash_matches_equality() {
        let mut map = HashMap::new();
        map.insert(TokenName::new("Season"), 1);

        assert_eq!(map.get(&TokenName::new("season")), Some(&1));
        assert_eq!(map.get(&TokenName::new("SEASON")), Some(&1));
        assert_eq!(map.get(&TokenName::new("weather")), None);
    }

    #[test]
    fn ordered_sets_dedup_case_variants() {
        let mut set = BTreeSet::new();
        set.insert(TokenName::new("Season"));
        set.insert(TokenName::new("season"));
        set.insert(TokenName::new("Weather"));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_value(TokenName::new("Season")).unwrap();
        assert_eq!(json, serde_json::json!("Season"));
    }
}
