//! Immutable shared strings.
//!
//! Short strings are interned through a process-wide [`HashGenCacheSet`], so
//! repeated keys such as `"name"` or `"id"` share one allocation and compare
//! by pointer on the fast path. Interning is best effort; equality always
//! falls back to comparing contents.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::cache::HashGenCacheSet;

/// Strings longer than this are never interned.
const INTERN_MAX_LEN: usize = 32;

/// Bucket count of the shared text cache.
const TEXT_CACHE_CAPACITY: usize = 128;

fn text_cache() -> &'static Mutex<HashGenCacheSet<Text>> {
    static CACHE: OnceLock<Mutex<HashGenCacheSet<Text>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashGenCacheSet::new(TEXT_CACHE_CAPACITY)))
}

/// String value.
#[derive(Clone)]
pub struct Text(Arc<str>);

impl Text {
    /// Create a text value, interning it when short.
    pub fn new(s: &str) -> Text {
        let text = Text(Arc::from(s));
        if s.len() <= INTERN_MAX_LEN {
            text_cache().lock().put(text)
        } else {
            text
        }
    }

    /// The empty string.
    pub fn empty() -> Text {
        Text::new("")
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both handles share one allocation.
    pub fn ptr_eq(&self, other: &Text) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Concatenation.
    pub fn concat(&self, other: &Text) -> Text {
        let mut joined = String::with_capacity(self.len() + other.len());
        joined.push_str(self);
        joined.push_str(other);
        Text::from(joined)
    }

    /// Whether this looks like a bare identifier (`[A-Za-z_$][A-Za-z0-9_$-]*`).
    pub fn is_ident(&self) -> bool {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
            _ => return false,
        }
        chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '-'))
    }
}

impl Deref for Text {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Text {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::new(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        if s.len() <= INTERN_MAX_LEN {
            Text::new(&s)
        } else {
            Text(Arc::from(s))
        }
    }
}

impl From<&String> for Text {
    fn from(s: &String) -> Self {
        Text::new(s)
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for Text {}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Text {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Text {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_interned() {
        let a = Text::from("interned-key");
        let b = Text::from(String::from("interned-key"));
        assert_eq!(a, b);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn long_text_compares_by_content() {
        let long = "x".repeat(INTERN_MAX_LEN + 1);
        let a = Text::from(long.clone());
        let b = Text::from(long.as_str());
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn concat_and_str_comparisons() {
        let joined = Text::from("foo").concat(&Text::from("bar"));
        assert_eq!(joined, "foobar");
        assert_eq!(joined.len(), 6);
        assert!(Text::from("abc") < Text::from("abd"));
    }

    #[test]
    fn identifiers() {
        assert!(Text::from("name").is_ident());
        assert!(Text::from("_x1").is_ident());
        assert!(Text::from("$key").is_ident());
        assert!(!Text::from("1st").is_ident());
        assert!(!Text::from("has space").is_ident());
        assert!(!Text::empty().is_ident());
    }
}
