/*!
 * Names
 * Inline-optimized identifiers for processes, resources and mailboxes
 */

use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier for a process, resource class, mailbox or message.
///
/// Names in process definitions are short (`P1`, `R2`, `mbox`), so they are
/// stored inline without a heap allocation (up to 23 bytes on 64-bit).
/// Hashing and equality match `str`, so tables keyed by `Name` can be
/// queried with a plain `&str`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Name {
    inner: SmartString,
}

impl Name {
    #[inline]
    pub fn new(s: &str) -> Self {
        Self {
            inner: SmartString::from(s),
        }
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inner.is_inline()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.inner.into()
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<&str> for Name {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Name {
    #[inline]
    fn from(s: String) -> Self {
        Self {
            inner: SmartString::from(s),
        }
    }
}

impl From<&Name> for Name {
    #[inline]
    fn from(name: &Name) -> Self {
        name.clone()
    }
}

impl Borrow<str> for Name {
    #[inline(always)]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Name {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::ops::Deref for Name {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    #[test]
    fn test_short_names_are_inline() {
        assert!(Name::from("R1").is_inline());
        assert!(!Name::from("a-resource-name-longer-than-inline-capacity").is_inline());
    }

    #[test]
    fn test_lookup_by_str() {
        let mut table: AHashMap<Name, usize> = AHashMap::new();
        table.insert(Name::from("mbox"), 3);
        assert_eq!(table.get("mbox"), Some(&3));
        assert_eq!(table.get("other"), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Name::from("P1")).unwrap();
        assert_eq!(json, "\"P1\"");
    }
}
