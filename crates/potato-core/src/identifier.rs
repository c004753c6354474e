//! Paste identifiers and the allowed-character policy.
//!
//! An identifier is both the public URL suffix (`/{id}`) and the storage
//! key. Anything that did not come out of a generator has to pass
//! [`is_valid_identifier`] before it is allowed near storage; this is what
//! keeps `..`, separators and other path tricks away from backends that map
//! keys onto file names.

use std::fmt;

/// The 62 characters an identifier may contain.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Length of freshly generated identifiers. 62^4 = 14,776,336 possible values.
pub const ID_LENGTH: usize = 4;

/// Longest token [`Identifier::parse`] accepts.
pub const MAX_TOKEN_LEN: usize = 64;

/// Returns `true` if `s` is non-empty and every character is in [`ALPHABET`].
///
/// Length is not checked here.
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| ALPHABET.contains(c))
}

/// A validated paste identifier.
///
/// Case-sensitive: `abcd` and `ABCD` are different pastes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Validate an untrusted token.
    ///
    /// Returns `None` for anything that fails [`is_valid_identifier`] or is
    /// longer than [`MAX_TOKEN_LEN`].
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if token.len() > MAX_TOKEN_LEN || !is_valid_identifier(token) {
            return None;
        }
        Some(Self(token.to_owned()))
    }

    /// Wrap a string the caller has built from [`ALPHABET`] characters.
    pub(crate) fn from_alphabet(s: String) -> Self {
        debug_assert!(is_valid_identifier(&s));
        Self(s)
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_62_distinct_characters() {
        let mut chars: Vec<char> = ALPHABET.chars().collect();
        chars.sort_unstable();
        chars.dedup();
        assert_eq!(chars.len(), 62);
        assert!(chars.iter().all(char::is_ascii_alphanumeric));
    }

    #[test]
    fn valid_identifiers() {
        for s in ["abcd", "ZZZZ", "a1B2", "0", "abcdefgh"] {
            assert!(is_valid_identifier(s), "{s:?}");
        }
    }

    #[test]
    fn empty_is_invalid() {
        assert!(!is_valid_identifier(""));
        assert!(Identifier::parse("").is_none());
    }

    #[test]
    fn traversal_and_whitespace_are_invalid() {
        for s in [
            ".", "..", "../etc/passwd", "a/b", "a\\b", "a b", " abc", "abc\n", "ab-c", "ab_c",
            "ab%2e", "\0", "ünï",
        ] {
            assert!(!is_valid_identifier(s), "{s:?}");
            assert!(Identifier::parse(s).is_none(), "{s:?}");
        }
    }

    #[test]
    fn parse_rejects_overlong_tokens() {
        let long = "a".repeat(MAX_TOKEN_LEN + 1);
        assert!(is_valid_identifier(&long));
        assert!(Identifier::parse(&long).is_none());
        assert!(Identifier::parse(&"a".repeat(MAX_TOKEN_LEN)).is_some());
    }

    #[test]
    fn parse_preserves_case() {
        let id = Identifier::parse("AbCd").map(|id| id.to_string());
        assert_eq!(id.as_deref(), Some("AbCd"));
    }
}
