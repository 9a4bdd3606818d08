//! Word-level matching of typed input against command patterns.
//!
//! A command pattern is a list of words, each one of:
//!
//! ```text
//!   word            literal, matched case-insensitively
//!   [foo|bar|baz]   optionally one of these words
//!   {foo|bar|baz}   exactly one of these words
//!   %               any single word
//! ```

use std::cmp::Ordering;

/// Characters that turn a pattern word into a group or wildcard.
pub const RESERVED: &[char] = &['[', ']', '{', '}', '|', '*', '%'];

/// Returns true if `c` is a reserved pattern character.
pub fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c)
}

fn is_reserved_byte(b: u8) -> bool {
    b.is_ascii() && is_reserved(b as char)
}

/// Shape of a single pattern word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    /// No reserved characters.
    Literal,
    /// Exactly `%`.
    Wildcard,
    /// A `[...]` or `{...}` group, or anything else containing reserved characters.
    Group,
}

impl WordKind {
    pub fn of(pattern_word: &str) -> Self {
        if pattern_word == "%" {
            WordKind::Wildcard
        } else if pattern_word.contains(RESERVED) {
            WordKind::Group
        } else {
            WordKind::Literal
        }
    }
}

/// Result of comparing one typed word with one pattern word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordMatch {
    NoMatch,
    /// The pattern word was satisfied without consuming the typed word.
    OptionalMatch,
    FullMatch,
}

impl WordMatch {
    /// Number of typed words consumed by this match.
    pub fn consumed(self) -> usize {
        match self {
            WordMatch::FullMatch => 1,
            WordMatch::OptionalMatch | WordMatch::NoMatch => 0,
        }
    }

    pub fn is_match(self) -> bool {
        !matches!(self, WordMatch::NoMatch)
    }
}

/// Compares a typed word with a pattern word.
///
/// Groups are matched by searching the typed word inside the group text and
/// accepting an occurrence bounded on both sides by reserved characters (or
/// the end of the group). The occurrence may not start the group text.
pub fn match_word(typed: &str, pattern: &str) -> WordMatch {
    if typed.is_empty() || pattern.is_empty() {
        return WordMatch::NoMatch;
    }

    match WordKind::of(pattern) {
        WordKind::Literal => {
            if typed.eq_ignore_ascii_case(pattern) {
                WordMatch::FullMatch
            } else {
                WordMatch::NoMatch
            }
        }
        WordKind::Wildcard => WordMatch::FullMatch,
        WordKind::Group => {
            let haystack = pattern.as_bytes();
            let needle = typed.as_bytes();
            if needle.len() >= haystack.len() {
                return WordMatch::NoMatch;
            }
            for pos in 1..=haystack.len() - needle.len() {
                let end = pos + needle.len();
                if haystack[pos..end].eq_ignore_ascii_case(needle)
                    && is_reserved_byte(haystack[pos - 1])
                    && (end == haystack.len() || is_reserved_byte(haystack[end]))
                {
                    return WordMatch::FullMatch;
                }
            }
            WordMatch::NoMatch
        }
    }
}

/// Result of [`is_prefix`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefixMatch {
    /// Full text of the requested alternative, if it exists.
    pub candidate: Option<String>,
    /// Alternatives matched as a prefix, up to and including the requested
    /// one (all of them if the requested one does not exist).
    pub count: usize,
}

/// Checks whether `typed` is a case-insensitive prefix of the `index`-th
/// matching alternative of `pattern`.
///
/// A literal pattern word has a single alternative, itself. Wildcards never
/// produce candidates. A typed word containing reserved characters never
/// matches.
pub fn is_prefix(typed: &str, pattern: &str, index: usize) -> PrefixMatch {
    let mut result = PrefixMatch::default();
    if pattern.is_empty() || typed.contains(RESERVED) {
        return result;
    }

    let Some(first) = pattern.chars().next() else {
        return result;
    };
    if !is_reserved(first) {
        if starts_with_ignore_case(pattern, typed) {
            result.count = 1;
            if index == 0 {
                result.candidate = Some(pattern.to_string());
            }
        }
        return result;
    }

    // Alternatives run up to the first empty segment, like "[a|b]" -> a, b.
    let alternatives = pattern[first.len_utf8()..]
        .split(is_reserved)
        .take_while(|alt| !alt.is_empty());

    let mut remaining = index;
    for alt in alternatives {
        if !starts_with_ignore_case(alt, typed) {
            continue;
        }
        result.count += 1;
        if remaining == 0 {
            result.candidate = Some(alt.to_string());
            break;
        }
        remaining -= 1;
    }
    result
}

/// Case-insensitive (ASCII) `starts_with`.
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Case-insensitive (ASCII) ordering, like `strcasecmp`.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(b.bytes().map(|b| b.to_ascii_lowercase()))
}

/// Case-insensitive ordering of at most the first `len` bytes, like
/// `strncasecmp`.
pub fn cmp_prefix_ignore_case(a: &str, b: &str, len: usize) -> Ordering {
    let a = &a.as_bytes()[..a.len().min(len)];
    let b = &b.as_bytes()[..b.len().min(len)];
    a.iter()
        .map(u8::to_ascii_lowercase)
        .cmp(b.iter().map(u8::to_ascii_lowercase))
}
