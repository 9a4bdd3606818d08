//! Finding the command a list of typed words refers to.

use std::sync::Arc;

use crate::command::CommandEntry;
use crate::pattern::match_word;

/// How much the typed words may differ from a command's pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The pattern must be fully matched; extra typed words are arguments.
    AtLeastAsLong,
    /// Like [`MatchMode::ExactOnly`], but a mismatch on the last word of
    /// both sides is tolerated. Used to suggest a close command.
    AlmostExact,
    /// Typed words and pattern must line up exactly.
    ExactOnly,
}

/// Returns the entry of `entries` that best matches `words`.
///
/// An exact match wins immediately. Otherwise the accepted candidate with
/// the most matched typed words wins, the earliest one on ties.
pub fn resolve<'a, S: AsRef<str>>(
    entries: &'a [Arc<CommandEntry>],
    words: &[S],
    mode: MatchMode,
) -> Option<&'a Arc<CommandEntry>> {
    let mut best: Option<(&'a Arc<CommandEntry>, usize)> = None;

    for entry in entries {
        let pattern = entry.pattern();
        let (mut src, mut dst) = (0, 0);
        while let Some(pattern_word) = pattern.get(dst) {
            let typed = words.get(src).map_or("", AsRef::as_ref);
            let matched = match_word(typed, pattern_word);
            if !matched.is_match() {
                break;
            }
            src += matched.consumed();
            dst += 1;
        }

        let input_done = src >= words.len();
        let pattern_done = dst >= pattern.len()
            || (dst + 1 == pattern.len() && pattern[dst].starts_with('['));

        if pattern_done {
            if input_done {
                return Some(entry);
            }
            if mode != MatchMode::AtLeastAsLong {
                continue;
            }
        } else {
            if input_done {
                continue;
            }
            let last_word_mismatch = src + 1 == words.len() && dst + 1 == pattern.len();
            if mode != MatchMode::AlmostExact || !last_word_mismatch {
                continue;
            }
        }

        if best.is_none_or(|(_, matched)| src > matched) {
            best = Some((entry, src));
        }
    }

    best.map(|(entry, _)| entry)
}

/// Longest run of leading `words` that still resolves in
/// [`MatchMode::AlmostExact`] mode, plus the first word that did not.
pub fn closest_match<S: AsRef<str>>(entries: &[Arc<CommandEntry>], words: &[S]) -> String {
    let mut taken = 0;
    for end in 1..=words.len() {
        taken = end;
        if resolve(entries, &words[..end], MatchMode::AlmostExact).is_none() {
            break;
        }
    }
    words[..taken]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandId, CommandSpec};
    use crate::handler::{CommandStatus, handler_fn};

    fn table(patterns: &[&str]) -> Vec<Arc<CommandEntry>> {
        patterns
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let spec = CommandSpec::new(*p, handler_fn(|_| CommandStatus::Success));
                Arc::new(CommandEntry::from_spec(CommandId(i as u64), spec).unwrap())
            })
            .collect()
    }

    fn found(entries: &[Arc<CommandEntry>], words: &[&str], mode: MatchMode) -> Option<String> {
        resolve(entries, words, mode).map(|e| e.full_text().to_string())
    }

    #[test]
    fn test_exact_and_short_input() {
        let t = table(&["core show uptime"]);
        assert_eq!(
            found(&t, &["core", "show", "uptime"], MatchMode::AtLeastAsLong).as_deref(),
            Some("core show uptime")
        );
        assert_eq!(found(&t, &["core", "show"], MatchMode::AtLeastAsLong), None);
    }

    #[test]
    fn test_extra_words_only_at_least_as_long() {
        let t = table(&["module load"]);
        let words = ["module", "load", "chan_sip.so"];
        assert!(found(&t, &words, MatchMode::AtLeastAsLong).is_some());
        assert!(found(&t, &words, MatchMode::ExactOnly).is_none());
        assert!(found(&t, &words, MatchMode::AlmostExact).is_none());
    }

    #[test]
    fn test_trailing_optional_group() {
        let t = table(&["core show uptime [seconds]"]);
        for words in [
            &["core", "show", "uptime"][..],
            &["core", "show", "uptime", "seconds"][..],
        ] {
            assert!(found(&t, words, MatchMode::ExactOnly).is_some());
        }
    }

    #[test]
    fn test_groups_and_wildcards() {
        let t = table(&["sip set debug {on|off}", "sip show peer %"]);
        assert!(found(&t, &["SIP", "set", "debug", "OFF"], MatchMode::ExactOnly).is_some());
        assert!(found(&t, &["sip", "set", "debug", "maybe"], MatchMode::ExactOnly).is_none());
        assert!(found(&t, &["sip", "show", "peer", "alice"], MatchMode::ExactOnly).is_some());
    }

    #[test]
    fn test_almost_exact_last_word() {
        let t = table(&["core show uptime"]);
        assert!(found(&t, &["core", "show", "uptim"], MatchMode::AlmostExact).is_some());
        assert!(found(&t, &["core", "shw", "uptime"], MatchMode::AlmostExact).is_none());
        assert!(found(&t, &["core", "show", "uptim"], MatchMode::AtLeastAsLong).is_none());
    }

    #[test]
    fn test_longest_match_wins() {
        let t = table(&["core show", "core show uptime"]);
        assert_eq!(
            found(&t, &["core", "show", "uptime", "x"], MatchMode::AtLeastAsLong).as_deref(),
            Some("core show uptime")
        );
        assert_eq!(
            found(&t, &["core", "show", "x"], MatchMode::AtLeastAsLong).as_deref(),
            Some("core show")
        );
    }

    #[test]
    fn test_first_registered_wins_ties() {
        let t = table(&["dialplan show %", "dialplan show {hints|globals}"]);
        assert_eq!(
            found(&t, &["dialplan", "show", "hints", "x"], MatchMode::AtLeastAsLong).as_deref(),
            Some("dialplan show %")
        );
    }

    #[test]
    fn test_empty_input() {
        let t = table(&["core show uptime"]);
        let none: [&str; 0] = [];
        assert!(resolve(&t, &none, MatchMode::AtLeastAsLong).is_none());
    }

    #[test]
    fn test_closest_match() {
        let t = table(&["core show uptime", "core show help"]);
        assert_eq!(closest_match(&t, &["core", "show", "uptme", "now"]), "core");
        assert_eq!(closest_match(&t, &["foo", "bar"]), "foo");

        // Grows while a last-word mismatch still resolves.
        let t = table(&["help", "core show"]);
        assert_eq!(closest_match(&t, &["core", "shw", "x", "y"]), "core shw x");
    }
}
