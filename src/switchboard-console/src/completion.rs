//! Tab completion.
//!
//! Candidates are numbered across the whole registry: entries are visited in
//! registry order and each one contributes the pattern alternatives that
//! extend the word under the cursor, then whatever its handler suggests once
//! its fixed words are used up. Asking for candidate 0, 1, 2, ... therefore
//! cycles through a stable list.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{error, warn};

use crate::command::CommandEntry;
use crate::component::OwnerGuard;
use crate::console::Console;
use crate::handler::SuggestArgs;
use crate::pattern::{cmp_ignore_case, is_prefix, match_word};
use crate::tokenizer::tokenize;

/// Upper bound on candidates gathered by one [`Console::complete_all`].
pub const MAX_CANDIDATES: usize = 4096;

thread_local! {
    static SESSION_ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Candidates gathered for a single completion request.
///
/// Candidates are kept in case-insensitive order as they arrive. Only one
/// session may be open per thread at a time.
#[derive(Debug)]
pub struct CompletionSession {
    candidates: Vec<String>,
    was_active: bool,
}

#[allow(clippy::new_without_default)]
impl CompletionSession {
    /// Opens the session for the current thread.
    pub fn new() -> Self {
        let was_active = SESSION_ACTIVE.with(|active| active.replace(true));
        debug_assert!(!was_active, "nested completion session on the same thread");
        Self {
            candidates: Vec::new(),
            was_active,
        }
    }

    /// Insert `candidate` after any candidate that sorts equal to it.
    pub fn add(&mut self, candidate: String) {
        let index = self
            .candidates
            .partition_point(|c| cmp_ignore_case(c, &candidate).is_le());
        self.candidates.insert(index, candidate);
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Drops case-insensitive duplicates and prepends the longest common
    /// prefix when there is one and more than one candidate.
    pub fn finish(mut self) -> Vec<String> {
        let mut candidates = std::mem::take(&mut self.candidates);
        candidates.dedup_by(|b, a| a.eq_ignore_ascii_case(b));

        if candidates.len() > 1 {
            let prefix = common_prefix(&candidates);
            if !prefix.is_empty() {
                candidates.insert(0, prefix);
            }
        }
        candidates
    }
}

impl Drop for CompletionSession {
    fn drop(&mut self) {
        SESSION_ACTIVE.with(|active| active.set(self.was_active));
    }
}

/// Longest case-insensitive common prefix, spelled like the first candidate.
fn common_prefix(candidates: &[String]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };
    let mut len = first.len();
    for other in rest {
        len = first.as_bytes()[..len]
            .iter()
            .zip(other.as_bytes())
            .take_while(|(a, b)| a.eq_ignore_ascii_case(b))
            .count();
    }
    while !first.is_char_boundary(len) {
        len -= 1;
    }
    first[..len].to_string()
}

impl Console {
    /// Returns the `state`-th completion of `word` at the end of `line`.
    pub fn complete(&self, line: &str, word: &str, state: usize) -> Option<String> {
        generate(self, &self.registry().snapshot(), line, word, state)
    }

    /// Returns every completion of `word`, sorted and deduplicated, led by
    /// their longest common prefix when it is not empty.
    pub fn complete_all(&self, line: &str, word: &str) -> Vec<String> {
        let entries = self.registry().snapshot();
        let mut session = CompletionSession::new();
        for state in 0.. {
            if state == MAX_CANDIDATES {
                warn!(line, max = MAX_CANDIDATES, "too many completions, truncating");
                break;
            }
            match generate(self, &entries, line, word, state) {
                Some(candidate) => session.add(candidate),
                None => break,
            }
        }
        session.finish()
    }
}

fn generate(
    console: &Console,
    entries: &[Arc<CommandEntry>],
    line: &str,
    word: &str,
    state: usize,
) -> Option<String> {
    let tokens = tokenize(line);
    let argv: &[String] = &tokens.words;
    let argindex = if !word.is_empty() && !argv.is_empty() {
        argv.len() - 1
    } else {
        argv.len()
    };

    let mut matchstr = tokens.joined();
    if tokens.trailing_whitespace {
        matchstr.push(' ');
    }

    let mut matchnum = 0;
    for entry in entries.iter().filter(|e| !e.is_internal()) {
        let pattern = entry.pattern();
        let (mut src, mut dst) = (0, 0);
        while src < argindex && dst < pattern.len() {
            let matched = match_word(&argv[src], &pattern[dst]);
            if !matched.is_match() {
                break;
            }
            src += matched.consumed();
            dst += 1;
        }
        if src != argindex && entry.has_more_required_after(dst) {
            continue;
        }

        let typed = argv.get(src).map_or("", String::as_str);
        let prefix = match pattern.get(dst) {
            Some(pattern_word) => is_prefix(typed, pattern_word, state - matchnum),
            None => Default::default(),
        };
        matchnum += prefix.count;

        if let Some(candidate) = prefix.candidate {
            if matchnum > state {
                return Some(candidate);
            }
        } else if dst >= pattern.len() {
            let args = SuggestArgs {
                console,
                entry,
                line: &matchstr,
                word,
                pos: argindex,
                n: state - matchnum,
                argv,
            };
            if let Some(candidate) = suggest(entry, &args) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Calls the entry's handler in completion mode, holding its owner.
fn suggest(entry: &CommandEntry, args: &SuggestArgs<'_>) -> Option<String> {
    let _owner = OwnerGuard::enter(entry.owner())?;
    panic::catch_unwind(AssertUnwindSafe(|| entry.handler().suggest(args))).unwrap_or_else(|_| {
        error!(command = entry.full_text(), "command handler panicked while completing");
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn finish(candidates: &[&str]) -> Vec<String> {
        let mut session = CompletionSession::new();
        for c in candidates {
            session.add(c.to_string());
        }
        session.finish()
    }

    #[test]
    fn test_sorted_insert_and_prefix() {
        assert_eq!(finish(&["baz", "bar"]), vec!["ba", "bar", "baz"]);
    }

    #[test]
    fn test_case_insensitive_dedupe() {
        assert_eq!(finish(&["Show", "show", "set"]), vec!["s", "set", "Show"]);
    }

    #[test]
    fn test_single_candidate_has_no_prefix_entry() {
        assert_eq!(finish(&["uptime"]), vec!["uptime"]);
        assert_eq!(finish(&["uptime", "UPTIME"]), vec!["uptime"]);
    }

    #[test]
    fn test_empty_prefix_is_omitted() {
        assert_eq!(finish(&["core", "module"]), vec!["core", "module"]);
    }

    #[test]
    fn test_empty_session() {
        assert!(finish(&[]).is_empty());
    }

    #[test]
    fn test_prefix_keeps_first_spelling() {
        assert_eq!(finish(&["Peers", "peer"]), vec!["peer", "peer", "Peers"]);
    }

    #[test]
    fn test_prefix_respects_char_boundaries() {
        assert_eq!(common_prefix(&["aé".to_string(), "aè".to_string()]), "a");
    }

    #[test]
    fn test_sessions_can_follow_each_other() {
        drop(CompletionSession::new());
        let session = CompletionSession::new();
        assert!(session.is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "nested completion session")]
    fn test_nested_session_is_rejected() {
        let _outer = CompletionSession::new();
        let _inner = CompletionSession::new();
    }
}
