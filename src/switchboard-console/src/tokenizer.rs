//! Splitting of raw command lines into words.

use tracing::warn;

/// Maximum number of words kept from a single line.
pub const MAX_ARGS: usize = 64;

/// A tokenized command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub words: Vec<String>,
    /// The line ended in unquoted, unescaped whitespace (or was blank).
    pub trailing_whitespace: bool,
    /// Words beyond [`MAX_ARGS`] were dropped.
    pub truncated: bool,
}

impl Tokens {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words joined by single spaces.
    pub fn joined(&self) -> String {
        self.words.join(" ")
    }
}

/// Splits `line` into words.
///
/// Spaces and tabs separate words. `"` toggles quoting and `\` takes the
/// next character literally. A quote opened at a word boundary starts a new
/// word even if it stays empty.
pub fn tokenize(line: &str) -> Tokens {
    let mut tokens = Tokens::default();
    let mut current: Option<String> = None;
    let mut quoted = false;
    let mut escaped = false;
    let mut whitespace = true;

    for c in line.trim_start_matches([' ', '\t', '\n', '\r']).chars() {
        let separator = matches!(c, ' ' | '\t') && !(quoted || escaped);
        let escape = c == '\\' && !escaped;
        if whitespace && !separator && !escape && tokens.words.len() >= MAX_ARGS {
            warn!(max = MAX_ARGS, line, "too many arguments, truncating");
            tokens.truncated = true;
            break;
        }

        match c {
            '"' if !escaped => {
                quoted = !quoted;
                if quoted && whitespace {
                    current = Some(String::new());
                    whitespace = false;
                }
            }
            ' ' | '\t' if !(quoted || escaped) => {
                if !whitespace {
                    tokens.words.extend(current.take());
                    whitespace = true;
                }
            }
            '\\' if !escaped => escaped = true,
            _ => {
                if whitespace {
                    current = Some(String::new());
                    whitespace = false;
                }
                if let Some(word) = current.as_mut() {
                    word.push(c);
                }
                escaped = false;
            }
        }
    }

    tokens.words.extend(current);
    tokens.trailing_whitespace = whitespace;
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(line: &str) -> Vec<String> {
        tokenize(line).words
    }

    #[test]
    fn test_quotes_and_escapes() {
        let tokens = tokenize("a \"b c\" d\\ e");
        assert_eq!(tokens.words, vec!["a", "b c", "d e"]);
        assert!(!tokens.trailing_whitespace);
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(words("  core \t show   uptime"), vec!["core", "show", "uptime"]);
    }

    #[test]
    fn test_trailing_whitespace() {
        assert!(tokenize("core show ").trailing_whitespace);
        assert!(tokenize("core show\t").trailing_whitespace);
        assert!(!tokenize("core show").trailing_whitespace);
        assert!(!tokenize("core \"show ").trailing_whitespace);
        assert!(!tokenize("core show\\ ").trailing_whitespace);
    }

    #[test]
    fn test_blank_line() {
        let tokens = tokenize("   ");
        assert!(tokens.is_empty());
        assert!(tokens.trailing_whitespace);
    }

    #[test]
    fn test_empty_quoted_word() {
        assert_eq!(words("set \"\" x"), vec!["set", "", "x"]);
    }

    #[test]
    fn test_quote_inside_word_joins() {
        assert_eq!(words("ab\"c d\"e f"), vec!["abc de", "f"]);
    }

    #[test]
    fn test_escaped_quote_and_backslash() {
        assert_eq!(words("say \\\"hi\\\" \\\\"), vec!["say", "\"hi\"", "\\"]);
    }

    #[test]
    fn test_escape_at_word_start() {
        assert_eq!(words("a \\ b"), vec!["a", " b"]);
    }

    #[test]
    fn test_truncation() {
        let line = (0..MAX_ARGS + 5)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let tokens = tokenize(&line);
        assert_eq!(tokens.len(), MAX_ARGS);
        assert!(tokens.truncated);
        assert_eq!(tokens.words.last().map(String::as_str), Some("63"));
    }

    #[test]
    fn test_joined() {
        assert_eq!(tokenize("  core   show ").joined(), "core show");
    }
}
