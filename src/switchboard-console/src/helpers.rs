//! Helpers for command implementations.

use crate::pattern::starts_with_ignore_case;

/// Returns the `n`-th of `choices` that starts with `word`.
pub fn complete_choices<S: AsRef<str>>(word: &str, choices: &[S], n: usize) -> Option<String> {
    choices
        .iter()
        .map(AsRef::as_ref)
        .filter(|choice| starts_with_ignore_case(choice, word))
        .nth(n)
        .map(str::to_string)
}

/// Returns the `n`-th completion of a number in `min..=max` starting with
/// `partial`.
///
/// Candidates are the number itself, then each single digit appended to it,
/// then ranges of ten appended digits shown as `"123..."`.
pub fn complete_number(partial: &str, min: u64, max: u64, n: usize) -> Option<String> {
    let digits = partial
        .find(|c: char| !c.is_ascii_digit())
        .map_or(partial, |end| &partial[..end]);
    // Too many digits saturates, like strtoul.
    let part: u64 = if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(u64::MAX)
    };
    if part < min || part > max {
        return None;
    }

    let mut count = 0;
    for i in 0..21u64 {
        let (lo, hi) = if i == 0 {
            (part, part)
        } else if part == 0 && !partial.is_empty() {
            break;
        } else if i < 11 {
            let value = part.saturating_mul(10).saturating_add(i - 1);
            (value, value)
        } else {
            let lo = part
                .saturating_mul(10)
                .saturating_add(i - 11)
                .saturating_mul(10);
            (lo, lo.saturating_add(9))
        };

        let in_range = if i < 11 {
            lo >= min && lo <= max
        } else {
            hi >= min && lo <= max
        };
        if !in_range {
            continue;
        }

        count += 1;
        if count > n {
            return Some(if i < 11 {
                lo.to_string()
            } else {
                format!("{}...", lo / 10)
            });
        }
    }
    None
}

/// Spells out a number of seconds, like `1 week, 2 days, 1 second`.
pub fn format_duration(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;
    const WEEK: u64 = DAY * 7;
    const YEAR: u64 = DAY * 365;

    let mut rest = seconds;
    let mut parts = Vec::new();
    for (unit, name) in [
        (YEAR, "year"),
        (WEEK, "week"),
        (DAY, "day"),
        (HOUR, "hour"),
        (MINUTE, "minute"),
    ] {
        if rest > unit {
            let count = rest / unit;
            rest -= count * unit;
            parts.push(plural(count, name));
        }
    }
    if rest > 0 || parts.is_empty() {
        parts.push(plural(rest, "second"));
    }
    parts.join(", ")
}

fn plural(count: u64, name: &str) -> String {
    if count == 1 {
        format!("{count} {name}")
    } else {
        format!("{count} {name}s")
    }
}
