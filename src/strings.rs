//! String Utilities
//!
//! Small pure helpers the parser composes to clean up a raw input line
//! before classification. All of them allocate a fresh `String` or
//! `Vec<String>` and never mutate their input.

/// Split `s` on any character in `seps`, collapsing runs of separators
/// and discarding leading and trailing ones. Never yields empty tokens.
pub fn split_on_any(s: &str, seps: &str) -> Vec<String> {
    s.split(|c| seps.contains(c))
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Concatenate two string slices into a newly owned string.
pub fn concat(a: &str, b: &str) -> String {
    let mut out = String::with_capacity(a.len() + b.len());
    out.push_str(a);
    out.push_str(b);
    out
}

/// Remove every trailing occurrence of `ch`.
pub fn strip_trailing(s: &str, ch: char) -> String {
    s.trim_end_matches(ch).to_string()
}

/// Replace every occurrence of `from` with `to`.
pub fn replace_byte(s: &str, from: char, to: char) -> String {
    s.replace(from, &to.to_string())
}

/// Collapse every maximal run of `ch` into a single `ch`.
pub fn collapse_runs(s: &str, ch: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_was_sep = false;
    for c in s.chars() {
        if c == ch {
            if !previous_was_sep {
                out.push(c);
            }
            previous_was_sep = true;
        } else {
            out.push(c);
            previous_was_sep = false;
        }
    }
    out
}

/// Remove at most one trailing newline.
pub fn rstrip_newline(s: &str) -> String {
    s.strip_suffix('\n').unwrap_or(s).to_string()
}
