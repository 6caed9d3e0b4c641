//! Line Parser
//!
//! Turns one raw input line into an ordered list of command segments.
//! The grammar is small: `;` separates segments, a segment is either a
//! bare command, a two-stage pipe, or an output redirection. There is
//! no quoting, no escaping, and no variable expansion.
//!
//! The parser never executes anything and owns every string it returns;
//! it is pure apart from allocation.

mod types;

pub use types::{Segment, SegmentKind};

use crate::strings::{collapse_runs, replace_byte, rstrip_newline, split_on_any, strip_trailing};

const WORD_SEPARATORS: &str = " \t";

/// Parse one input line (trailing newline optional) into segments.
/// Segment order is execution order. Whitespace-only pieces between
/// `;` separators are dropped.
pub fn parse_line(line: &str) -> Vec<Segment> {
    split_on_any(line, ";")
        .iter()
        .filter_map(|piece| parse_piece(piece))
        .collect()
}

/// Normalise and classify a single `;`-delimited piece.
fn parse_piece(piece: &str) -> Option<Segment> {
    let cleaned = normalise(piece);
    if cleaned.chars().all(|c| c == ' ') {
        return None;
    }

    if let Some(at) = cleaned.find('|') {
        return Some(operator_segment(SegmentKind::Pipe, &cleaned[..at], &cleaned[at + 1..]));
    }
    if let Some(at) = find_append_operator(&cleaned) {
        return Some(operator_segment(
            SegmentKind::RedirectAppend,
            &cleaned[..at],
            &cleaned[at + 2..],
        ));
    }
    if let Some(at) = cleaned.find('>') {
        return Some(operator_segment(SegmentKind::Redirect, &cleaned[..at], &cleaned[at + 1..]));
    }

    Some(Segment::plain(split_on_any(&cleaned, WORD_SEPARATORS)))
}

/// Tabs become spaces, runs of spaces collapse to one, the trailing
/// newline and trailing spaces go away.
fn normalise(piece: &str) -> String {
    let untabbed = replace_byte(piece, '\t', ' ');
    let unterminated = rstrip_newline(&untabbed);
    let collapsed = collapse_runs(&unterminated, ' ');
    strip_trailing(&collapsed, ' ')
}

/// Byte offset of the first `>>` that is exactly two `>` long, meaning
/// neither preceded nor followed by another `>`. A `>>>` run never
/// counts.
fn find_append_operator(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (0..bytes.len().saturating_sub(1)).find(|&i| {
        bytes[i] == b'>'
            && bytes[i + 1] == b'>'
            && (i == 0 || bytes[i - 1] != b'>')
            && (i + 2 >= bytes.len() || bytes[i + 2] != b'>')
    })
}

fn operator_segment(kind: SegmentKind, lhs: &str, rhs: &str) -> Segment {
    let argv = split_on_any(lhs, WORD_SEPARATORS);
    let rhs_argv = split_on_any(rhs, WORD_SEPARATORS);
    let leading_empty = argv.is_empty();
    Segment { kind, argv, rhs_argv, leading_empty }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_command() {
        let segments = parse_line("ls -la\n");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Plain);
        assert_eq!(segments[0].argv, words(&["ls", "-la"]));
        assert!(segments[0].rhs_argv.is_empty());
        assert!(!segments[0].leading_empty);
    }

    #[test]
    fn test_tabs_and_space_runs() {
        let segments = parse_line("echo\t\thello    world\n");
        assert_eq!(segments[0].argv, words(&["echo", "hello", "world"]));
    }

    #[test]
    fn test_semicolon_separates_segments_in_order() {
        let segments = parse_line("setenv FOO bar ; env ; ls\n");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].argv[0], "setenv");
        assert_eq!(segments[1].argv[0], "env");
        assert_eq!(segments[2].argv[0], "ls");
    }

    #[test]
    fn test_trailing_and_empty_semicolons() {
        assert_eq!(parse_line("ls;\n").len(), 1);
        assert_eq!(parse_line(";;ls;;\n").len(), 1);
        assert_eq!(parse_line("; ; ;\n").len(), 0);
        assert_eq!(parse_line("   \n").len(), 0);
    }

    #[test]
    fn test_pipe_splits_on_first_bar() {
        let segments = parse_line("ls -la | cat\n");
        assert_eq!(segments.len(), 1);
        let segment = &segments[0];
        assert_eq!(segment.kind, SegmentKind::Pipe);
        assert_eq!(segment.argv, words(&["ls", "-la"]));
        assert_eq!(segment.rhs_argv, words(&["cat"]));
    }

    #[test]
    fn test_multi_pipe_keeps_downstream_verbatim() {
        let segments = parse_line("a | b | c\n");
        assert_eq!(segments[0].argv, words(&["a"]));
        assert_eq!(segments[0].rhs_argv, words(&["b", "|", "c"]));
    }

    #[test]
    fn test_redirect() {
        let segments = parse_line("echo hi > /tmp/out\n");
        let segment = &segments[0];
        assert_eq!(segment.kind, SegmentKind::Redirect);
        assert_eq!(segment.argv, words(&["echo", "hi"]));
        assert_eq!(segment.rhs_argv, words(&["/tmp/out"]));
    }

    #[test]
    fn test_redirect_append() {
        let segments = parse_line("echo hi >> /tmp/out\n");
        let segment = &segments[0];
        assert_eq!(segment.kind, SegmentKind::RedirectAppend);
        assert_eq!(segment.argv, words(&["echo", "hi"]));
        assert_eq!(segment.rhs_argv, words(&["/tmp/out"]));
    }

    #[test]
    fn test_triple_gt_is_not_append() {
        let segments = parse_line("echo hi >>> out\n");
        assert_eq!(segments[0].kind, SegmentKind::Redirect);
    }

    #[test]
    fn test_pipe_wins_over_redirect() {
        let segments = parse_line("ls > out | cat\n");
        assert_eq!(segments[0].kind, SegmentKind::Pipe);
    }

    #[test]
    fn test_leading_operator_sets_flag() {
        let segments = parse_line("> file\n");
        let segment = &segments[0];
        assert_eq!(segment.kind, SegmentKind::Redirect);
        assert!(segment.leading_empty);
        assert!(segment.argv.is_empty());
        assert_eq!(segment.rhs_argv, words(&["file"]));

        let segments = parse_line("| cat\n");
        assert!(segments[0].leading_empty);
    }

    #[test]
    fn test_empty_right_side_is_kept_for_executor() {
        let segments = parse_line("echo hi >\n");
        assert_eq!(segments[0].kind, SegmentKind::Redirect);
        assert!(segments[0].rhs_argv.is_empty());

        let segments = parse_line("echo hi >>\n");
        assert_eq!(segments[0].kind, SegmentKind::RedirectAppend);
        assert!(segments[0].rhs_argv.is_empty());
    }

    #[test]
    fn test_missing_trailing_newline_at_eof() {
        let segments = parse_line("ls");
        assert_eq!(segments[0].argv, words(&["ls"]));
    }

    #[test]
    fn test_exactly_one_kind_per_segment() {
        for line in ["ls", "ls | cat", "ls > f", "ls >> f"] {
            let segments = parse_line(line);
            assert_eq!(segments.len(), 1);
        }
    }

    #[test]
    fn test_parse_is_referentially_transparent() {
        let line = "ls -la | cat ; echo done > /tmp/x\n";
        assert_eq!(parse_line(line), parse_line(line));
    }
}
