//! Parser Types
//!
//! A parsed line is an ordered list of segments. Each segment carries a
//! composition kind, the word-split left-hand side, and (for pipes and
//! redirections) the word-split right-hand side.

/// How a segment composes its command with the rest of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A bare command.
    Plain,
    /// `lhs | rhs`, split on the first `|`.
    Pipe,
    /// `lhs > file`, truncating.
    Redirect,
    /// `lhs >> file`, appending.
    RedirectAppend,
}

/// One `;`-delimited unit of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Arguments of the left-hand command. Empty when the segment
    /// begins with its operator.
    pub argv: Vec<String>,
    /// Downstream command (pipe) or redirect target words. Empty for
    /// `Plain` segments.
    pub rhs_argv: Vec<String>,
    /// Set when the segment starts with `|`, `>` or `>>` and has no
    /// left-hand command at all.
    pub leading_empty: bool,
}

impl Segment {
    pub fn plain(argv: Vec<String>) -> Self {
        Self { kind: SegmentKind::Plain, argv, rhs_argv: Vec::new(), leading_empty: false }
    }
}
