//! Parse state: the undecided-name slot and pending contexts.

use aq_lexer::Keyword;
use smallvec::SmallVec;

/// A bare name whose meaning depends on the next token.
///
/// An identifier followed by `(` starts a call; otherwise it is a parameter
/// reference. A keyword must be followed by `(`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Undecided<'src> {
    #[default]
    Empty,
    Ident {
        name: &'src str,
        offset: usize,
    },
    Keyword {
        keyword: Keyword,
        offset: usize,
    },
}

impl<'src> Undecided<'src> {
    /// Take the slot's content, leaving it empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Undecided::Empty)
    }

    /// The pending name's source text, for diagnostics.
    pub fn text(&self) -> &'src str {
        match self {
            Undecided::Empty => "",
            Undecided::Ident { name, .. } => name,
            Undecided::Keyword { keyword, .. } => keyword.as_str(),
        }
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            Undecided::Empty => None,
            Undecided::Ident { offset, .. } | Undecided::Keyword { offset, .. } => Some(*offset),
        }
    }
}

/// An open bracket that has not been closed yet.
#[derive(Debug)]
pub(crate) struct PendingEntry<'src> {
    pub kind: EntryKind<'src>,
    /// Offset of the name (calls, operators) or of the bracket (groups).
    pub offset: usize,
    /// Address of the instruction producing each argument value, in push order.
    pub args: SmallVec<[usize; 4]>,
}

impl<'src> PendingEntry<'src> {
    pub fn new(kind: EntryKind<'src>, offset: usize) -> Self {
        PendingEntry {
            kind,
            offset,
            args: SmallVec::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum EntryKind<'src> {
    Call { name: &'src str },
    Operator(OperatorState),
    Group,
}

/// Lowering state of an `if`/`while` context.
#[derive(Debug)]
pub(crate) struct OperatorState {
    pub keyword: Keyword,
    /// Address where the operator's code begins (loop head for `while`).
    pub start: usize,
    /// Operator arguments closed by a comma so far.
    pub completed: usize,
    /// Value of `args.len()` when the current operator argument began.
    pub mark: usize,
    /// Jumps still waiting for a forward target.
    pub pending_jumps: SmallVec<[usize; 2]>,
}

impl OperatorState {
    pub fn new(keyword: Keyword, start: usize) -> Self {
        OperatorState {
            keyword,
            start,
            completed: 0,
            mark: 0,
            pending_jumps: SmallVec::new(),
        }
    }
}
