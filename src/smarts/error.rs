use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmartsError {
    EmptyInput,
    UnexpectedChar { pos: usize, ch: char },
    UnclosedBracket { pos: usize },
    UnclosedRing { digit: u16 },
    UnmatchedParen { pos: usize },
    InvalidAtomicNum { pos: usize },
}

impl fmt::Display for SmartsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty SMARTS string"),
            Self::UnexpectedChar { pos, ch } => {
                write!(f, "unexpected character '{ch}' at position {pos}")
            }
            Self::UnclosedBracket { pos } => {
                write!(f, "unclosed bracket starting at position {pos}")
            }
            Self::UnclosedRing { digit } => write!(f, "unclosed ring {digit}"),
            Self::UnmatchedParen { pos } => {
                write!(f, "unmatched parenthesis at position {pos}")
            }
            Self::InvalidAtomicNum { pos } => {
                write!(f, "invalid atomic number at position {pos}")
            }
        }
    }
}

impl std::error::Error for SmartsError {}

/// Failure while serialising a molecular fragment to SMARTS.
///
/// These are hard errors: the enumerator propagates them instead of
/// guessing, and batch callers render them as `[error] ...` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    EmptyFragment,
    RingIndexOverflow,
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFragment => write!(f, "cannot serialise an empty fragment"),
            Self::RingIndexOverflow => {
                write!(f, "fragment needs more than 99 ring closures")
            }
        }
    }
}

impl std::error::Error for FragmentError {}
