use std::fmt::Display;

use crate::dual_enum_serde;

pub mod dpda;
pub mod trace;

pub const BOTTOM_NAME: &str = "Z0";
pub const RUNNING_NAME: &str = "q0";
pub const ERROR_NAME: &str = "q_err";
pub const EPSILON: &str = "ε";

/// Input alphabet. Every character of an input maps to one of these or the
/// whole input is rejected before simulation starts.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Symbol {
    Open,
    Close,
}

/// Stack alphabet. `Bottom` only ever exists as the deepest element.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StackSymbol {
    Open,
    Bottom,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum State {
    Running,
    /// Terminal, nothing leaves it.
    Error,
}

dual_enum_serde! {
    {#[serde(rename_all = "snake_case")]}
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
    pub enum Verdict {
        Accepted,
        Rejected,
    }
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The `YES` / `NO` convention the driver prints.
    pub fn as_answer(self) -> &'static str {
        match self {
            Verdict::Accepted => "YES",
            Verdict::Rejected => "NO",
        }
    }
}

impl Display for StackSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackSymbol::Open => write!(f, "{}", Alphabet::DEFAULT_OPEN),
            StackSymbol::Bottom => write!(f, "{BOTTOM_NAME}"),
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Running => write!(f, "{RUNNING_NAME}"),
            State::Error => write!(f, "{ERROR_NAME}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AlphabetError {
    #[error("open and close markers must differ, both are {0:?}")]
    SameMarker(char),
}

/// The two literal characters standing for [`Symbol::Open`] and
/// [`Symbol::Close`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawAlphabet")
)]
pub struct Alphabet {
    open: char,
    close: char,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAlphabet {
    open: char,
    close: char,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAlphabet> for Alphabet {
    type Error = AlphabetError;

    fn try_from(raw: RawAlphabet) -> Result<Self, Self::Error> {
        Alphabet::new(raw.open, raw.close)
    }
}

impl Alphabet {
    pub const DEFAULT_OPEN: char = 'P';
    pub const DEFAULT_CLOSE: char = '0';

    pub fn new(open: char, close: char) -> Result<Self, AlphabetError> {
        if open == close {
            return Err(AlphabetError::SameMarker(open));
        }
        Ok(Self { open, close })
    }

    pub fn open(&self) -> char {
        self.open
    }

    pub fn close(&self) -> char {
        self.close
    }

    pub fn symbols(&self) -> [Symbol; 2] {
        [Symbol::Open, Symbol::Close]
    }

    pub fn letter(&self, char: char) -> Option<Symbol> {
        if char == self.open {
            Some(Symbol::Open)
        } else if char == self.close {
            Some(Symbol::Close)
        } else {
            None
        }
    }

    pub fn char_of(&self, symbol: Symbol) -> char {
        match symbol {
            Symbol::Open => self.open,
            Symbol::Close => self.close,
        }
    }

    pub fn stack_name(&self, symbol: StackSymbol) -> String {
        match symbol {
            StackSymbol::Open => self.open.to_string(),
            StackSymbol::Bottom => BOTTOM_NAME.to_string(),
        }
    }

    pub fn spell(&self, symbols: &[Symbol]) -> String {
        symbols.iter().map(|s| self.char_of(*s)).collect()
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' and '{}'", self.open, self.close)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            open: Self::DEFAULT_OPEN,
            close: Self::DEFAULT_CLOSE,
        }
    }
}
