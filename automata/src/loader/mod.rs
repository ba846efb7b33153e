use crate::automatan::{Alphabet, Symbol, Verdict};
use crate::loader::log::LogSink;

pub mod lexer;
pub mod log;

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span(pub usize, pub usize);

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub struct Spanned<T>(pub T, pub Span);

/// The input held characters outside the alphabet. Reported before any
/// simulation state exists.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid character {character:?} at {position}, expression must contain only {alphabet}")]
pub struct InvalidAlphabet {
    pub alphabet: Alphabet,
    /// First offending character and its byte offset.
    pub character: char,
    pub position: usize,
    /// Every offending character, in input order.
    pub offending: Vec<Spanned<char>>,
}

impl InvalidAlphabet {
    pub fn verdict(&self) -> Verdict {
        Verdict::Rejected
    }

    /// Emits one error per offending character, the last one carrying a
    /// help entry naming the markers.
    pub fn report(&self, sink: &mut impl LogSink) {
        let mut offending = self.offending.iter().peekable();
        while let Some(Spanned(char, span)) = offending.next() {
            let entry = sink.emit_error(format!("invalid character {char:?}"), *span);
            if offending.peek().is_none() {
                entry.emit_help_locless(format!("expression must contain only {}", self.alphabet));
            }
        }
    }
}

/// Maps every character of `input` onto the alphabet, failing with all of
/// the offending characters if any exist.
pub fn load(input: &str, alphabet: &Alphabet) -> Result<Vec<Symbol>, InvalidAlphabet> {
    let mut symbols = Vec::with_capacity(input.len());
    let mut offending = Vec::new();
    for Spanned(token, span) in lexer::Lexer::new(input, alphabet) {
        match token {
            Ok(symbol) => symbols.push(symbol),
            Err(lexer::Error::InvalidChar(char)) => offending.push(Spanned(char, span)),
        }
    }
    let Some(Spanned(character, Span(position, _))) = offending.first().copied() else {
        return Ok(symbols);
    };
    ::log::debug!("{} invalid character(s) in {input:?}", offending.len());
    Err(InvalidAlphabet {
        alphabet: *alphabet,
        character,
        position,
        offending,
    })
}
