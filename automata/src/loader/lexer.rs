use crate::automatan::{Alphabet, Symbol};
use crate::loader::{Span, Spanned};

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum Error {
    InvalidChar(char),
}

/// Splits an input into alphabet symbols. Nothing is skipped, whitespace
/// included.
#[derive(Clone, Copy, Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    alphabet: &'a Alphabet,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, alphabet: &'a Alphabet) -> Self {
        Self {
            input,
            alphabet,
            position: 0,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let next = self.input.get(self.position..)?.chars().next()?;
        self.position += next.len_utf8();
        Some(next)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Spanned<Result<Symbol, Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.position;
        let char = self.consume()?;
        let span = Span(start, self.position);
        Some(match self.alphabet.letter(char) {
            Some(symbol) => Spanned(Ok(symbol), span),
            None => Spanned(Err(Error::InvalidChar(char)), span),
        })
    }
}
