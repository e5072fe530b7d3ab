use std::{borrow::Cow, iter::FusedIterator, mem, str::Chars};

use log::trace;

use crate::{Error, ErrorKind, Location, Result, Token, TokenKind};

pub trait Lex<'src> {
    fn next_token(&mut self) -> Result<'src, Token<'src>>;
}

/// Scans `text` lazily, one token per call to [`Iterator::next`] or [`Lex::next_token`].
///
/// The sequence is single-pass: scanning the same input again requires a new lexer.
pub fn tokenize<'src>(path: &'src str, text: &'src str) -> Lexer<'src> {
    trace!("scanning `{path}`");
    Lexer::new(path, text)
}

pub struct Lexer<'src> {
    input: &'src str,
    reader: Chars<'src>,
    location: Location<'src>,
    curr_char: Option<char>,
    next_char: Option<char>,
    exhausted: bool,
}

impl<'src> Lex<'src> for Lexer<'src> {
    fn next_token(&mut self) -> Result<'src, Token<'src>> {
        // skip whitespace and comments
        loop {
            match self.curr_char {
                Some(char) if char.is_whitespace() => self.advance(),
                Some('#') => self.skip_line_comment(),
                _ => break,
            }
        }

        let start_loc = self.location;
        match self.curr_char {
            None => Ok(TokenKind::Eof.spanned(start_loc.until(start_loc))),
            Some(char) => match TokenKind::operator(char) {
                Some(kind) => Ok(self.make_operator(kind)),
                None if char.is_ascii_digit() || char == '.' => Ok(self.make_number()),
                None if char.is_ascii_alphabetic() || char == '_' => Ok(self.make_name()),
                None if char == '\'' || char == '"' => Ok(self.make_string(char)),
                None => {
                    self.advance();
                    Err(Error::new(
                        ErrorKind::IllegalCharacter,
                        format!("'{char}'"),
                        start_loc.until(self.location),
                    ))
                }
            },
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<'src, Token<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.next_token() {
            Ok(Token {
                kind: TokenKind::Eof,
                ..
            }) => {
                self.exhausted = true;
                None
            }
            Err(err) => {
                self.exhausted = true;
                Some(Err(err))
            }
            item => Some(item),
        }
    }
}

impl FusedIterator for Lexer<'_> {}

impl<'src> Lexer<'src> {
    pub fn new(path: &'src str, text: &'src str) -> Self {
        let mut lexer = Self {
            input: text,
            reader: text.chars(),
            location: Location::new(path, text),
            curr_char: None,
            next_char: None,
            exhausted: false,
        };
        // advance the lexer twice so that curr_char and next_char are populated
        lexer.advance();
        lexer.advance();
        lexer
    }

    fn advance(&mut self) {
        if let Some(current_char) = self.curr_char {
            self.location
                .advance(current_char == '\n', current_char.len_utf8());
        }
        // swap the current and next char so that the old next is the new current
        mem::swap(&mut self.curr_char, &mut self.next_char);
        self.next_char = self.reader.next()
    }

    fn skip_line_comment(&mut self) {
        while !matches!(self.curr_char, Some('\n') | None) {
            self.advance()
        }
        self.advance();
    }

    fn make_operator(&mut self, kind: TokenKind<'src>) -> Token<'src> {
        let start_loc = self.location;
        self.advance();
        let kind = match self.curr_char.and_then(|next| kind.combine(next)) {
            Some(double) => {
                self.advance();
                double
            }
            None => kind,
        };
        kind.spanned(start_loc.until(self.location))
    }

    fn make_number(&mut self) -> Token<'src> {
        let start_loc = self.location;
        let mut seen_dot = false;

        while let Some(char) = self.curr_char {
            match char {
                '0'..='9' => {}
                // a second dot ends the number without being consumed
                '.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            self.advance();
        }

        let raw = &self.input[start_loc.byte_idx..self.location.byte_idx];
        let numeral = match (raw.starts_with('.'), raw.ends_with('.')) {
            (false, false) => Cow::Borrowed(raw),
            (leading, trailing) => Cow::Owned(format!(
                "{}{raw}{}",
                if leading { "0" } else { "" },
                if trailing { "0" } else { "" },
            )),
        };

        TokenKind::Number(numeral).spanned(start_loc.until(self.location))
    }

    fn make_name(&mut self) -> Token<'src> {
        let start_loc = self.location;
        while self
            .curr_char
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance()
        }
        let kind = match &self.input[start_loc.byte_idx..self.location.byte_idx] {
            "let" => TokenKind::Let,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            ident => TokenKind::Ident(ident),
        };
        kind.spanned(start_loc.until(self.location))
    }

    fn make_string(&mut self, quote: char) -> Token<'src> {
        let start_loc = self.location;
        // skip the opening quote
        self.advance();

        let content_start = self.location.byte_idx;
        let mut value = String::new();
        let mut escaped = false;

        // an unterminated string extends to the end of the input
        let content_end = loop {
            match self.curr_char {
                None => break self.location.byte_idx,
                Some(char) if char == quote => {
                    let end = self.location.byte_idx;
                    self.advance();
                    break end;
                }
                Some('\\') => {
                    escaped = true;
                    self.advance();
                    match self.curr_char {
                        Some('t') => value.push('\t'),
                        Some('n') => value.push('\n'),
                        Some(char) => value.push(char),
                        None => continue,
                    }
                    self.advance();
                }
                Some(char) => {
                    value.push(char);
                    self.advance();
                }
            }
        };

        let value = match escaped {
            true => Cow::Owned(value),
            false => Cow::Borrowed(&self.input[content_start..content_end]),
        };
        TokenKind::String(value).spanned(start_loc.until(self.location))
    }
}
