use std::{
    borrow::Cow,
    fmt::{self, Debug, Display, Formatter},
};

use crate::Span;

#[derive(Clone, PartialEq, Default)]
pub struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub span: Span<'src>,
}

impl<'src> Debug for Token<'src> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<15} (l:{}:{} -- l:{}:{})",
            format!("{:?}", self.kind),
            self.span.start.line,
            self.span.start.column,
            self.span.end.line,
            self.span.end.column
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenKind<'src> {
    #[default]
    Eof,

    /// A normalized numeral, e.g. `.5` is scanned as `0.5`
    Number(Cow<'src, str>),
    /// The contents of a string literal with all escapes resolved
    String(Cow<'src, str>),
    Ident(&'src str),

    Let,
    And,
    Or,

    LParen,
    RParen,
    LBracket,
    RBracket,

    Comma,
    Semicolon,

    Not,
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    Assign,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl<'src> TokenKind<'src> {
    pub fn spanned(self, span: Span<'src>) -> Token<'src> {
        Token { kind: self, span }
    }

    /// Looks up the token kind of a one character operator.
    pub(crate) fn operator(char: char) -> Option<Self> {
        Some(match char {
            '+' => Self::Plus,
            '-' => Self::Minus,
            '*' => Self::Star,
            '/' => Self::Slash,
            '!' => Self::Not,
            '=' => Self::Assign,
            ',' => Self::Comma,
            '<' => Self::Lt,
            '>' => Self::Gt,
            '^' => Self::Pow,
            ';' => Self::Semicolon,
            '(' => Self::LParen,
            ')' => Self::RParen,
            '[' => Self::LBracket,
            ']' => Self::RBracket,
            _ => return None,
        })
    }

    /// Combines a one character operator with the following character if they form one
    /// of the two character operators.
    pub(crate) fn combine(&self, next: char) -> Option<Self> {
        Some(match (self, next) {
            (Self::Assign, '=') => Self::Eq,
            (Self::Not, '=') => Self::Neq,
            (Self::Lt, '=') => Self::Lte,
            (Self::Gt, '=') => Self::Gte,
            _ => return None,
        })
    }
}

impl Display for TokenKind<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "EOF"),
            Self::Number(num) => write!(f, "{num}"),
            Self::String(str) => write!(f, "{str:?}"),
            Self::Ident(ident) => write!(f, "{ident}"),
            Self::Let => write!(f, "let"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Not => write!(f, "!"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Pow => write!(f, "^"),
            Self::Assign => write!(f, "="),
            Self::Eq => write!(f, "=="),
            Self::Neq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Lte => write!(f, "<="),
            Self::Gte => write!(f, ">="),
        }
    }
}
