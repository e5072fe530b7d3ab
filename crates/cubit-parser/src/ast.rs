use std::borrow::Cow;

use crate::Span;

pub type Ident<'src> = Atom<'src, &'src str>;

#[derive(Debug, Clone, PartialEq)]
pub struct Program<'src> {
    pub span: Span<'src>,
    /// The top-level statements in source order, each one an expression
    pub statements: Vec<Expression<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'src> {
    Ident(Ident<'src>),
    Number(Atom<'src, f64>),
    String(Atom<'src, Cow<'src, str>>),
    Binary(Box<BinaryExpr<'src>>),
    Unary(Box<UnaryExpr<'src>>),
    List(ListExpr<'src>),
    Call(Box<CallExpr<'src>>),
    Assign(Box<AssignExpr<'src>>),
}

impl<'src> Expression<'src> {
    pub fn span(&self) -> Span<'src> {
        match self {
            Self::Ident(expr) => expr.span,
            Self::Number(expr) => expr.span,
            Self::String(expr) => expr.span,
            Self::Binary(expr) => expr.span,
            Self::Unary(expr) => expr.span,
            Self::List(expr) => expr.span,
            Self::Call(expr) => expr.span,
            Self::Assign(expr) => expr.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom<'src, T> {
    pub span: Span<'src>,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr<'src> {
    pub span: Span<'src>,
    pub lhs: Expression<'src>,
    pub op: BinaryOp,
    pub rhs: Expression<'src>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Mul,
    /// /
    Div,
    /// ^
    Pow,

    /// ==
    Eq,
    /// !=
    Neq,
    /// <
    Lt,
    /// <=
    Lte,
    /// >
    Gt,
    /// >=
    Gte,

    /// and
    And,
    /// or
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr<'src> {
    pub span: Span<'src>,
    pub op: UnaryOp,
    pub expr: Expression<'src>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// +
    Plus,
    /// -
    Neg,
    /// !
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListExpr<'src> {
    /// Covers the brackets as well as the elements
    pub span: Span<'src>,
    pub elements: Vec<Expression<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr<'src> {
    pub span: Span<'src>,
    pub callee: Expression<'src>,
    pub args: Vec<Expression<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr<'src> {
    pub span: Span<'src>,
    pub assignee: Ident<'src>,
    pub expr: Expression<'src>,
}
