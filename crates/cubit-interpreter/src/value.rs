use std::{
    fmt::{self, Display, Formatter},
    ptr,
    rc::Rc,
};

use cubit_parser::Span;

use crate::{builtins::BuiltinDef, Context, RuntimeError};

/// A runtime value together with where it came from.
///
/// The span and context are diagnostic metadata only: they are rebound whenever a value is read
/// from a variable or returned from a call, and never take part in comparisons.
#[derive(Debug, Clone)]
pub struct Value<'src> {
    pub kind: ValueKind<'src>,
    pub span: Span<'src>,
    pub context: Option<Rc<Context<'src>>>,
}

#[derive(Debug, Clone)]
pub enum ValueKind<'src> {
    Number(f64),
    String(String),
    List(Vec<Value<'src>>),
    Builtin(&'static BuiltinDef),
}

impl<'src> Value<'src> {
    pub const NULL: Self = Self::constant(0.0);
    pub const TRUE: Self = Self::constant(1.0);
    pub const FALSE: Self = Self::constant(0.0);

    const fn constant(num: f64) -> Self {
        Self {
            kind: ValueKind::Number(num),
            span: Span::dummy(),
            context: None,
        }
    }

    pub fn new(kind: ValueKind<'src>, span: Span<'src>, context: Option<Rc<Context<'src>>>) -> Self {
        Self {
            kind,
            span,
            context,
        }
    }

    pub fn number(num: f64) -> Self {
        Self::constant(num)
    }

    pub fn string(text: impl Into<String>) -> Self {
        ValueKind::String(text.into()).into()
    }

    pub fn list(elements: Vec<Value<'src>>) -> Self {
        ValueKind::List(elements).into()
    }

    pub fn builtin(def: &'static BuiltinDef) -> Self {
        ValueKind::Builtin(def).into()
    }

    pub fn with_span(mut self, span: Span<'src>) -> Self {
        self.span = span;
        self
    }

    pub fn with_context(mut self, context: &Rc<Context<'src>>) -> Self {
        self.context = Some(Rc::clone(context));
        self
    }

    /// Creates an error spanning from this value to `other`.
    pub(crate) fn error(&self, message: impl Into<String>, other: &Self) -> RuntimeError<'src> {
        RuntimeError::new(message, self.span.to(other.span), self.context.clone())
    }

    pub(crate) fn illegal(&self, other: &Self) -> RuntimeError<'src> {
        self.error("operation done is illegal", other)
    }
}

impl<'src> From<ValueKind<'src>> for Value<'src> {
    fn from(kind: ValueKind<'src>) -> Self {
        Self::new(kind, Span::dummy(), None)
    }
}

impl PartialEq for ValueKind<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::List(left), Self::List(right)) => {
                left.len() == right.len()
                    && left.iter().zip(right).all(|(left, right)| left.kind == right.kind)
            }
            (Self::Builtin(left), Self::Builtin(right)) => ptr::eq(*left, *right),
            _ => false,
        }
    }
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Display for ValueKind<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) if num.is_infinite() => {
                write!(f, "{}Infinity", if *num < 0.0 { "-" } else { "" })
            }
            // also covers negative zero
            Self::Number(num) if *num == 0.0 => write!(f, "0"),
            Self::Number(num) => write!(f, "{num}"),
            Self::String(text) => write!(f, "{text}"),
            Self::List(elements) => {
                write!(f, "[")?;
                for (idx, element) in elements.iter().enumerate() {
                    if idx != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
            Self::Builtin(def) => write!(f, "[function {}]", def.name),
        }
    }
}
