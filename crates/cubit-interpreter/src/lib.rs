mod builtins;
mod error;
mod interpreter;
mod ops;
mod runtime;
mod value;

use std::fmt::{self, Debug, Display, Formatter};

pub use builtins::{BuiltinDef, BuiltinFn, APPEND, DEFAULTS, GET, PRINT};
pub use error::{RuntimeError, RuntimeResult};
pub use interpreter::Interpreter;
pub use runtime::{Context, SharedTable, SymbolTable};
pub use value::{Value, ValueKind};

/// Parses and runs cubit source code, printing to stdout.
/// The `Err(_)` variant returns a [`RunError`] for the first problem found.
pub fn run<'src>(text: &'src str, path: &'src str) -> Result<(), RunError<'src>> {
    let program = cubit_parser::parse(path, text)?;
    Interpreter::new().run(&program)?;
    Ok(())
}

pub enum RunError<'src> {
    Syntax(cubit_parser::Error<'src>),
    Runtime(RuntimeError<'src>),
}

impl<'src> From<cubit_parser::Error<'src>> for RunError<'src> {
    fn from(err: cubit_parser::Error<'src>) -> Self {
        Self::Syntax(err)
    }
}

impl<'src> From<RuntimeError<'src>> for RunError<'src> {
    fn from(err: RuntimeError<'src>) -> Self {
        Self::Runtime(err)
    }
}

impl Display for RunError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Syntax(err) => write!(f, "{err}"),
            RunError::Runtime(err) => write!(f, "{err}"),
        }
    }
}

impl Debug for RunError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Syntax(err) => write!(f, "{err:?}"),
            RunError::Runtime(err) => write!(f, "{err:?}"),
        }
    }
}

impl std::error::Error for RunError<'_> {}
