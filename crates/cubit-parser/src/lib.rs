mod error;
mod lexer;
mod macros;
mod parser;
mod span;
mod token;
pub mod ast;

pub use error::*;
pub use lexer::*;
pub use parser::*;
pub use span::*;
pub use token::*;
