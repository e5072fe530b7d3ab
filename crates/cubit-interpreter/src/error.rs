use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use cubit_parser::{write_report, Span};

use crate::Context;

pub type RuntimeResult<'src, T> = Result<T, RuntimeError<'src>>;

#[derive(Debug, Clone)]
pub struct RuntimeError<'src> {
    pub message: String,
    pub span: Span<'src>,
    /// The context the error was raised in, the start of the traceback
    pub context: Option<Rc<Context<'src>>>,
}

impl<'src> RuntimeError<'src> {
    pub fn new(
        message: impl Into<String>,
        span: Span<'src>,
        context: Option<Rc<Context<'src>>>,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            context,
        }
    }

    /// Returns the `(path, 1-based line, context name)` of every frame, innermost first.
    pub fn traceback(&self) -> Vec<(&'src str, usize, &str)> {
        let mut frames = vec![];
        let mut span = Some(self.span);
        let mut context = self.context.as_deref();

        while let (Some(ctx), Some(site)) = (context, span) {
            frames.push((site.path(), site.start.line + 1, ctx.name.as_str()));
            span = ctx.parent_span;
            context = ctx.parent.as_deref();
        }

        frames
    }
}

impl Display for RuntimeError<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "traceback on:")?;
        for (path, line, name) in self.traceback() {
            writeln!(f, "\tFile '{path}' -> line {line} -> {name}")?;
        }
        writeln!(f)?;
        write_report(f, "Runtime error", &self.message, self.span)
    }
}

impl std::error::Error for RuntimeError<'_> {}
