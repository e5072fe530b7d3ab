use std::{
    fmt::{self, Debug, Formatter},
    io::Write,
    rc::Rc,
};

use cubit_parser::Span;
use log::debug;

use crate::{Context, RuntimeError, RuntimeResult, Value, ValueKind};

/// The native operation behind a builtin.
///
/// It receives the context of the call, in which every parameter is bound to its argument,
/// the span of the call, and the sink for script output.
pub type BuiltinFn =
    for<'src> fn(&Rc<Context<'src>>, Span<'src>, &mut dyn Write) -> RuntimeResult<'src, Value<'src>>;

/// A host operation which can be called from scripts.
pub struct BuiltinDef {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub func: BuiltinFn,
}

impl Debug for BuiltinDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

pub static PRINT: BuiltinDef = BuiltinDef {
    name: "print",
    params: &["value"],
    func: print,
};

pub static GET: BuiltinDef = BuiltinDef {
    name: "get",
    params: &["list", "index"],
    func: get,
};

pub static APPEND: BuiltinDef = BuiltinDef {
    name: "append",
    params: &["list", "value"],
    func: append,
};

/// The builtins every interpreter starts with.
pub static DEFAULTS: [&BuiltinDef; 3] = [&PRINT, &GET, &APPEND];

impl<'src> Value<'src> {
    /// Calls this value with `args`.
    ///
    /// Only builtins can be called. The arguments are bound to the parameter names inside of a new
    /// context which shares the symbol table of the caller.
    pub fn execute(
        self,
        args: Vec<Value<'src>>,
        out: &mut dyn Write,
    ) -> RuntimeResult<'src, Value<'src>> {
        let def = match self.kind {
            ValueKind::Builtin(def) => def,
            _ => return Err(self.illegal(&self)),
        };

        if args.len() != def.params.len() {
            let problem = match args.len() < def.params.len() {
                true => "not enough",
                false => "too many",
            };
            return Err(RuntimeError::new(
                format!("{problem} arguments passed into {}", self.kind),
                self.span,
                self.context,
            ));
        }

        let context = Rc::new(match &self.context {
            Some(caller) => Context::child(def.name, caller, self.span),
            None => Context::new(def.name, Default::default()),
        });

        debug!("calling builtin `{}` with {} argument(s)", def.name, args.len());
        for (param, arg) in def.params.iter().zip(args) {
            context.bind(*param, arg.with_context(&context));
        }

        (def.func)(&context, self.span, out)
    }
}

/// Returns the argument bound to `param` in the context of a builtin call.
fn argument<'src>(
    context: &Rc<Context<'src>>,
    param: &str,
    span: Span<'src>,
) -> RuntimeResult<'src, Value<'src>> {
    context.lookup(param).ok_or_else(|| {
        RuntimeError::new(
            format!("{param} is not defined"),
            span,
            Some(Rc::clone(context)),
        )
    })
}

fn print<'src>(
    context: &Rc<Context<'src>>,
    span: Span<'src>,
    out: &mut dyn Write,
) -> RuntimeResult<'src, Value<'src>> {
    let value = argument(context, "value", span)?;
    writeln!(out, "{value}").map_err(|err| {
        RuntimeError::new(
            format!("Failed to print: {err}"),
            span,
            Some(Rc::clone(context)),
        )
    })?;
    Ok(Value::NULL)
}

fn get<'src>(
    context: &Rc<Context<'src>>,
    span: Span<'src>,
    _out: &mut dyn Write,
) -> RuntimeResult<'src, Value<'src>> {
    let fail = |message: String| RuntimeError::new(message, span, Some(Rc::clone(context)));

    let mut elements = match argument(context, "list", span)?.kind {
        ValueKind::List(elements) => elements,
        _ => return Err(fail("Argument #1 must be list".to_string())),
    };
    let index = match argument(context, "index", span)?.kind {
        ValueKind::Number(index) => index,
        _ => return Err(fail("Argument #2 must be number".to_string())),
    };

    if index < 0.0 || index.fract() != 0.0 || index >= elements.len() as f64 {
        return Err(fail(format!(
            "Failed to index: index {} out of range for list of length {}",
            ValueKind::Number(index),
            elements.len()
        )));
    }
    Ok(elements.swap_remove(index as usize))
}

fn append<'src>(
    context: &Rc<Context<'src>>,
    span: Span<'src>,
    _out: &mut dyn Write,
) -> RuntimeResult<'src, Value<'src>> {
    let list = argument(context, "list", span)?;
    let mut elements = match list.kind {
        ValueKind::List(elements) => elements,
        _ => {
            return Err(RuntimeError::new(
                "Argument #1 must be list",
                span,
                Some(Rc::clone(context)),
            ))
        }
    };
    elements.push(argument(context, "value", span)?);
    Ok(Value::new(ValueKind::List(elements), span, list.context))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::SymbolTable;

    fn root() -> Rc<Context<'static>> {
        Rc::new(Context::new(
            "{ program }",
            Rc::new(RefCell::new(SymbolTable::new())),
        ))
    }

    fn call(
        def: &'static BuiltinDef,
        args: Vec<Value<'static>>,
    ) -> (RuntimeResult<'static, Value<'static>>, String) {
        let root = root();
        let mut out: Vec<u8> = vec![];
        let res = Value::builtin(def)
            .with_context(&root)
            .execute(args, &mut out);
        // break the reference cycle between the bound arguments and their context
        root.symbol_table.borrow_mut().clear();
        (res, String::from_utf8(out).expect("output should be valid utf-8"))
    }

    fn error_message(res: RuntimeResult<Value>) -> String {
        match res {
            Ok(value) => panic!("expected an error, got `{value}`"),
            Err(err) => err.message,
        }
    }

    #[test]
    fn print_writes_display_form() {
        let (res, out) = call(
            &PRINT,
            vec![Value::list(vec![Value::number(1.5), Value::string("a")])],
        );
        assert_eq!(
            res.map(|v| v.kind).map_err(|err| err.message),
            Ok(ValueKind::Number(0.0))
        );
        assert_eq!(out, "[1.5, a]\n");
    }

    #[test]
    fn get_element() {
        let list = Value::list(vec![Value::number(2.0), Value::string("b")]);
        let (res, _) = call(&GET, vec![list.clone(), Value::number(1.0)]);
        assert_eq!(
            res.map(|v| v.kind).map_err(|err| err.message),
            Ok(ValueKind::String("b".to_string()))
        );

        for index in [-1.0, 2.0, 0.5] {
            let (res, _) = call(&GET, vec![list.clone(), Value::number(index)]);
            assert_eq!(
                error_message(res),
                format!(
                    "Failed to index: index {} out of range for list of length 2",
                    ValueKind::Number(index)
                )
            );
        }
    }

    #[test]
    fn get_type_errors() {
        let (res, _) = call(&GET, vec![Value::number(1.0), Value::number(0.0)]);
        assert_eq!(error_message(res), "Argument #1 must be list");

        let (res, _) = call(&GET, vec![Value::list(vec![]), Value::string("0")]);
        assert_eq!(error_message(res), "Argument #2 must be number");
    }

    #[test]
    fn append_returns_new_list() {
        let list = Value::list(vec![Value::number(1.0)]);
        let (res, _) = call(&APPEND, vec![list.clone(), Value::string("x")]);
        assert_eq!(
            res.map(|v| v.kind).map_err(|err| err.message),
            Ok(ValueKind::List(vec![Value::number(1.0), Value::string("x")]))
        );
        assert_eq!(list.kind, ValueKind::List(vec![Value::number(1.0)]));

        let (res, _) = call(&APPEND, vec![Value::string("x"), Value::number(1.0)]);
        assert_eq!(error_message(res), "Argument #1 must be list");
    }

    #[test]
    fn arity() {
        let (res, out) = call(&PRINT, vec![]);
        assert_eq!(
            error_message(res),
            "not enough arguments passed into [function print]"
        );
        assert!(out.is_empty());

        let (res, _) = call(&GET, vec![Value::NULL, Value::NULL, Value::NULL]);
        assert_eq!(
            error_message(res),
            "too many arguments passed into [function get]"
        );
    }

    #[test]
    fn only_builtins_are_callable() {
        let res = Value::number(1.0).execute(vec![], &mut Vec::<u8>::new());
        assert_eq!(error_message(res), "operation done is illegal");
    }

    #[test]
    fn error_context_is_the_call() {
        let (res, _) = call(&GET, vec![Value::NULL, Value::NULL]);
        let err = res.expect_err("indexing a number should fail");
        let context = err.context.expect("error should have a context");
        assert_eq!(context.name, "get");
        assert_eq!(
            context.parent.as_ref().map(|parent| parent.name.as_str()),
            Some("{ program }")
        );
    }
}
