use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

use cubit_parser::ast::*;
use log::{debug, trace};

use crate::{
    builtins::{self, BuiltinDef},
    Context, RuntimeError, RuntimeResult, SymbolTable, Value, ValueKind,
};

type ExprResult<'src> = RuntimeResult<'src, Value<'src>>;

/// Evaluates programs by walking their syntax tree.
///
/// All programs run by the same interpreter share its global symbol table.
pub struct Interpreter<'src> {
    context: Rc<Context<'src>>,
    output: Box<dyn Write + 'src>,
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'src> Interpreter<'src> {
    /// Creates an interpreter with the default globals which prints to stdout.
    pub fn new() -> Self {
        let globals = Rc::new(RefCell::new(SymbolTable::new()));
        let mut interpreter = Self {
            context: Rc::new(Context::new("{ program }", globals)),
            output: Box::new(io::stdout()),
        };

        interpreter.define("null", Value::NULL);
        interpreter.define("true", Value::TRUE);
        interpreter.define("false", Value::FALSE);
        builtins::DEFAULTS
            .into_iter()
            .fold(interpreter, Self::with_builtin)
    }

    /// Redirects everything the program prints into `output`.
    pub fn with_output(mut self, output: impl Write + 'src) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Makes `builtin` callable under its name.
    pub fn with_builtin(mut self, builtin: &'static BuiltinDef) -> Self {
        self.define(builtin.name, Value::builtin(builtin));
        self
    }

    /// Binds a global variable, replacing any previous binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value<'src>) {
        self.context.bind(name, value)
    }

    pub fn lookup(&self, name: &str) -> Option<Value<'src>> {
        self.context.lookup(name)
    }

    pub fn run(&mut self, program: &Program<'src>) -> RuntimeResult<'src, ()> {
        trace!("running program `{}`", program.span.path());
        let context = Rc::clone(&self.context);
        for statement in &program.statements {
            self.visit_expression(statement, &context)?;
        }
        Ok(())
    }

    //////////////////////////////////

    fn visit_expression(
        &mut self,
        node: &Expression<'src>,
        context: &Rc<Context<'src>>,
    ) -> ExprResult<'src> {
        match node {
            Expression::Ident(node) => self.visit_ident(node, context),
            Expression::Number(node) => Ok(Value::new(
                ValueKind::Number(node.value),
                node.span,
                Some(Rc::clone(context)),
            )),
            Expression::String(node) => Ok(Value::new(
                ValueKind::String(node.value.to_string()),
                node.span,
                Some(Rc::clone(context)),
            )),
            Expression::Binary(node) => self.visit_binary_expr(node, context),
            Expression::Unary(node) => self.visit_unary_expr(node, context),
            Expression::List(node) => self.visit_list_expr(node, context),
            Expression::Call(node) => self.visit_call_expr(node, context),
            Expression::Assign(node) => self.visit_assign_expr(node, context),
        }
    }

    fn visit_ident(&mut self, node: &Ident<'src>, context: &Rc<Context<'src>>) -> ExprResult<'src> {
        match context.lookup(node.value) {
            Some(value) => Ok(value.with_span(node.span).with_context(context)),
            None => Err(RuntimeError::new(
                format!("{} is not defined", node.value),
                node.span,
                Some(Rc::clone(context)),
            )),
        }
    }

    fn visit_binary_expr(
        &mut self,
        node: &BinaryExpr<'src>,
        context: &Rc<Context<'src>>,
    ) -> ExprResult<'src> {
        // both sides are always evaluated, `and` and `or` do not short-circuit
        let lhs = self.visit_expression(&node.lhs, context)?;
        let rhs = self.visit_expression(&node.rhs, context)?;
        let res = match node.op {
            BinaryOp::Plus => lhs + rhs,
            BinaryOp::Minus => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.pow(rhs),
            BinaryOp::Eq => lhs.eq(rhs),
            BinaryOp::Neq => lhs.ne(rhs),
            BinaryOp::Lt => lhs.lt(rhs),
            BinaryOp::Lte => lhs.lte(rhs),
            BinaryOp::Gt => lhs.gt(rhs),
            BinaryOp::Gte => lhs.gte(rhs),
            BinaryOp::And => lhs.and(rhs),
            BinaryOp::Or => lhs.or(rhs),
        }?;
        Ok(res.with_span(node.span))
    }

    fn visit_unary_expr(
        &mut self,
        node: &UnaryExpr<'src>,
        context: &Rc<Context<'src>>,
    ) -> ExprResult<'src> {
        let operand = self.visit_expression(&node.expr, context)?;
        if !matches!(operand.kind, ValueKind::Number(_)) {
            return Err(RuntimeError::new(
                "unary expression must be on number",
                node.span,
                Some(Rc::clone(context)),
            ));
        }

        let res = match node.op {
            UnaryOp::Plus => operand,
            UnaryOp::Neg => (operand * Value::number(-1.0))?,
            UnaryOp::Not => (!operand)?,
        };
        Ok(res.with_span(node.span))
    }

    fn visit_list_expr(
        &mut self,
        node: &ListExpr<'src>,
        context: &Rc<Context<'src>>,
    ) -> ExprResult<'src> {
        let elements = node
            .elements
            .iter()
            .map(|expr| self.visit_expression(expr, context))
            .collect::<Result<_, _>>()?;
        Ok(Value::new(
            ValueKind::List(elements),
            node.span,
            Some(Rc::clone(context)),
        ))
    }

    fn visit_call_expr(
        &mut self,
        node: &CallExpr<'src>,
        context: &Rc<Context<'src>>,
    ) -> ExprResult<'src> {
        let callee = self
            .visit_expression(&node.callee, context)?
            .with_span(node.span);
        let args = node
            .args
            .iter()
            .map(|expr| self.visit_expression(expr, context))
            .collect::<Result<_, _>>()?;

        let res = callee.execute(args, &mut *self.output)?;
        Ok(res.with_span(node.span).with_context(context))
    }

    fn visit_assign_expr(
        &mut self,
        node: &AssignExpr<'src>,
        context: &Rc<Context<'src>>,
    ) -> ExprResult<'src> {
        let value = self.visit_expression(&node.expr, context)?;
        debug!("binding `{}` to `{value}`", node.assignee.value);
        context.bind(node.assignee.value, value.clone());
        Ok(value)
    }
}

impl Drop for Interpreter<'_> {
    fn drop(&mut self) {
        // values bound in the globals may point back to contexts sharing this table
        self.context.symbol_table.borrow_mut().clear();
        let _ = self.output.flush();
    }
}
