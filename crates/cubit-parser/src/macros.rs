#[macro_export]
macro_rules! tree {
    ((Program @ $start:literal .. $end:literal, [$($stmt:tt),* $(,)?])) => {
        Program {
            span: span!($start..$end),
            statements: vec![$(tree!($stmt)),*],
        }
    };

    ((Atom @ $start:literal .. $end:literal, $value:expr)) => {
        Atom {
            span: span!($start..$end),
            value: $value,
        }
    };
    ((Ident $($rest:tt)*)) => { Expression::Ident(tree!((Atom $($rest)*))) };
    ((Number $($rest:tt)*)) => { Expression::Number(tree!((Atom $($rest)*))) };
    ((String @ $start:literal .. $end:literal, $value:expr)) => {
        Expression::String(tree!((Atom @ $start..$end, $value.into())))
    };
    ((
        UnaryExpr @ $start:literal .. $end:literal,
        op: $op:ident,
        expr: $expr:tt $(,)?
    )) => {
        Expression::Unary(UnaryExpr {
            span: span!($start..$end),
            op: UnaryOp::$op,
            expr: tree!($expr),
        }.into())
    };
    ((
        BinaryExpr @ $start:literal .. $end:literal,
        lhs: $lhs:tt,
        op: $op:ident,
        rhs: $rhs:tt $(,)?
    )) => {
        Expression::Binary(BinaryExpr {
            span: span!($start..$end),
            lhs: tree!($lhs),
            op: BinaryOp::$op,
            rhs: tree!($rhs),
        }.into())
    };
    ((ListExpr @ $start:literal .. $end:literal, [$($elem:tt),* $(,)?])) => {
        Expression::List(ListExpr {
            span: span!($start..$end),
            elements: vec![$(tree!($elem)),*],
        })
    };
    ((
        CallExpr @ $start:literal .. $end:literal,
        callee: $callee:tt,
        args: [$($arg:tt),* $(,)?] $(,)?
    )) => {
        Expression::Call(CallExpr {
            span: span!($start..$end),
            callee: tree!($callee),
            args: vec![$(tree!($arg)),*],
        }.into())
    };
    ((
        AssignExpr @ $start:literal .. $end:literal,
        assignee: $assignee:tt,
        expr: $expr:tt $(,)?
    )) => {
        Expression::Assign(AssignExpr {
            span: span!($start..$end),
            assignee: tree!($assignee),
            expr: tree!($expr),
        }.into())
    };
}

#[macro_export]
macro_rules! tokens {
    ($($kind:ident $(($($tt:tt)*))? @ $start:literal .. $end:literal),* $(,)?) => {
        [$(TokenKind::$kind $(($($tt)*))? .spanned(span!($start..$end))),*]
    };
}
