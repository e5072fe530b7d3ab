use std::mem;

use log::{debug, trace};

use crate::{ast::*, Error, ErrorKind, Lex, Lexer, Result, Span, Token, TokenKind};

/// Scans and parses `text` into a [`Program`], stopping at the first error.
pub fn parse<'src>(path: &'src str, text: &'src str) -> Result<'src, Program<'src>> {
    trace!("parsing `{path}`");
    let program = Parser::new(Lexer::new(path, text)).parse()?;
    debug!(
        "parsed {} statement(s) from `{path}`",
        program.statements.len()
    );
    Ok(program)
}

pub struct Parser<'src, Lexer: Lex<'src>> {
    lexer: Lexer,
    prev_tok: Token<'src>,
    curr_tok: Token<'src>,
}

type Operand<'src, L> = fn(&mut Parser<'src, L>) -> Result<'src, Expression<'src>>;

impl<'src, Lexer: Lex<'src>> Parser<'src, Lexer> {
    /// Creates a new Parser
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            // initialize with dummy Eof tokens
            prev_tok: Token::default(),
            curr_tok: Token::default(),
        }
    }

    /// Consumes this parser and tries to parse a [`Program`].
    ///
    /// There is no error recovery: the first lexical or syntactical error is returned.
    pub fn parse(mut self) -> Result<'src, Program<'src>> {
        self.next()?;
        self.program()
    }

    // moves cursor to next token
    fn next(&mut self) -> Result<'src, ()> {
        // swap prev_tok and curr_tok in memory so that what was curr_tok is now prev_tok
        mem::swap(&mut self.prev_tok, &mut self.curr_tok);
        // overwrite curr_tok (which is now what prev_tok was) with the next token from the lexer
        self.curr_tok = self.lexer.next_token()?;

        Ok(())
    }

    // expects the curr_tok to be of the specified kind and skips it
    fn expect(&mut self, kind: TokenKind<'src>, expected: &str) -> Result<'src, ()> {
        if self.curr_tok.kind != kind {
            return Err(self.invalid(expected, self.curr_tok.span));
        }
        self.next()
    }

    // fails if the input ended where more tokens were required
    fn reject_eof(&self, expected: &str) -> Result<'src, ()> {
        match self.curr_tok.kind {
            TokenKind::Eof => Err(self.invalid(expected, self.curr_tok.span)),
            _ => Ok(()),
        }
    }

    fn invalid(&self, expected: &str, span: Span<'src>) -> Error<'src> {
        Error::new(ErrorKind::InvalidSyntax, format!("Expected {expected}"), span)
    }

    //////////////////////////

    fn program(&mut self) -> Result<'src, Program<'src>> {
        let mut statements = vec![];

        while self.curr_tok.kind != TokenKind::Eof {
            // empty statements are skipped
            if self.curr_tok.kind == TokenKind::Semicolon {
                self.next()?;
                continue;
            }

            let statement = self.statement()?;
            if self.curr_tok.kind != TokenKind::Semicolon {
                return Err(self.invalid("statement to end with semicolon", statement.span()));
            }
            self.next()?;
            statements.push(statement);
        }

        let span = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => self.curr_tok.span,
        };
        Ok(Program { span, statements })
    }

    fn statement(&mut self) -> Result<'src, Expression<'src>> {
        let expr = self.expression()?;
        self.reject_eof("identifier, number, 'let', '+', '-', '[', '(', '!'")?;
        Ok(expr)
    }

    fn expression(&mut self) -> Result<'src, Expression<'src>> {
        if self.curr_tok.kind == TokenKind::Let {
            return self.let_expr();
        }

        let expr = self.binary_op(Self::comparison, Self::comparison, |kind| match kind {
            TokenKind::And => Some(BinaryOp::And),
            TokenKind::Or => Some(BinaryOp::Or),
            _ => None,
        })?;
        self.reject_eof("identifier, number, 'let', '+', '-', '[', '!', '('")?;
        Ok(expr)
    }

    fn let_expr(&mut self) -> Result<'src, Expression<'src>> {
        // skip let token: this function is only called when self.curr_tok.kind == TokenKind::Let
        self.next()?;

        let assignee = match self.curr_tok.kind {
            TokenKind::Ident(value) => Atom {
                span: self.curr_tok.span,
                value,
            },
            _ => return Err(self.invalid("identifier", self.curr_tok.span)),
        };
        self.next()?;

        self.expect(TokenKind::Assign, "'='")?;
        let expr = self.expression()?;

        Ok(Expression::Assign(
            AssignExpr {
                span: assignee.span.to(expr.span()),
                assignee,
                expr,
            }
            .into(),
        ))
    }

    fn comparison(&mut self) -> Result<'src, Expression<'src>> {
        if self.curr_tok.kind == TokenKind::Not {
            return self.unary_expr(UnaryOp::Not, Self::comparison);
        }

        let expr = self.binary_op(Self::arithmetic, Self::arithmetic, |kind| match kind {
            TokenKind::Eq => Some(BinaryOp::Eq),
            TokenKind::Neq => Some(BinaryOp::Neq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Lte => Some(BinaryOp::Lte),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::Gte => Some(BinaryOp::Gte),
            _ => None,
        })?;
        self.reject_eof("identifier, number, '!', '+', '-', '[', '('")?;
        Ok(expr)
    }

    fn arithmetic(&mut self) -> Result<'src, Expression<'src>> {
        self.binary_op(Self::term, Self::term, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Plus),
            TokenKind::Minus => Some(BinaryOp::Minus),
            _ => None,
        })
    }

    fn term(&mut self) -> Result<'src, Expression<'src>> {
        self.binary_op(Self::factor, Self::factor, |kind| match kind {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            _ => None,
        })
    }

    fn factor(&mut self) -> Result<'src, Expression<'src>> {
        match self.curr_tok.kind {
            TokenKind::Plus => self.unary_expr(UnaryOp::Plus, Self::factor),
            TokenKind::Minus => self.unary_expr(UnaryOp::Neg, Self::factor),
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<'src, Expression<'src>> {
        // the right hand side is a factor, which makes `^` right associative
        self.binary_op(Self::call, Self::factor, |kind| match kind {
            TokenKind::Pow => Some(BinaryOp::Pow),
            _ => None,
        })
    }

    fn call(&mut self) -> Result<'src, Expression<'src>> {
        let callee = self.atom()?;
        if self.curr_tok.kind != TokenKind::LParen {
            return Ok(callee);
        }

        // skip opening parenthesis
        self.next()?;

        let mut args = vec![];
        if self.curr_tok.kind != TokenKind::RParen {
            args.push(self.expression()?);

            while self.curr_tok.kind == TokenKind::Comma {
                self.next()?;
                args.push(self.expression()?);
            }
        }
        self.expect(TokenKind::RParen, "')', ','")?;

        let end = args.last().map_or(callee.span(), Expression::span);
        Ok(Expression::Call(
            CallExpr {
                span: callee.span().to(end),
                callee,
                args,
            }
            .into(),
        ))
    }

    fn atom(&mut self) -> Result<'src, Expression<'src>> {
        let span = self.curr_tok.span;
        let expr = match &self.curr_tok.kind {
            TokenKind::Number(numeral) => {
                let value = numeral.parse::<f64>().map_err(|_| {
                    Error::new(
                        ErrorKind::IllegalSyntax,
                        format!("'{numeral}' is not a valid number"),
                        span,
                    )
                })?;
                Expression::Number(Atom { span, value })
            }
            TokenKind::String(value) => Expression::String(Atom {
                span,
                value: value.clone(),
            }),
            TokenKind::Ident(value) => Expression::Ident(Atom {
                span,
                value: *value,
            }),
            TokenKind::LParen => return self.grouped_expr(),
            TokenKind::LBracket => return self.list_expr(),
            _ => {
                return Err(Error::new(
                    ErrorKind::IllegalSyntax,
                    "Expected number, identifier, string, '(', '['",
                    span,
                ))
            }
        };
        self.next()?;
        Ok(expr)
    }

    fn grouped_expr(&mut self) -> Result<'src, Expression<'src>> {
        // skip the opening parenthesis
        self.next()?;
        let expr = self.expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(expr)
    }

    fn list_expr(&mut self) -> Result<'src, Expression<'src>> {
        let start_loc = self.curr_tok.span.start;
        // skip the opening bracket
        self.next()?;

        let mut elements = vec![];
        if self.curr_tok.kind != TokenKind::RBracket {
            elements.push(self.expression()?);
            self.reject_eof("'let', number, identifier, '[', ']', '(', '+', '-', '!'")?;

            while self.curr_tok.kind == TokenKind::Comma {
                self.next()?;
                elements.push(self.expression()?);
            }
        }
        self.expect(TokenKind::RBracket, "']', ','")?;

        Ok(Expression::List(ListExpr {
            span: start_loc.until(self.prev_tok.span.end),
            elements,
        }))
    }

    fn unary_expr(
        &mut self,
        op: UnaryOp,
        operand: Operand<'src, Lexer>,
    ) -> Result<'src, Expression<'src>> {
        let start_loc = self.curr_tok.span.start;

        // skip the operator token
        self.next()?;

        let expr = operand(self)?;
        Ok(Expression::Unary(
            UnaryExpr {
                span: start_loc.until(expr.span().end),
                op,
                expr,
            }
            .into(),
        ))
    }

    // parses a left associative chain of binary operations
    fn binary_op(
        &mut self,
        lhs_operand: Operand<'src, Lexer>,
        rhs_operand: Operand<'src, Lexer>,
        operator: fn(&TokenKind<'src>) -> Option<BinaryOp>,
    ) -> Result<'src, Expression<'src>> {
        let mut lhs = lhs_operand(self)?;

        while let Some(op) = operator(&self.curr_tok.kind) {
            // skip the operator token
            self.next()?;
            let rhs = rhs_operand(self)?;
            lhs = Expression::Binary(
                BinaryExpr {
                    span: lhs.span().to(rhs.span()),
                    lhs,
                    op,
                    rhs,
                }
                .into(),
            );
        }

        Ok(lhs)
    }
}
