use std::io::{self, BufRead};

use super::lexer::{Lexer, Token, TokenKind};
use crate::error::Diagnostics;
use crate::ir::ast::{self, BinaryOperator, Expression, ExpressionKind, Statement, StatementKind};
use crate::session::Session;

/// Predictive recursive-descent parser with one token of lookahead.
///
/// Syntax errors go to the session's diagnostics and never stop the parse:
/// a mismatched token is reported and skipped, and a position where no
/// production applies yields no node.
pub struct Parser<'s, R> {
    lexer: Lexer<'s, R>,
    current: Token,
    diagnostics: &'s mut Diagnostics,
}

impl<'s, R: BufRead> Parser<'s, R> {
    pub fn new(reader: R, session: &'s mut Session) -> Self {
        let Session { diagnostics, listing } = session;
        let mut lexer = Lexer::new(reader, listing);
        let current = lexer.next_token();
        Self { lexer, current, diagnostics }
    }

    /// Parses the whole token stream. Check the session for errors afterwards.
    pub fn parse(mut self) -> ast::Program {
        self.program()
    }

    /// Like `parse`, but hands back a read failure of the source.
    pub fn parse_checked(mut self) -> Result<ast::Program, io::Error> {
        let program = self.program();
        match self.lexer.take_io_error() {
            Some(err) => Err(err),
            None => Ok(program),
        }
    }

    fn program(&mut self) -> ast::Program {
        let statements = self.stmt_sequence();
        if self.current.kind != TokenKind::EndFile {
            self.syntax_error(format!("code ends before file -> {}", self.current));
        }
        ast::Program { statements }
    }

    fn stmt_sequence(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();
        statements.extend(self.statement());

        while !self.at_sequence_end() {
            statements.extend(self.statement());
        }

        statements
    }

    fn at_sequence_end(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::EndFile | TokenKind::EndIf | TokenKind::Else | TokenKind::Until | TokenKind::EndWhile
        )
    }

    fn statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::If => Some(self.if_stmt()),
            TokenKind::Repeat => Some(self.repeat_stmt()),
            TokenKind::Id => Some(self.assign_stmt()),
            TokenKind::Read => Some(self.read_stmt()),
            TokenKind::Write => Some(self.write_stmt()),
            TokenKind::While => Some(self.while_stmt()),
            _ => {
                self.syntax_error(format!("unexpected token (statement) -> {}", self.current));
                self.advance();
                None
            }
        }
    }

    fn if_stmt(&mut self) -> Statement {
        let line = self.current.line;
        self.expect(TokenKind::If);
        let test = self.exp();
        self.expect(TokenKind::Then);
        let then_branch = self.stmt_sequence();

        let else_branch = if self.current.kind == TokenKind::Else {
            self.advance(); // consume 'else'
            Some(self.stmt_sequence())
        } else {
            None
        };

        self.expect(TokenKind::EndIf);
        Statement::new(line, StatementKind::If { test, then_branch, else_branch })
    }

    fn repeat_stmt(&mut self) -> Statement {
        let line = self.current.line;
        self.expect(TokenKind::Repeat);
        let body = self.stmt_sequence();
        self.expect(TokenKind::Until);
        let test = self.exp();
        self.expect(TokenKind::Semi);
        Statement::new(line, StatementKind::Repeat { body, test })
    }

    fn while_stmt(&mut self) -> Statement {
        let line = self.current.line;
        self.expect(TokenKind::While);
        let test = self.exp();
        let body = self.stmt_sequence();
        self.expect(TokenKind::EndWhile);
        Statement::new(line, StatementKind::While { test, body })
    }

    fn assign_stmt(&mut self) -> Statement {
        let line = self.current.line;
        let name = self.identifier();
        self.expect(TokenKind::Assign);
        let value = self.exp();
        self.expect(TokenKind::Semi);
        Statement::new(line, StatementKind::Assign { name, value })
    }

    fn read_stmt(&mut self) -> Statement {
        let line = self.current.line;
        self.expect(TokenKind::Read);
        let name = self.identifier();
        self.expect(TokenKind::Semi);
        Statement::new(line, StatementKind::Read { name })
    }

    fn write_stmt(&mut self) -> Statement {
        let line = self.current.line;
        self.expect(TokenKind::Write);
        let value = self.exp();
        self.expect(TokenKind::Semi);
        Statement::new(line, StatementKind::Write { value })
    }

    /// exp -> simple-exp [ ("<" | "=") simple-exp ]
    fn exp(&mut self) -> Option<Expression> {
        let left = self.simple_exp();

        match comparison_operator(self.current.kind) {
            Some(op) => {
                let line = self.current.line;
                self.advance(); // consume operator
                let right = self.simple_exp();
                Some(Expression::op(line, op, left, right))
            }
            None => left,
        }
    }

    /// simple-exp -> term { ("+" | "-") term }
    fn simple_exp(&mut self) -> Option<Expression> {
        let mut left = self.term();

        while let Some(op) = additive_operator(self.current.kind) {
            let line = self.current.line;
            self.advance();
            let right = self.term();
            left = Some(Expression::op(line, op, left, right));
        }

        left
    }

    /// term -> factor { ("*" | "/") factor }
    fn term(&mut self) -> Option<Expression> {
        let mut left = self.factor();

        while let Some(op) = multiplicative_operator(self.current.kind) {
            let line = self.current.line;
            self.advance();
            let right = self.factor();
            left = Some(Expression::op(line, op, left, right));
        }

        left
    }

    /// factor -> number | identifier | "(" exp ")"
    fn factor(&mut self) -> Option<Expression> {
        let line = self.current.line;
        match self.current.kind {
            TokenKind::Num => {
                let value = match self.current.lexeme.parse::<i32>() {
                    Ok(value) => value,
                    Err(_) => {
                        self.syntax_error(format!("numeral out of range -> {}", self.current));
                        0
                    }
                };
                self.advance();
                Some(Expression::new(line, ExpressionKind::Const(value)))
            }
            TokenKind::Id => {
                let name = self.identifier();
                Some(Expression::new(line, ExpressionKind::Id(name)))
            }
            TokenKind::LParen => {
                self.advance(); // consume '('
                let inner = self.exp();
                self.expect(TokenKind::RParen);
                inner
            }
            _ => {
                self.syntax_error(format!("unexpected token (factor) -> {}", self.current));
                self.advance();
                None
            }
        }
    }

    // Helpers

    /// Takes the identifier under the lookahead. Empty name if it is missing.
    fn identifier(&mut self) -> String {
        let name = if self.current.kind == TokenKind::Id {
            self.current.lexeme.clone()
        } else {
            String::new()
        };
        self.expect(TokenKind::Id);
        name
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Consumes the lookahead, reporting it first if it is not `expected`.
    fn expect(&mut self, expected: TokenKind) {
        if self.current.kind != expected {
            self.syntax_error(format!("unexpected token -> {}", self.current));
        }
        self.advance();
    }

    fn syntax_error(&mut self, message: String) {
        tracing::debug!(line = self.current.line, %message, "syntax error");
        self.diagnostics.syntax(self.current.line, message);
    }
}

fn comparison_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Lt => Some(BinaryOperator::Lt),
        TokenKind::Eq => Some(BinaryOperator::Eq),
        _ => None,
    }
}

fn additive_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Subtract),
        _ => None,
    }
}

fn multiplicative_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Times => Some(BinaryOperator::Multiply),
        TokenKind::Over => Some(BinaryOperator::Divide),
        _ => None,
    }
}
