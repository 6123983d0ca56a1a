//! Indented, one-node-per-line rendering of the tree for the listing.

use std::fmt::Write;

use super::ast::{Expression, ExpressionKind, Program, Statement, StatementKind};

const INDENT: usize = 2;

pub fn render_tree(program: &Program) -> String {
    let mut printer = TreePrinter::default();
    printer.sequence(&program.statements, INDENT);
    printer.out
}

#[derive(Default)]
struct TreePrinter {
    out: String,
}

impl TreePrinter {
    fn line(&mut self, indent: usize, text: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{:indent$}{}", "", text, indent = indent);
    }

    fn sequence(&mut self, statements: &[Statement], indent: usize) {
        for statement in statements {
            self.statement(statement, indent);
        }
    }

    fn statement(&mut self, statement: &Statement, indent: usize) {
        let inner = indent + INDENT;
        match &statement.kind {
            StatementKind::If { test, then_branch, else_branch } => {
                self.line(indent, format_args!("If"));
                self.slot(test.as_ref(), inner);
                self.sequence(then_branch, inner);
                if let Some(else_branch) = else_branch {
                    self.sequence(else_branch, inner);
                }
            }
            StatementKind::Repeat { body, test } => {
                self.line(indent, format_args!("Repeat"));
                self.sequence(body, inner);
                self.slot(test.as_ref(), inner);
            }
            StatementKind::While { test, body } => {
                self.line(indent, format_args!("While"));
                self.slot(test.as_ref(), inner);
                self.sequence(body, inner);
            }
            StatementKind::Assign { name, value } => {
                self.line(indent, format_args!("Assign to: {name}"));
                self.slot(value.as_ref(), inner);
            }
            StatementKind::Read { name } => {
                self.line(indent, format_args!("Read: {name}"));
            }
            StatementKind::Write { value } => {
                self.line(indent, format_args!("Write"));
                self.slot(value.as_ref(), inner);
            }
        }
    }

    fn slot(&mut self, expression: Option<&Expression>, indent: usize) {
        if let Some(expression) = expression {
            self.expression(expression, indent);
        }
    }

    fn expression(&mut self, expression: &Expression, indent: usize) {
        match &expression.kind {
            ExpressionKind::Op { op, left, right } => {
                self.line(indent, format_args!("Op: {op}"));
                self.slot(left.as_deref(), indent + INDENT);
                self.slot(right.as_deref(), indent + INDENT);
            }
            ExpressionKind::Const(value) => self.line(indent, format_args!("Const: {value}")),
            ExpressionKind::Id(name) => self.line(indent, format_args!("Id: {name}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ast::BinaryOperator;

    #[test]
    fn test_render_nested() {
        let program = Program {
            statements: vec![
                Statement::new(1, StatementKind::Read { name: "x".into() }),
                Statement::new(
                    2,
                    StatementKind::While {
                        test: Some(Expression::op(
                            2,
                            BinaryOperator::Lt,
                            Some(Expression::new(2, ExpressionKind::Const(0))),
                            Some(Expression::new(2, ExpressionKind::Id("x".into()))),
                        )),
                        body: vec![Statement::new(
                            3,
                            StatementKind::Write { value: Some(Expression::new(3, ExpressionKind::Id("x".into()))) },
                        )],
                    },
                ),
            ],
        };

        let expected = "  Read: x\n  While\n    Op: <\n      Const: 0\n      Id: x\n    Write\n      Id: x\n";
        assert_eq!(render_tree(&program), expected);
    }
}
