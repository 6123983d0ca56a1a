use crate::error::Diagnostics;
use crate::ir::ast::{ExprType, Expression, ExpressionKind, StatementKind};
use crate::ir::traverse::{Node, Visitor};

/// Post-order pass: children are typed before their parent is checked.
pub struct TypeChecker<'d> {
    diagnostics: &'d mut Diagnostics,
}

impl<'d> TypeChecker<'d> {
    pub fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self { diagnostics }
    }

    fn check_expression(&mut self, expression: &mut Expression) {
        expression.ty = match &expression.kind {
            ExpressionKind::Op { op, left, right } => {
                if type_of(left.as_deref()) != ExprType::Integer || type_of(right.as_deref()) != ExprType::Integer {
                    self.diagnostics.type_error(expression.line, "operator applied to non-integer");
                }
                if op.is_comparison() { ExprType::Boolean } else { ExprType::Integer }
            }
            ExpressionKind::Const(_) | ExpressionKind::Id(_) => ExprType::Integer,
        };
    }

    /// Only comparisons produce Boolean, so an Integer test is the error case.
    fn check_test(&mut self, test: Option<&Expression>, message: &str) {
        if let Some(test) = test {
            if test.ty == ExprType::Integer {
                self.diagnostics.type_error(test.line, message);
            }
        }
    }

    fn check_integer(&mut self, value: Option<&Expression>, message: &str) {
        if let Some(value) = value {
            if value.ty != ExprType::Integer {
                self.diagnostics.type_error(value.line, message);
            }
        }
    }
}

impl Visitor for TypeChecker<'_> {
    fn post(&mut self, node: Node<'_>) {
        match node {
            Node::Expression(expression) => self.check_expression(expression),
            Node::Statement(statement) => match &statement.kind {
                StatementKind::If { test, .. } => self.check_test(test.as_ref(), "if test is not Boolean"),
                StatementKind::Repeat { test, .. } => self.check_test(test.as_ref(), "repeat test is not Boolean"),
                StatementKind::While { test, .. } => self.check_test(test.as_ref(), "while test is not Boolean"),
                StatementKind::Assign { value, .. } => {
                    self.check_integer(value.as_ref(), "assignment of non-integer value")
                }
                StatementKind::Write { value } => self.check_integer(value.as_ref(), "write of non-integer value"),
                StatementKind::Read { .. } => {}
            },
        }
    }
}

/// Absent operands count as untyped.
fn type_of(expression: Option<&Expression>) -> ExprType {
    expression.map_or(ExprType::Unset, |e| e.ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;
    use crate::ir::ast::{BinaryOperator, Program, Statement};
    use crate::ir::traverse::traverse;

    fn constant(value: i32) -> Expression {
        Expression::new(1, ExpressionKind::Const(value))
    }

    fn check(mut program: Program) -> (Program, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        traverse(&mut program, &mut TypeChecker::new(&mut diagnostics));
        (program, diagnostics)
    }

    fn write(value: Expression) -> Statement {
        Statement::new(value.line, StatementKind::Write { value: Some(value) })
    }

    #[test]
    fn test_arithmetic_is_integer() {
        let sum = Expression::op(1, BinaryOperator::Add, Some(constant(1)), Some(constant(2)));
        let (program, diagnostics) = check(Program { statements: vec![write(sum)] });

        assert!(!diagnostics.has_errors());
        match &program.statements[0].kind {
            StatementKind::Write { value: Some(value) } => assert_eq!(value.ty, ExprType::Integer),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_comparison_operand_still_yields_type() {
        // (1 < 2) + 3
        let cmp = Expression::op(1, BinaryOperator::Lt, Some(constant(1)), Some(constant(2)));
        let sum = Expression::op(1, BinaryOperator::Add, Some(cmp), Some(constant(3)));
        let (program, diagnostics) = check(Program { statements: vec![write(sum)] });

        assert_eq!(diagnostics.count(DiagnosticKind::Type), 1);
        assert_eq!(diagnostics.errors()[0].to_string(), "Type error at line 1: operator applied to non-integer");
        match &program.statements[0].kind {
            StatementKind::Write { value: Some(value) } => assert_eq!(value.ty, ExprType::Integer),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_operand_is_reported() {
        let half = Expression::op(1, BinaryOperator::Eq, Some(constant(1)), None);
        let (program, diagnostics) = check(Program {
            statements: vec![Statement::new(
                1,
                StatementKind::If { test: Some(half), then_branch: vec![], else_branch: None },
            )],
        });

        assert_eq!(diagnostics.count(DiagnosticKind::Type), 1);
        match &program.statements[0].kind {
            StatementKind::If { test: Some(test), .. } => assert_eq!(test.ty, ExprType::Boolean),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_integer_tests_are_rejected() {
        let statements = vec![
            Statement::new(1, StatementKind::If { test: Some(constant(1)), then_branch: vec![], else_branch: None }),
            Statement::new(2, StatementKind::Repeat { body: vec![], test: Some(constant(0)) }),
            Statement::new(3, StatementKind::While { test: Some(constant(0)), body: vec![] }),
        ];
        let (_, diagnostics) = check(Program { statements });

        let messages: Vec<String> = diagnostics.errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Type error at line 1: if test is not Boolean",
                "Type error at line 1: repeat test is not Boolean",
                "Type error at line 1: while test is not Boolean",
            ]
        );
    }

    #[test]
    fn test_absent_slots_are_ignored() {
        let statements = vec![
            Statement::new(1, StatementKind::Write { value: None }),
            Statement::new(2, StatementKind::Assign { name: "x".into(), value: None }),
        ];
        let (_, diagnostics) = check(Program { statements });
        assert!(!diagnostics.has_errors());
    }
}
