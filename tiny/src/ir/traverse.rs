//! Generic pre/post-order walk shared by the analysis passes.
//!
//! For each statement of a sequence, in order: `pre`, the children in slot
//! order, `post`. Absent expression slots are skipped. The walk itself never
//! changes the shape of the tree; only visitors may touch node fields.

use super::ast::{Expression, ExpressionKind, Program, Statement, StatementKind};

pub enum Node<'a> {
    Statement(&'a mut Statement),
    Expression(&'a mut Expression),
}

/// Both hooks default to doing nothing, so a pass implements only the one it needs.
pub trait Visitor {
    fn pre(&mut self, _node: Node<'_>) {}
    fn post(&mut self, _node: Node<'_>) {}
}

/// Visitor with no effects.
pub struct NoOp;

impl Visitor for NoOp {}

pub fn traverse<V: Visitor + ?Sized>(program: &mut Program, visitor: &mut V) {
    traverse_sequence(&mut program.statements, visitor);
}

fn traverse_sequence<V: Visitor + ?Sized>(statements: &mut [Statement], visitor: &mut V) {
    for statement in statements {
        traverse_statement(statement, visitor);
    }
}

fn traverse_statement<V: Visitor + ?Sized>(statement: &mut Statement, visitor: &mut V) {
    visitor.pre(Node::Statement(statement));

    match &mut statement.kind {
        StatementKind::If { test, then_branch, else_branch } => {
            traverse_slot(test.as_mut(), visitor);
            traverse_sequence(then_branch, visitor);
            if let Some(else_branch) = else_branch {
                traverse_sequence(else_branch, visitor);
            }
        }
        StatementKind::Repeat { body, test } => {
            traverse_sequence(body, visitor);
            traverse_slot(test.as_mut(), visitor);
        }
        StatementKind::While { test, body } => {
            traverse_slot(test.as_mut(), visitor);
            traverse_sequence(body, visitor);
        }
        StatementKind::Assign { value, .. } | StatementKind::Write { value } => {
            traverse_slot(value.as_mut(), visitor);
        }
        StatementKind::Read { .. } => {}
    }

    visitor.post(Node::Statement(statement));
}

fn traverse_slot<V: Visitor + ?Sized>(expression: Option<&mut Expression>, visitor: &mut V) {
    if let Some(expression) = expression {
        traverse_expression(expression, visitor);
    }
}

fn traverse_expression<V: Visitor + ?Sized>(expression: &mut Expression, visitor: &mut V) {
    visitor.pre(Node::Expression(expression));

    if let ExpressionKind::Op { left, right, .. } = &mut expression.kind {
        traverse_slot(left.as_deref_mut(), visitor);
        traverse_slot(right.as_deref_mut(), visitor);
    }

    visitor.post(Node::Expression(expression));
}
