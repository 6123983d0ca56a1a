//! Semantic analysis: symbol-table construction, then type checking.

pub mod symtab;
pub mod typecheck;

use crate::ir::ast::{ExpressionKind, Program, StatementKind};
use crate::ir::traverse::{Node, Visitor, traverse};
use crate::session::Session;

pub use symtab::{Symbol, SymbolTable};
pub use typecheck::TypeChecker;

/// Pre-order pass recording every variable occurrence.
struct SymbolCollector<'t> {
    table: &'t mut SymbolTable,
}

impl SymbolCollector<'_> {
    fn record(&mut self, name: &str, line: usize) {
        // empty only where the parser already reported a missing identifier
        if !name.is_empty() {
            self.table.insert_or_record(name, line);
        }
    }
}

impl Visitor for SymbolCollector<'_> {
    fn pre(&mut self, node: Node<'_>) {
        match node {
            Node::Statement(statement) => {
                if let StatementKind::Assign { name, .. } | StatementKind::Read { name } = &statement.kind {
                    self.record(name, statement.line);
                }
            }
            Node::Expression(expression) => {
                if let ExpressionKind::Id(name) = &expression.kind {
                    self.record(name, expression.line);
                }
            }
        }
    }
}

/// Pass 1: builds the symbol table of `program`.
#[tracing::instrument(skip_all, fields(statements = program.statements.len()))]
pub fn build_symbol_table(program: &mut Program, session: &mut Session) -> SymbolTable {
    let mut table = SymbolTable::new();
    traverse(program, &mut SymbolCollector { table: &mut table });
    tracing::debug!(symbols = table.len(), "symbol table built");

    if session.listing.options().trace_analyze {
        session.listing.push("Symbol table:");
        session.listing.push_block(&table.to_string());
    }
    table
}

/// Pass 2: types every expression and reports mismatches.
#[tracing::instrument(skip_all)]
pub fn type_check(program: &mut Program, session: &mut Session) {
    traverse(program, &mut TypeChecker::new(&mut session.diagnostics));
    if session.listing.options().trace_analyze {
        session.listing.push("Type checking finished");
    }
}

/// Runs both passes. Type checking is skipped if errors were already reported.
pub fn analyze(program: &mut Program, session: &mut Session) -> SymbolTable {
    let table = build_symbol_table(program, session);
    if session.has_errors() {
        tracing::debug!("skipping type check after earlier errors");
    } else {
        type_check(program, session);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ast::ExprType;
    use crate::parser::parse_str;
    use crate::session::TraceOptions;

    fn analyzed(source: &str) -> (Program, SymbolTable, Session) {
        let mut session = Session::new(TraceOptions::default());
        let mut program = parse_str(source, &mut session);
        assert!(!session.has_errors(), "{:?}", session.diagnostics.errors());
        let table = analyze(&mut program, &mut session);
        (program, table, session)
    }

    #[test]
    fn test_assign_read_and_id_are_collected() {
        let (_, table, session) = analyzed("read a;\nb := a + 1;\nwrite b * a;\n");
        assert!(!session.has_errors());
        assert_eq!(table.len(), 2);

        let a = table.get("a").unwrap();
        assert_eq!(a.location, 0);
        assert_eq!(a.lines, vec![1, 2, 3]);

        let b = table.get("b").unwrap();
        assert_eq!(b.location, 1);
        assert_eq!(b.lines, vec![2, 3]);
    }

    #[test]
    fn test_boolean_assignment() {
        let (program, _, session) = analyzed("x := 1 < 2;\nwrite x;");
        let errors = session.diagnostics.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Type error at line 1: assignment of non-integer value");

        match &program.statements[0].kind {
            StatementKind::Assign { value: Some(value), .. } => assert_eq!(value.ty, ExprType::Boolean),
            other => panic!("unexpected {other:?}"),
        }
        match &program.statements[1].kind {
            StatementKind::Write { value: Some(value) } => assert_eq!(value.ty, ExprType::Integer),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_type_check_skipped_after_errors() {
        let mut session = Session::new(TraceOptions::default());
        let mut program = parse_str("write 1 < 2;\nwrite ;", &mut session);
        assert!(session.has_errors());
        let before = session.diagnostics.errors().len();

        let table = analyze(&mut program, &mut session);
        assert!(table.is_empty());
        assert_eq!(session.diagnostics.errors().len(), before);
    }

    #[test]
    fn test_symbol_trace() {
        let mut session = Session::new(TraceOptions { trace_analyze: true, ..Default::default() });
        let mut program = parse_str("read x;", &mut session);
        analyze(&mut program, &mut session);

        let lines = session.listing.lines();
        assert_eq!(lines[0], "Symbol table:");
        assert!(lines[3].starts_with("x              0"));
        assert_eq!(lines.last().map(String::as_str), Some("Type checking finished"));
    }
}
