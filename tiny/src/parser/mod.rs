pub mod lexer;
pub mod parser;
pub mod reserved;

use crate::ir::ast;
use crate::session::Session;

/// Parses source text into a syntax tree; errors are recorded in the session.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_str(source: &str, session: &mut Session) -> ast::Program {
    parser::Parser::new(source.as_bytes(), session).parse()
}
