//! Front end of the TINY compiler: lexer, parser and semantic analysis.
//!
//! [`compile`] runs the whole pipeline for one program with a fresh
//! [`Session`]. Code generation should only consume the result when
//! [`Compilation::has_errors`] is false.

pub mod analysis;
pub mod error;
pub mod ir;
pub mod parser;
pub mod session;

use std::io::BufRead;

use analysis::SymbolTable;
use error::CompileError;
use ir::ast::Program;
use session::{Session, TraceOptions};

/// Everything one compilation produced.
#[derive(Debug)]
pub struct Compilation {
    /// Decorated tree (partial if parsing failed).
    pub program: Program,
    /// `None` when parsing failed and analysis did not run.
    pub symbols: Option<SymbolTable>,
    pub session: Session,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        self.session.has_errors()
    }

    pub fn diagnostics(&self) -> &[CompileError] {
        self.session.diagnostics.errors()
    }

    pub fn listing(&self) -> &[String] {
        self.session.listing.lines()
    }
}

/// Parses and analyzes one program read from `reader`.
///
/// Syntax and type errors end up in the returned compilation; `Err` means the
/// source itself could not be read.
#[tracing::instrument(skip_all)]
pub fn compile<R: BufRead>(reader: R, options: TraceOptions) -> Result<Compilation, CompileError> {
    let mut session = Session::new(options);

    let mut program = parser::parser::Parser::new(reader, &mut session).parse_checked()?;
    if options.trace_parse {
        session.listing.push("Syntax tree:");
        session.listing.push_block(&ir::print::render_tree(&program));
    }

    let symbols = if session.has_errors() {
        tracing::debug!("parse failed, skipping analysis");
        None
    } else {
        Some(analysis::analyze(&mut program, &mut session))
    };

    tracing::debug!(errors = session.diagnostics.errors().len(), "compilation finished");
    Ok(Compilation { program, symbols, session })
}

pub fn compile_str(source: &str, options: TraceOptions) -> Result<Compilation, CompileError> {
    compile(source.as_bytes(), options)
}
