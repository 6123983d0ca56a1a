//! Per-compilation state: the error list and the listing (trace) channel.
//!
//! A `Session` is built at the start of one compilation and dropped with it;
//! nothing here is shared between compilations.

use crate::error::Diagnostics;

/// Which trace output goes to the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceOptions {
    /// Echo every source line as it is read.
    pub echo_source: bool,
    /// Report every token the lexer returns.
    pub trace_scan: bool,
    /// Render the syntax tree after parsing.
    pub trace_parse: bool,
    /// Print the symbol table after it is built.
    pub trace_analyze: bool,
}

impl TraceOptions {
    pub fn all() -> Self {
        Self { echo_source: true, trace_scan: true, trace_parse: true, trace_analyze: true }
    }
}

/// Side channel for trace output. It never influences compilation.
#[derive(Debug, Default)]
pub struct Listing {
    options: TraceOptions,
    lines: Vec<String>,
}

impl Listing {
    pub fn new(options: TraceOptions) -> Self {
        Self { options, lines: Vec::new() }
    }

    pub fn options(&self) -> TraceOptions {
        self.options
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Pushes a multi-line block, one entry per line.
    pub fn push_block(&mut self, block: &str) {
        self.lines.extend(block.lines().map(str::to_string));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub diagnostics: Diagnostics,
    pub listing: Listing,
}

impl Session {
    pub fn new(options: TraceOptions) -> Self {
        Self { diagnostics: Diagnostics::new(), listing: Listing::new(options) }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}
