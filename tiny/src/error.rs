use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Syntax error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("Type error at line {line}: {message}")]
    TypeError { line: usize, message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Syntax,
    Type,
    Io,
}

impl CompileError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::SyntaxError { .. } => DiagnosticKind::Syntax,
            Self::TypeError { .. } => DiagnosticKind::Type,
            Self::IoError { .. } => DiagnosticKind::Io,
        }
    }

    /// Source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::SyntaxError { line, .. } | Self::TypeError { line, .. } => Some(*line),
            Self::IoError { .. } => None,
        }
    }
}

/// Cumulative error list of one compilation. Reporting never aborts the
/// current phase; a non-empty list is the "failed" flag.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<CompileError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: CompileError) {
        tracing::debug!(%error, "diagnostic reported");
        self.errors.push(error);
    }

    pub fn syntax(&mut self, line: usize, message: impl Into<String>) {
        self.report(CompileError::SyntaxError { line, message: message.into() });
    }

    pub fn type_error(&mut self, line: usize, message: impl Into<String>) {
        self.report(CompileError::TypeError { line, message: message.into() });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.errors.iter().filter(|e| e.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sets_failed_flag() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_errors());

        diagnostics.syntax(3, "unexpected token -> EOF");
        diagnostics.type_error(4, "write of non-integer value");

        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.count(DiagnosticKind::Syntax), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::Type), 1);
        assert_eq!(diagnostics.errors()[1].line(), Some(4));
    }

    #[test]
    fn test_messages() {
        let err = CompileError::TypeError { line: 1, message: "assignment of non-integer value".into() };
        assert_eq!(err.to_string(), "Type error at line 1: assignment of non-integer value");

        let err = CompileError::SyntaxError { line: 7, message: "unexpected token -> EOF".into() };
        assert_eq!(err.to_string(), "Syntax error at line 7: unexpected token -> EOF");
    }
}
