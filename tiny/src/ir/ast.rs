use std::fmt;

/// A whole program: the top-level statement sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

/// `None` in an expression slot means the parser could not build a node
/// there (after a syntax error).
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// if test then ... [else ...] endif
    If {
        test: Option<Expression>,
        then_branch: Vec<Statement>,
        else_branch: Option<Vec<Statement>>,
    },
    /// repeat ... until test;
    Repeat {
        body: Vec<Statement>,
        test: Option<Expression>,
    },
    /// name := value;
    Assign {
        name: String,
        value: Option<Expression>,
    },
    /// read name;
    Read {
        name: String,
    },
    /// write value;
    Write {
        value: Option<Expression>,
    },
    /// while test ... endwhile
    While {
        test: Option<Expression>,
        body: Vec<Statement>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub line: usize,
    /// Filled in by type checking.
    pub ty: ExprType,
    pub kind: ExpressionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// a < b, a + b
    Op {
        op: BinaryOperator,
        left: Option<Box<Expression>>,
        right: Option<Box<Expression>>,
    },
    /// 42
    Const(i32),
    /// x
    Id(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExprType {
    #[default]
    Unset,
    Integer,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,       // =
    Lt,       // <
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
}

impl BinaryOperator {
    pub fn is_comparison(self) -> bool {
        matches!(self, Self::Eq | Self::Lt)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Statement {
    pub fn new(line: usize, kind: StatementKind) -> Self {
        Self { line, kind }
    }
}

impl Expression {
    pub fn new(line: usize, kind: ExpressionKind) -> Self {
        Self { line, ty: ExprType::Unset, kind }
    }

    pub fn op(line: usize, op: BinaryOperator, left: Option<Expression>, right: Option<Expression>) -> Self {
        Self::new(
            line,
            ExpressionKind::Op {
                op,
                left: left.map(Box::new),
                right: right.map(Box::new),
            },
        )
    }
}
