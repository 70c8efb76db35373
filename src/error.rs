use std::fmt;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

/// Errors that can occur while parsing formulas, recovering expressions from
/// numeric source text, or deriving propagation formulas
#[derive(Debug, Clone, PartialEq)]
pub enum PropError {
    // Input validation errors
    EmptyFormula,

    // Parsing errors
    InvalidNumber {
        value: String,
        span: Option<Span>,
    },
    InvalidToken {
        token: String,
        span: Option<Span>,
    },
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },
    UnexpectedEndOfInput,

    // Source extraction errors
    /// The input text is not an inspectable function definition
    InvalidSource {
        msg: String,
    },
    /// The function body has no top-level `result = <expr>` assignment
    MissingResult {
        function: String,
    },
    /// A name in the recovered expression is neither a parameter nor part of
    /// the numeric namespace
    UnresolvedName {
        name: String,
    },
    /// A numeric-namespace call with no symbolic equivalent
    UnknownNumericFunction {
        name: String,
    },

    // Semantic errors
    UnsupportedOperation(String),

    // Safety limits
    MaxDepthExceeded,
    MaxNodesExceeded,
}

impl PropError {
    /// Create InvalidNumber without span
    pub fn invalid_number(value: impl Into<String>) -> Self {
        PropError::InvalidNumber {
            value: value.into(),
            span: None,
        }
    }

    /// Create InvalidToken without span
    pub fn invalid_token(token: impl Into<String>) -> Self {
        PropError::InvalidToken {
            token: token.into(),
            span: None,
        }
    }

    /// Create InvalidToken with span
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        PropError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    /// Create InvalidSource from a message
    pub fn invalid_source(msg: impl Into<String>) -> Self {
        PropError::InvalidSource { msg: msg.into() }
    }
}

impl fmt::Display for PropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropError::EmptyFormula => write!(f, "Formula cannot be empty"),
            PropError::InvalidNumber { value, span } => {
                write!(
                    f,
                    "Invalid number format: '{}'{}",
                    value,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            PropError::InvalidToken { token, span } => {
                write!(
                    f,
                    "Invalid token: '{}'{}",
                    token,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            PropError::UnexpectedToken {
                expected,
                got,
                span,
            } => {
                write!(
                    f,
                    "Expected '{}', but got '{}'{}",
                    expected,
                    got,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            PropError::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
            PropError::InvalidSource { msg } => {
                write!(
                    f,
                    "Source text is not a readable function definition: {}",
                    msg
                )
            }
            PropError::MissingResult { function } => {
                write!(
                    f,
                    "No valid expression found in function '{}': \
                     the body must contain a top-level 'result = <expression>' assignment",
                    function
                )
            }
            PropError::UnresolvedName { name } => {
                write!(
                    f,
                    "Unresolved name '{}': not a function parameter and not part of \
                     the numeric namespace",
                    name
                )
            }
            PropError::UnknownNumericFunction { name } => {
                write!(f, "Numeric function '{}' has no symbolic equivalent", name)
            }
            PropError::UnsupportedOperation(msg) => {
                write!(f, "Unsupported operation: {}", msg)
            }
            PropError::MaxDepthExceeded => {
                write!(f, "Expression nesting depth exceeds maximum limit")
            }
            PropError::MaxNodesExceeded => {
                write!(f, "Expression size exceeds maximum node count limit")
            }
        }
    }
}

impl std::error::Error for PropError {}
