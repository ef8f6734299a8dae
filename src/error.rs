use thiserror::Error;

/// Classifies invalid pattern errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternErrorKind {
    /// Pattern is empty or whitespace only
    Empty,
    /// Pattern contains an empty segment (leading, trailing or doubled dot)
    EmptySegment,
    /// Pattern contains whitespace
    Whitespace,
    /// Wildcard appears somewhere other than a whole trailing segment
    MisplacedWildcard,
}

impl PatternErrorKind {
    fn describe(&self) -> &'static str {
        match self {
            PatternErrorKind::Empty => "pattern is empty",
            PatternErrorKind::EmptySegment => "pattern contains an empty segment",
            PatternErrorKind::Whitespace => "pattern contains whitespace",
            PatternErrorKind::MisplacedWildcard => {
                "wildcard must be the whole pattern or a trailing '.*' segment"
            }
        }
    }
}

impl std::fmt::Display for PatternErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// ACL error types
#[derive(Error, Debug)]
pub enum AclError {
    #[error("Parse error at line {line}: {message}")]
    ParseErrorAtLine { line: usize, message: String },

    #[error("Invalid pattern '{pattern}': {kind}")]
    InvalidPattern {
        kind: PatternErrorKind,
        pattern: String,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AclError {
    pub(crate) fn invalid_pattern(kind: PatternErrorKind, pattern: &str) -> Self {
        AclError::InvalidPattern {
            kind,
            pattern: pattern.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AclError>;
