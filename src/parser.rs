use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{AclError, PatternErrorKind, Result};
use crate::types::{PatternKind, TextPattern};

/// Regex pattern for a well-formed grant pattern
/// Format: `*`, or segment(.segment)*[.*]
static PATTERN_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\*|[^.*\s]+(?:\.[^.*\s]+)*(?:\.\*)?)$")
        .expect("PATTERN_SYNTAX: hardcoded regex is invalid")
});

/// Maximum nesting depth for `file:` include directives.
pub const MAX_INCLUDE_DEPTH: usize = 10;

/// Validate a single pattern and classify it.
pub fn validate_pattern(pattern: &str) -> Result<PatternKind> {
    if PATTERN_SYNTAX.is_match(pattern) {
        return Ok(PatternKind::of(pattern));
    }

    let kind = if pattern.trim().is_empty() {
        PatternErrorKind::Empty
    } else if pattern.chars().any(char::is_whitespace) {
        PatternErrorKind::Whitespace
    } else if pattern.split('.').any(str::is_empty) {
        PatternErrorKind::EmptySegment
    } else {
        PatternErrorKind::MisplacedWildcard
    };
    Err(AclError::invalid_pattern(kind, pattern))
}

/// Parse grant patterns from text, one per line.
///
/// `#` starts a comment. Supports `file: /path/to/patterns` directive to
/// include patterns from an external file.
pub fn parse_patterns(text: &str) -> Result<Vec<TextPattern>> {
    parse_patterns_inner(text, 0)
}

fn parse_patterns_inner(text: &str, depth: usize) -> Result<Vec<TextPattern>> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(AclError::ParseError(format!(
            "file include depth exceeds maximum ({MAX_INCLUDE_DEPTH}), possible circular include"
        )));
    }

    let mut patterns = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers

        let line = match line.find('#') {
            Some(comment_pos) => &line[..comment_pos],
            None => line,
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(path) = line.strip_prefix("file:") {
            let path = path.trim();
            tracing::debug!(path, depth, "including pattern file");
            patterns.extend(parse_patterns_from_file_inner(path, depth + 1)?);
            continue;
        }

        validate_pattern(line).map_err(|e| AclError::ParseErrorAtLine {
            line: line_num,
            message: e.to_string(),
        })?;

        patterns.push(TextPattern {
            pattern: line.to_string(),
            line_num,
        });
    }

    Ok(patterns)
}

/// Parse grant patterns from a file.
pub fn parse_patterns_from_file(path: impl AsRef<Path>) -> Result<Vec<TextPattern>> {
    parse_patterns_from_file_inner(path, 0)
}

fn parse_patterns_from_file_inner(
    path: impl AsRef<Path>,
    depth: usize,
) -> Result<Vec<TextPattern>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        AclError::ParseError(format!(
            "Failed to read patterns file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_patterns_inner(&text, depth)
}
