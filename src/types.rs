/// Byte that separates the segments of a key
pub const SEGMENT_SEPARATOR: u8 = b'.';

/// The pattern that matches every non-empty key
pub const UNIVERSAL_WILDCARD: &str = "*";

/// Suffix marking a segment wildcard pattern
pub const WILDCARD_SUFFIX: &str = ".*";

/// Shape of a stored pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Matches only the identical key
    Exact,
    /// `prefix.*`: matches `prefix` and any key continuing it at a segment boundary
    SegmentWildcard,
    /// `*`: matches any non-empty key
    Universal,
}

impl PatternKind {
    /// Classify a pattern by its shape. Does not validate it.
    pub fn of(pattern: &str) -> Self {
        if pattern == UNIVERSAL_WILDCARD {
            PatternKind::Universal
        } else if pattern.ends_with(WILDCARD_SUFFIX) {
            PatternKind::SegmentWildcard
        } else {
            PatternKind::Exact
        }
    }

    /// Whether this pattern can match keys other than itself
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, PatternKind::Exact)
    }
}

/// Parsed text pattern before registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPattern {
    /// The pattern text
    pub pattern: String,
    /// Line number in the original text (for error reporting)
    pub line_num: usize,
}
