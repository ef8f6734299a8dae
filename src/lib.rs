//! Wildcard ACL - segment-aware permission matching over an immutable radix tree
//!
//! Keys are dot-segmented identifiers such as permission paths or topic
//! names. Granted patterns are stored in a persistent radix tree, and a
//! single descent decides whether any of them grants a key:
//! - exact patterns match only themselves
//! - `prefix.*` matches `prefix` and anything below it at a segment boundary
//! - `*` matches every non-empty key
//!
//! # Example
//!
//! ```rust
//! use wildcard_acl::{PatternRegistry, RegistryOptions};
//!
//! let grants = "
//! tenant.abc123.project.*               # project admin
//! tenant.def456.member.add              # single grant
//! ";
//!
//! let registry = PatternRegistry::from_text(grants, RegistryOptions::default()).unwrap();
//!
//! assert!(registry.matches("tenant.abc123.project.xyz789.member.add"));
//! assert!(registry.matches("tenant.def456.member.add"));
//! assert!(!registry.matches("tenant.def456.member.remove"));
//! assert!(!registry.matches("tenant.abc123.projects"));
//! ```
//!
//! # Pattern Syntax
//!
//! | Pattern | Example | Matches |
//! |---------|---------|---------|
//! | Exact | `tenant.abc.read` | Only `tenant.abc.read` |
//! | Segment wildcard | `tenant.abc.*` | `tenant.abc`, `tenant.abc.read`, `tenant.abc.x.y` |
//! | Universal | `*` | Every non-empty key |
//!
//! A wildcard must be the whole pattern or its whole last segment;
//! `tenant.*` does not grant `tenantX.read`.

pub mod error;
pub mod matcher;
pub mod parser;
pub mod registry;
pub mod tree;
pub mod types;

#[cfg(test)]
mod proptests;

// Re-export commonly used items
pub use error::{AclError, PatternErrorKind, Result};
pub use matcher::{matches_wildcard, KeyMatcher, WildcardMatcher};
pub use parser::{parse_patterns, parse_patterns_from_file, validate_pattern};
pub use registry::{PatternRegistry, RegistryOptions, DEFAULT_CACHE_SIZE};
pub use tree::{Node, RadixNode, Tree};
pub use types::{PatternKind, TextPattern};
