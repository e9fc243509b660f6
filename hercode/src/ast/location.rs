//! Source location tracking
//!
//! HerCode is line-oriented: every statement occupies exactly one source
//! line, so a location is just the 1-based line number.

use serde::{Deserialize, Serialize};

/// A value tagged with the source line it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Located<T> {
    pub node: T,
    pub line: usize,
}

impl<T> Located<T> {
    pub fn new(node: T, line: usize) -> Self {
        Self { node, line }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Located<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.node.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_located_new() {
        let loc = Located::new("say x", 7);
        assert_eq!(loc.node, "say x");
        assert_eq!(loc.line, 7);
    }

    #[test]
    fn test_located_display_is_transparent() {
        let loc = Located::new("endif", 12);
        assert_eq!(format!("{loc}"), "endif");
    }
}
