//! Regular expression flags for name and family searches

use regex::{Regex, RegexBuilder};

use crate::domain::error::NodeResult;

/// Matching options applied to search patterns.
///
/// Patterns use search semantics: a match anywhere in the name counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
}

impl SearchFlags {
    pub const NONE: SearchFlags = SearchFlags {
        case_insensitive: false,
        multi_line: false,
        dot_matches_new_line: false,
        ignore_whitespace: false,
    };

    pub fn ignore_case() -> Self {
        Self {
            case_insensitive: true,
            ..Self::NONE
        }
    }

    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub(crate) fn compile(self, pattern: &str) -> NodeResult<Regex> {
        Ok(RegexBuilder::new(pattern)
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .build()?)
    }
}
