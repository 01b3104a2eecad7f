//! Substring filter over fully-qualified test identifiers

/// Whether a `module.Class.method` identifier is selected by the patterns.
///
/// No patterns selects everything; otherwise any pattern appearing as a
/// literal substring selects the test.
pub fn matches(test_id: &str, patterns: &[String]) -> bool {
    patterns.is_empty() || patterns.iter().any(|pattern| test_id.contains(pattern.as_str()))
}

/// The command-line patterns a run was started with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    patterns: Vec<String>,
}

impl NameFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, test_id: &str) -> bool {
        matches(test_id, &self.patterns)
    }
}
