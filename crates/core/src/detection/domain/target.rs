use super::detection::Detection;

/// The currently active object-class name the session should highlight.
///
/// Non-empty by construction; at most one is active at a time and a new
/// specification simply replaces the old one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetSpec {
    name: String,
}

impl TargetSpec {
    /// Parse user input into a target, rejecting blank submissions.
    pub fn parse(input: &str) -> Option<Self> {
        let name = input.trim();
        if name.is_empty() {
            None
        } else {
            Some(Self {
                name: name.to_string(),
            })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive exact match against a detection's class label.
    /// No partial, synonym, or fuzzy matching.
    pub fn matches(&self, detection: &Detection) -> bool {
        self.name.eq_ignore_ascii_case(&detection.label)
    }
}

impl std::fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
