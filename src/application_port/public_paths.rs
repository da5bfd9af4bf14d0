/// Allow-list of path substrings that never carry a credential and never
/// force a logout. Membership is a pure function of the path; session state
/// is not consulted. Both gates use the same instance.
#[derive(Debug, Clone, Default)]
pub struct PublicPaths {
    patterns: Vec<String>,
}

impl PublicPaths {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| path.contains(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_by_substring() {
        let paths = PublicPaths::new(["/dynamic-forms", "/auth/login"]);
        assert!(paths.is_public("/api/v1/dynamic-forms/42"));
        assert!(paths.is_public("/auth/login"));
        assert!(!paths.is_public("/api/v1/students"));
    }

    #[test]
    fn empty_list_marks_nothing_public() {
        let paths = PublicPaths::default();
        assert!(!paths.is_public("/anything"));
    }
}
