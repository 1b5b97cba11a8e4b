/// Display class for progress records and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    /// Keyword classification of free-form service text.
    ///
    /// Case-sensitive substring match, first hit wins: `Error`, `Warning`, `complete`.
    pub fn classify(text: &str) -> Self {
        if text.contains("Error") {
            Severity::Error
        } else if text.contains("Warning") {
            Severity::Warning
        } else if text.contains("complete") {
            Severity::Success
        } else {
            Severity::Info
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Severity;

    #[test]
    fn error_wins_over_other_keywords() {
        assert_eq!(
            Severity::classify("Warning: Error while analysis complete"),
            Severity::Error
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(Severity::classify("error in lowercase"), Severity::Info);
        assert_eq!(Severity::classify("Analysis Complete"), Severity::Info);
        assert_eq!(Severity::classify("Analysis complete"), Severity::Success);
    }

    #[test]
    fn warning_keyword() {
        assert_eq!(Severity::classify("Warning: slow source"), Severity::Warning);
    }
}
