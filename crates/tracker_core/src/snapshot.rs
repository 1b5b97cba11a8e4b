use std::fmt;

/// Identifier the analysis service issues for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `status` block of a status read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusLine {
    /// Raw percent as reported; may be out of range or regress.
    pub progress_percent: i64,
    pub step_name: Option<String>,
    pub step: Option<i64>,
    pub message: String,
}

/// One point-in-time status read. `log_messages` is cumulative from job start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusSnapshot {
    /// `None` when the service has no status to report yet.
    pub status: Option<StatusLine>,
    pub log_messages: Vec<String>,
    pub error_text: Option<String>,
    pub is_complete: bool,
    pub is_success: bool,
    pub result: Option<serde_json::Value>,
}

impl StatusSnapshot {
    pub fn in_progress(progress_percent: i64, message: impl Into<String>) -> Self {
        Self {
            status: Some(StatusLine {
                progress_percent,
                message: message.into(),
                ..StatusLine::default()
            }),
            ..Self::default()
        }
    }

    pub fn with_logs<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_messages = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn succeeded(result: Option<serde_json::Value>) -> Self {
        Self {
            is_complete: true,
            is_success: true,
            result,
            ..Self::default()
        }
    }

    pub fn failed(error_text: impl Into<String>) -> Self {
        Self {
            error_text: Some(error_text.into()),
            is_complete: true,
            is_success: false,
            ..Self::default()
        }
    }
}
