use std::fmt;

use crate::{AnalysisResult, Severity};

/// Monotonic, display-ready view of the latest status read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub display_percent: u8,
    pub display_step_name: Option<String>,
    pub step: Option<i64>,
    pub display_message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub severity: Severity,
}

impl LogLine {
    pub fn classified(text: impl Into<String>) -> Self {
        let text = text.into();
        let severity = Severity::classify(&text);
        Self { text, severity }
    }

    pub fn with_severity(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

/// Service log lines not emitted before, in service order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogDelta {
    pub lines: Vec<LogLine>,
}

impl LogDelta {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }
}

/// Terminal state of a tracked job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    /// Failure reported by the service, or a submission that never started.
    Failed(String),
    /// Attempt budget exhausted without a terminal status.
    TimedOut { attempts: u32 },
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Succeeded => write!(f, "succeeded"),
            JobOutcome::Failed(reason) => write!(f, "failed: {reason}"),
            JobOutcome::TimedOut { attempts } => write!(f, "timed out after {attempts} checks"),
        }
    }
}

/// Notification handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Progress(ProgressRecord),
    /// New lines of the service's own log. Nothing else is ever sent here.
    Log(LogDelta),
    /// Message produced by the tracker itself: start, warnings, completion.
    Notice(LogLine),
    Result(Box<AnalysisResult>),
    Finished(JobOutcome),
}

impl TrackerEvent {
    pub(crate) fn notice(text: impl Into<String>, severity: Severity) -> Self {
        TrackerEvent::Notice(LogLine::with_severity(text, severity))
    }
}
