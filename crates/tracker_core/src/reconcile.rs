use crate::{LogDelta, LogLine, ProgressRecord, Severity, StatusSnapshot};

/// Output of one reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// `None` when the snapshot carried no status block.
    pub progress: Option<ProgressRecord>,
    pub delta: LogDelta,
    pub log_count: usize,
    /// Percent to carry into the next step.
    pub display_percent: u8,
}

/// Folds a snapshot into the display view built from earlier snapshots.
///
/// The displayed percent never drops below `last_display_percent`. Log lines are
/// taken from `previous_log_count` onwards; a list shorter than that means the
/// service restarted its log, so the whole list is emitted again.
///
/// Error text on the snapshot makes the progress record and every new log
/// line an error; otherwise each is classified by keyword.
pub fn reconcile(
    previous_log_count: usize,
    snapshot: &StatusSnapshot,
    last_display_percent: u8,
) -> Reconciled {
    let mut display_percent = last_display_percent.min(100);
    let severity_of = |text: &str| match snapshot.error_text {
        Some(_) => Severity::Error,
        None => Severity::classify(text),
    };

    let progress = snapshot.status.as_ref().map(|status| {
        let reported = status.progress_percent.clamp(0, 100) as u8;
        display_percent = display_percent.max(reported);
        let severity = severity_of(&status.message);
        ProgressRecord {
            display_percent,
            display_step_name: status.step_name.clone().filter(|name| !name.is_empty()),
            step: status.step,
            display_message: status.message.clone(),
            severity,
        }
    });

    let total = snapshot.log_messages.len();
    let start = if total < previous_log_count {
        0
    } else {
        previous_log_count
    };
    let delta = LogDelta {
        lines: snapshot.log_messages[start..]
            .iter()
            .map(|line| LogLine::with_severity(line.as_str(), severity_of(line)))
            .collect(),
    };

    Reconciled {
        progress,
        delta,
        log_count: total,
        display_percent,
    }
}
