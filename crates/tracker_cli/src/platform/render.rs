//! Plain-text rendering of tracker events for the terminal.

use std::io::{self, Write};
use std::sync::Mutex;

use tracker_core::{
    AnalysisResult, JobOutcome, LogLine, ProgressRecord, Severity, TrackerEvent,
};
use tracker_engine::PresentationSink;

struct SinkState<W> {
    out: W,
    last_progress: Option<ProgressRecord>,
}

/// Writes events as text lines. A progress record identical to the previous
/// one is not repeated.
pub(crate) struct TerminalSink<W> {
    state: Mutex<SinkState<W>>,
}

impl TerminalSink<io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            state: Mutex::new(SinkState {
                out,
                last_progress: None,
            }),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.state.into_inner() {
            Ok(state) => state.out,
            Err(poisoned) => poisoned.into_inner().out,
        }
    }
}

impl<W: Write + Send> PresentationSink for TerminalSink<W> {
    fn emit(&self, event: TrackerEvent) {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let state = &mut *guard;

        let lines = match event {
            TrackerEvent::Progress(record) => {
                if state.last_progress.as_ref() == Some(&record) {
                    return;
                }
                let line = progress_line(&record);
                state.last_progress = Some(record);
                vec![line]
            }
            TrackerEvent::Log(delta) => delta.lines.iter().map(log_line).collect(),
            TrackerEvent::Notice(line) => vec![log_line(&line)],
            TrackerEvent::Result(result) => report_lines(&result),
            TrackerEvent::Finished(outcome) => vec![outcome_line(&outcome)],
        };

        for line in lines {
            if writeln!(state.out, "{line}").is_err() {
                return;
            }
        }
        let _ = state.out.flush();
    }
}

fn severity_tag(severity: Severity) -> String {
    format!("[{}]", severity.label())
}

pub(crate) fn progress_line(record: &ProgressRecord) -> String {
    let mut line = format!("[{:>3}%]", record.display_percent);
    match (record.step, record.display_step_name.as_deref()) {
        (Some(step), Some(name)) => line.push_str(&format!(" Step {step}: {name}")),
        (Some(step), None) => line.push_str(&format!(" Step {step}")),
        (None, Some(name)) => line.push_str(&format!(" {name}")),
        (None, None) => {}
    }
    if !record.display_message.is_empty() {
        line.push_str(" - ");
        line.push_str(&record.display_message);
    }
    if record.severity != Severity::Info {
        line.push(' ');
        line.push_str(&severity_tag(record.severity));
    }
    line
}

pub(crate) fn log_line(line: &LogLine) -> String {
    format!("  {:<9} {}", severity_tag(line.severity), line.text)
}

pub(crate) fn outcome_line(outcome: &JobOutcome) -> String {
    match outcome {
        JobOutcome::Succeeded => "Done.".to_string(),
        other => format!("Tracking ended: {other}"),
    }
}

/// Full report for a successful analysis.
pub(crate) fn report_lines(result: &AnalysisResult) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("== Analysis of {} ==", result.url),
        format!("Title:     {}", result.article.title),
        format!("Author:    {}", result.article.author),
        format!("Published: {}", result.article.published_date),
        format!("Summary:   {}", result.article.summary),
        String::new(),
        "Claims:".to_string(),
    ];
    push_numbered(&mut lines, "  ", &result.claims);

    let verdict = &result.verdict;
    lines.push(String::new());
    lines.push(if verdict.is_misleading {
        "Verdict: potentially misleading".to_string()
    } else {
        "Verdict: no misleading content detected".to_string()
    });
    if let Some(confidence) = verdict.confidence {
        lines.push(format!("Confidence: {:.0}%", confidence * 100.0));
    }
    if let Some(explanation) = &verdict.explanation {
        lines.push(format!("Explanation: {explanation}"));
    }
    if !verdict.reasons.is_empty() {
        lines.push("Reasons:".to_string());
        lines.extend(verdict.reasons.iter().map(|reason| format!("  - {reason}")));
    }

    lines.push(String::new());
    lines.push(match result.max_references_used {
        Some(limit) => format!("References ({} of up to {limit}):", result.references.len()),
        None => format!("References ({}):", result.references.len()),
    });
    if result.references.is_empty() {
        lines.push("  (none)".to_string());
    }
    for (index, reference) in result.references.iter().enumerate() {
        lines.push(format!(
            "  {}. {} ({})",
            index + 1,
            reference.title,
            reference.source
        ));
        lines.push(format!("     URL:       {}", reference.url));
        lines.push(format!("     Author:    {}", reference.author));
        lines.push(format!("     Published: {}", reference.publish_date));
        lines.push(format!("     Summary:   {}", reference.summary));
        if !reference.claims.is_empty() {
            lines.push("     Claims:".to_string());
            lines.extend(reference.claims.iter().map(|claim| format!("       - {claim}")));
        }
    }

    if !result.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped references ({}):", result.skipped.len()));
        for skipped in &result.skipped {
            lines.push(format!(
                "  - {} ({}): {}",
                skipped.title, skipped.url, skipped.reason
            ));
        }
    }
    lines
}

fn push_numbered(lines: &mut Vec<String>, indent: &str, items: &[String]) {
    if items.is_empty() {
        lines.push(format!("{indent}(none)"));
        return;
    }
    lines.extend(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| format!("{indent}{}. {item}", index + 1)),
    );
}
