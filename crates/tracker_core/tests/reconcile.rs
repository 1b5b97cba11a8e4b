use tracker_core::{reconcile, Severity, StatusLine, StatusSnapshot};

fn snapshot(percent: i64, logs: &[&str]) -> StatusSnapshot {
    StatusSnapshot::in_progress(percent, "Scraping").with_logs(logs.iter().copied())
}

#[test]
fn first_snapshot_emits_everything() {
    let snap = StatusSnapshot {
        status: Some(StatusLine {
            progress_percent: 40,
            step_name: Some("Scraping".to_string()),
            step: Some(1),
            message: "Scraping".to_string(),
        }),
        log_messages: vec!["a".to_string(), "b".to_string()],
        ..StatusSnapshot::default()
    };

    let out = reconcile(0, &snap, 0);
    let progress = out.progress.expect("progress record");
    assert_eq!(progress.display_percent, 40);
    assert_eq!(progress.display_step_name.as_deref(), Some("Scraping"));
    assert_eq!(progress.step, Some(1));
    assert_eq!(progress.severity, Severity::Info);
    assert_eq!(out.delta.texts(), vec!["a", "b"]);
    assert_eq!(out.log_count, 2);
}

#[test]
fn cumulative_logs_only_emit_the_new_suffix() {
    let first = reconcile(0, &snapshot(40, &["a", "b"]), 0);
    let second = reconcile(first.log_count, &snapshot(40, &["a", "b", "c"]), first.display_percent);

    assert_eq!(second.delta.texts(), vec!["c"]);
    assert_eq!(second.display_percent, 40);
    assert_eq!(second.log_count, 3);
}

#[test]
fn repeated_snapshot_emits_no_lines() {
    let snap = snapshot(55, &["a", "b"]);
    let first = reconcile(0, &snap, 0);
    let again = reconcile(first.log_count, &snap, first.display_percent);
    assert!(again.delta.is_empty());
    assert_eq!(again.log_count, 2);
}

#[test]
fn percent_never_regresses_and_is_clamped() {
    let reported = [10, 35, 20, -5, 140, 90, 100, 0];
    let mut last = 0;
    let mut seen = Vec::new();
    for percent in reported {
        let out = reconcile(0, &snapshot(percent, &[]), last);
        let shown = out.progress.expect("progress").display_percent;
        assert!(shown >= last);
        assert!(shown <= 100);
        last = out.display_percent;
        seen.push(shown);
    }
    assert_eq!(seen, vec![10, 35, 35, 35, 100, 100, 100, 100]);
}

#[test]
fn concatenated_deltas_reproduce_final_log() {
    let growth: [&[&str]; 5] = [
        &["l1"],
        &["l1", "l2", "l3"],
        &["l1", "l2", "l3"],
        &["l1", "l2", "l3", "l4"],
        &["l1", "l2", "l3", "l4", "l5", "l6"],
    ];
    let mut count = 0;
    let mut emitted = Vec::new();
    for logs in growth {
        let out = reconcile(count, &snapshot(50, logs), 50);
        emitted.extend(out.delta.lines.into_iter().map(|line| line.text));
        count = out.log_count;
    }
    assert_eq!(emitted, vec!["l1", "l2", "l3", "l4", "l5", "l6"]);
}

#[test]
fn shorter_log_is_treated_as_a_reset() {
    let out = reconcile(5, &snapshot(60, &["x", "y"]), 60);
    assert_eq!(out.delta.texts(), vec!["x", "y"]);
    assert_eq!(out.log_count, 2);
}

#[test]
fn error_text_forces_error_severity() {
    let mut snap = StatusSnapshot::in_progress(70, "Analysis complete");
    snap.error_text = Some("boom".to_string());
    let out = reconcile(0, &snap, 0);
    assert_eq!(out.progress.unwrap().severity, Severity::Error);
}

#[test]
fn message_keywords_drive_severity() {
    let warning = reconcile(0, &StatusSnapshot::in_progress(10, "Warning: slow site"), 0);
    assert_eq!(warning.progress.unwrap().severity, Severity::Warning);

    let done = reconcile(0, &StatusSnapshot::in_progress(100, "Analysis complete"), 0);
    assert_eq!(done.progress.unwrap().severity, Severity::Success);
}

#[test]
fn log_lines_are_classified_individually() {
    let snap = snapshot(10, &["[10:00:01] Scraping", "[10:00:02] Error fetching reference"]);
    let out = reconcile(0, &snap, 0);
    let severities: Vec<_> = out.delta.lines.iter().map(|line| line.severity).collect();
    assert_eq!(severities, vec![Severity::Info, Severity::Error]);
}

#[test]
fn missing_status_block_yields_no_progress_but_keeps_logs() {
    let snap = StatusSnapshot::default().with_logs(["queued"]);
    let out = reconcile(0, &snap, 25);
    assert!(out.progress.is_none());
    assert_eq!(out.display_percent, 25);
    assert_eq!(out.delta.texts(), vec!["queued"]);
}

#[test]
fn error_text_marks_new_log_lines_as_errors() {
    let mut snap = snapshot(40, &["[10:00:01] Scraping", "[10:00:02] Analysis complete"]);
    snap.error_text = Some("source unreachable".to_string());
    let out = reconcile(1, &snap, 0);
    assert_eq!(out.delta.texts(), vec!["[10:00:02] Analysis complete"]);
    assert_eq!(out.delta.lines[0].severity, Severity::Error);
}
