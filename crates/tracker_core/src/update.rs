use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::{
    assemble, reconcile, Effect, JobHandle, JobOutcome, JobParameters, JobSeq, Msg, Phase,
    PollState, Severity, StatusSnapshot, TrackerEvent, TrackerState,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Effects are returned in the order they must be carried out.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::StartRequested(request) => {
            if !state.is_settled() {
                tracker_debug!("start: cancelling job seq={}", state.seq);
            }
            if state.release_timer() {
                effects.push(Effect::CancelTimer);
            }
            let seq = state.reset_for_new_job();

            match JobParameters::from_request(&request) {
                Ok(params) => {
                    tracker_info!("seq={} submitting analysis for {}", seq, params.url());
                    state.phase = Phase::Submitting;
                    effects.push(Effect::Submit { seq, params });
                }
                Err(err) => {
                    tracker_warn!("seq={} rejected request: {}", seq, err);
                    let reason = format!("Invalid request: {err}");
                    finish(&mut state, JobOutcome::Failed(reason.clone()), &mut effects);
                    effects.push(Effect::Emit(TrackerEvent::notice(reason, Severity::Error)));
                    push_finished(&state, &mut effects);
                }
            }
        }
        Msg::SubmitFinished { seq, result } => {
            if is_stale(&state, seq, Phase::Submitting) {
                tracker_debug!("dropping stale submit result seq={}", seq);
                return (state, effects);
            }
            match result {
                Ok(handle) => begin_polling(&mut state, handle, &mut effects),
                Err(message) => {
                    tracker_warn!("seq={} submission failed: {}", seq, message);
                    let reason = format!("Failed to start analysis: {message}");
                    finish(&mut state, JobOutcome::Failed(reason.clone()), &mut effects);
                    effects.push(Effect::Emit(TrackerEvent::notice(reason, Severity::Error)));
                    push_finished(&state, &mut effects);
                }
            }
        }
        Msg::Tick { seq } => {
            if is_stale(&state, seq, Phase::Polling) {
                tracker_debug!("dropping stale tick seq={}", seq);
                return (state, effects);
            }
            check_status(&mut state, &mut effects);
        }
        Msg::StatusFetched { seq, result } => {
            if is_stale(&state, seq, Phase::Polling) {
                tracker_debug!("discarding status read after stop or completion seq={}", seq);
                return (state, effects);
            }
            if let Some(poll) = state.poll.as_mut() {
                poll.fetch_in_flight = false;
            }
            match result {
                Ok(snapshot) => apply_snapshot(&mut state, snapshot, &mut effects),
                Err(message) => {
                    tracker_warn!("seq={} status check failed: {}", seq, message);
                    effects.push(Effect::Emit(TrackerEvent::notice(
                        format!("Error checking status: {message}"),
                        Severity::Warning,
                    )));
                }
            }
        }
        Msg::StopRequested => {
            if state.release_timer() {
                effects.push(Effect::CancelTimer);
            }
            if matches!(state.phase, Phase::Submitting | Phase::Polling) {
                tracker_info!("seq={} tracking stopped", state.seq);
                state.phase = Phase::Idle;
                state.poll = None;
            }
        }
    }

    (state, effects)
}

fn is_stale(state: &TrackerState, seq: JobSeq, expected: Phase) -> bool {
    seq != state.seq || state.phase != expected
}

fn begin_polling(state: &mut TrackerState, handle: JobHandle, effects: &mut Vec<Effect>) {
    let settings = state.settings();
    tracker_info!(
        "seq={} analysis {} accepted; polling every {:?}, at most {} checks",
        state.seq,
        handle,
        settings.interval,
        settings.max_attempts
    );
    effects.push(Effect::Emit(TrackerEvent::notice(
        format!("Analysis started with ID: {handle}"),
        Severity::Info,
    )));
    state.handle = Some(handle);
    state.poll = Some(PollState::new(settings));
    state.phase = Phase::Polling;
    effects.push(Effect::StartTimer {
        seq: state.seq,
        interval: settings.interval,
    });
    // The first check does not wait for the timer.
    check_status(state, effects);
}

fn check_status(state: &mut TrackerState, effects: &mut Vec<Effect>) {
    let seq = state.seq;
    let (Some(poll), Some(handle)) = (state.poll.as_mut(), state.handle.as_ref()) else {
        return;
    };
    if poll.is_terminal {
        return;
    }
    if poll.fetch_in_flight {
        tracker_debug!("seq={} previous status check still in flight", seq);
        return;
    }
    if poll.attempts_made >= poll.max_attempts {
        let attempts = poll.attempts_made;
        tracker_warn!("seq={} no terminal status after {} checks", seq, attempts);
        finish(state, JobOutcome::TimedOut { attempts }, effects);
        effects.push(Effect::Emit(TrackerEvent::notice(
            format!("Error: analysis timed out after {attempts} status checks"),
            Severity::Error,
        )));
        push_finished(state, effects);
        return;
    }

    poll.attempts_made += 1;
    poll.fetch_in_flight = true;
    tracker_debug!(
        "seq={} status check {}/{}",
        seq,
        poll.attempts_made,
        poll.max_attempts
    );
    effects.push(Effect::FetchStatus {
        seq,
        handle: handle.clone(),
    });
}

fn apply_snapshot(state: &mut TrackerState, snapshot: StatusSnapshot, effects: &mut Vec<Effect>) {
    let reconciled = reconcile(state.log_count, &snapshot, state.display_percent);
    if reconciled.log_count < state.log_count {
        tracker_debug!(
            "seq={} log restarted ({} lines, had {})",
            state.seq,
            reconciled.log_count,
            state.log_count
        );
    }
    state.log_count = reconciled.log_count;
    state.display_percent = reconciled.display_percent;

    if let Some(progress) = reconciled.progress {
        effects.push(Effect::Emit(TrackerEvent::Progress(progress)));
    }
    if !reconciled.delta.is_empty() {
        effects.push(Effect::Emit(TrackerEvent::Log(reconciled.delta)));
    }

    if snapshot.is_complete {
        if snapshot.is_success && snapshot.error_text.is_none() {
            complete_successfully(state, snapshot.result, effects);
        } else {
            let reason = snapshot
                .error_text
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| "Analysis failed".to_string());
            tracker_warn!("seq={} service reported failure: {}", state.seq, reason);
            finish(state, JobOutcome::Failed(reason.clone()), effects);
            effects.push(Effect::Emit(TrackerEvent::notice(
                format!("Error: {reason}"),
                Severity::Error,
            )));
            push_finished(state, effects);
        }
    } else if let Some(text) = snapshot.error_text {
        // Errors on a job that is still running are not final.
        effects.push(Effect::Emit(TrackerEvent::notice(
            format!("Warning: {text}"),
            Severity::Warning,
        )));
    }
}

fn complete_successfully(
    state: &mut TrackerState,
    result: Option<serde_json::Value>,
    effects: &mut Vec<Effect>,
) {
    tracker_info!("seq={} analysis complete", state.seq);
    effects.push(Effect::Emit(TrackerEvent::notice(
        "Analysis complete",
        Severity::Success,
    )));
    finish(state, JobOutcome::Succeeded, effects);
    match result.filter(|value| !value.is_null()) {
        Some(raw) => {
            let assembled = assemble(&raw);
            effects.push(Effect::Emit(TrackerEvent::Result(Box::new(assembled))));
        }
        None => {
            tracker_warn!("seq={} success reported without a result", state.seq);
            effects.push(Effect::Emit(TrackerEvent::notice(
                "Warning: analysis finished without a result",
                Severity::Warning,
            )));
        }
    }
    push_finished(state, effects);
}

/// Marks the job terminal exactly once and releases the timer.
fn finish(state: &mut TrackerState, outcome: JobOutcome, effects: &mut Vec<Effect>) {
    if let Some(poll) = state.poll.as_mut() {
        poll.is_terminal = true;
        poll.fetch_in_flight = false;
    }
    if state.release_timer() {
        effects.push(Effect::CancelTimer);
    }
    state.phase = Phase::Terminal;
    state.outcome = Some(outcome);
}

fn push_finished(state: &TrackerState, effects: &mut Vec<Effect>) {
    if let Some(outcome) = state.outcome.clone() {
        effects.push(Effect::Emit(TrackerEvent::Finished(outcome)));
    }
}
