use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracker_core::{
    update, Effect, JobOutcome, JobRequest, Msg, PollSettings, TrackerEvent, TrackerState,
};
use tracker_logging::{tracker_debug, tracker_error, tracker_info};

use crate::{JobClient, PresentationSink};

struct ActiveJob {
    cancel: CancellationToken,
    task: JoinHandle<Option<JobOutcome>>,
}

/// Tracks one job at a time: submits it, polls its status and forwards events
/// to the sink. Instances share nothing, so several can run side by side.
pub struct PollingOrchestrator {
    client: Arc<dyn JobClient>,
    sink: Arc<dyn PresentationSink>,
    settings: PollSettings,
    active: Option<ActiveJob>,
    last_outcome: Option<JobOutcome>,
}

impl PollingOrchestrator {
    pub fn new(
        client: Arc<dyn JobClient>,
        sink: Arc<dyn PresentationSink>,
        settings: PollSettings,
    ) -> Self {
        Self {
            client,
            sink,
            settings,
            active: None,
            last_outcome: None,
        }
    }

    /// Starts tracking a new job, cancelling any job already in progress.
    ///
    /// An invalid request is reported to the sink before this returns and no
    /// task is spawned. Otherwise the job runs on a Tokio task, so this must be
    /// called from within a Tokio runtime.
    pub fn start(&mut self, request: JobRequest) {
        self.stop();
        self.last_outcome = None;

        let (state, effects) = update(TrackerState::new(self.settings), Msg::StartRequested(request));
        if state.is_settled() {
            for effect in effects {
                if let Effect::Emit(event) = effect {
                    self.sink.emit(event);
                }
            }
            self.last_outcome = state.outcome().cloned();
            return;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(drive(
            state,
            effects,
            Arc::clone(&self.client),
            Arc::clone(&self.sink),
            cancel.clone(),
        ));
        self.active = Some(ActiveJob { cancel, task });
    }

    /// Stops tracking. Replies still in flight are discarded. Safe to call at any time.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            if !active.task.is_finished() {
                tracker_info!("stopping job tracking");
            }
            active.cancel.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }

    /// Waits for the current job to settle and returns its outcome.
    ///
    /// `None` when no job was started or the job was stopped before it settled.
    ///
    /// Dropping the returned future leaves the job running and still under
    /// the control of `stop`, `start` and `Drop`.
    pub async fn wait(&mut self) -> Option<JobOutcome> {
        if let Some(active) = self.active.as_mut() {
            let joined = (&mut active.task).await;
            self.active = None;
            self.last_outcome = match joined {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracker_error!("job tracking task ended abnormally: {}", err);
                    None
                }
            };
        }
        self.last_outcome.clone()
    }
}

impl Drop for PollingOrchestrator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Runs the state machine for one job until it settles or is cancelled.
async fn drive(
    mut state: TrackerState,
    initial: Vec<Effect>,
    client: Arc<dyn JobClient>,
    sink: Arc<dyn PresentationSink>,
    cancel: CancellationToken,
) -> Option<JobOutcome> {
    let mut pending: VecDeque<Effect> = initial.into();
    let mut timer: Option<Interval> = None;

    loop {
        while let Some(effect) = pending.pop_front() {
            if cancel.is_cancelled() {
                return None;
            }
            let msg = match effect {
                Effect::Emit(event) => {
                    emit(sink.as_ref(), event);
                    continue;
                }
                Effect::StartTimer { interval, .. } => {
                    timer = Some(poll_timer(interval));
                    continue;
                }
                Effect::CancelTimer => {
                    timer = None;
                    continue;
                }
                Effect::Submit { seq, params } => {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => return None,
                        result = client.submit(&params) => result,
                    };
                    Msg::SubmitFinished {
                        seq,
                        result: result.map_err(|err| err.to_string()),
                    }
                }
                Effect::FetchStatus { seq, handle } => {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => return None,
                        result = client.fetch_status(&handle) => result,
                    };
                    Msg::StatusFetched {
                        seq,
                        result: result.map_err(|err| err.to_string()),
                    }
                }
            };
            let (next, effects) = update(state, msg);
            state = next;
            pending.extend(effects);
        }

        let Some(ticker) = timer.as_mut() else {
            break;
        };
        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = ticker.tick() => {}
        }
        let seq = state.seq();
        let (next, effects) = update(state, Msg::Tick { seq });
        state = next;
        pending.extend(effects);
    }

    tracker_debug!("job settled in phase {:?}", state.phase());
    state.outcome().cloned()
}

fn emit(sink: &dyn PresentationSink, event: TrackerEvent) {
    if let TrackerEvent::Finished(outcome) = &event {
        tracker_info!("job {}", outcome);
    }
    sink.emit(event);
}

/// Repeating timer whose first tick is one full interval away.
fn poll_timer(interval: Duration) -> Interval {
    let period = interval.max(Duration::from_millis(1));
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
