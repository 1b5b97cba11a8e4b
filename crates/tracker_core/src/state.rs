use std::time::Duration;

use crate::{JobHandle, JobOutcome};

/// Sequence number of a `start` call; messages carrying an older one are stale.
pub type JobSeq = u64;

/// Reference spacing between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
/// Reference attempt budget (about five minutes at the default interval).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Polling bookkeeping for the job currently being tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    pub attempts_made: u32,
    pub max_attempts: u32,
    pub interval: Duration,
    pub is_terminal: bool,
    pub fetch_in_flight: bool,
    pub(crate) timer_armed: bool,
}

impl PollState {
    pub(crate) fn new(settings: PollSettings) -> Self {
        Self {
            attempts_made: 0,
            max_attempts: settings.max_attempts,
            interval: settings.interval,
            is_terminal: false,
            fetch_in_flight: false,
            timer_armed: true,
        }
    }

    pub fn timer_armed(&self) -> bool {
        self.timer_armed
    }

    /// Releases the timer; returns whether it was still armed.
    pub(crate) fn release_timer(&mut self) -> bool {
        std::mem::replace(&mut self.timer_armed, false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerState {
    settings: PollSettings,
    pub(crate) seq: JobSeq,
    pub(crate) phase: Phase,
    pub(crate) handle: Option<JobHandle>,
    pub(crate) poll: Option<PollState>,
    pub(crate) display_percent: u8,
    pub(crate) log_count: usize,
    pub(crate) outcome: Option<JobOutcome>,
}

impl TrackerState {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    pub fn seq(&self) -> JobSeq {
        self.seq
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        self.handle.as_ref()
    }

    pub fn poll(&self) -> Option<&PollState> {
        self.poll.as_ref()
    }

    pub fn display_percent(&self) -> u8 {
        self.display_percent
    }

    pub fn log_count(&self) -> usize {
        self.log_count
    }

    pub fn outcome(&self) -> Option<&JobOutcome> {
        self.outcome.as_ref()
    }

    /// True once nothing more will happen without a new `start`.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Terminal)
    }

    /// Forgets the previous job and returns the new sequence number.
    pub(crate) fn reset_for_new_job(&mut self) -> JobSeq {
        self.seq += 1;
        self.phase = Phase::Idle;
        self.handle = None;
        self.poll = None;
        self.display_percent = 0;
        self.log_count = 0;
        self.outcome = None;
        self.seq
    }

    /// Releases the timer of the current job, if one is armed.
    pub(crate) fn release_timer(&mut self) -> bool {
        self.poll
            .as_mut()
            .map(PollState::release_timer)
            .unwrap_or(false)
    }
}
