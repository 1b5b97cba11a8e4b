//! Tracker core: pure job-tracking state machine, status reconciliation and
//! result assembly. No IO happens here; see `tracker_engine` for that.
mod assemble;
mod effect;
mod event;
mod msg;
mod params;
mod reconcile;
mod result;
mod severity;
mod snapshot;
mod state;
mod update;

pub use assemble::{assemble, source_domain};
pub use effect::Effect;
pub use event::{JobOutcome, LogDelta, LogLine, ProgressRecord, TrackerEvent};
pub use msg::Msg;
pub use params::{
    Breadth, JobParameters, JobRequest, ParamsError, ALLOWED_BREADTHS, DAYS_OLD_RANGE,
};
pub use reconcile::{reconcile, Reconciled};
pub use result::{
    AnalysisResult, ArticleInfo, ReferenceEntry, ReliabilityVerdict, SkippedReference, NO_SUMMARY,
    UNAVAILABLE,
};
pub use severity::Severity;
pub use snapshot::{JobHandle, StatusLine, StatusSnapshot};
pub use state::{
    JobSeq, Phase, PollSettings, PollState, TrackerState, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_POLL_INTERVAL,
};
pub use update::update;
