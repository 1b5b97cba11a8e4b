use crate::{JobHandle, JobRequest, JobSeq, StatusSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Caller asked to track a new job; cancels any job in progress.
    StartRequested(JobRequest),
    /// The submit request resolved.
    SubmitFinished {
        seq: JobSeq,
        result: Result<JobHandle, String>,
    },
    /// Poll timer fired.
    Tick { seq: JobSeq },
    /// A status read resolved.
    StatusFetched {
        seq: JobSeq,
        result: Result<StatusSnapshot, String>,
    },
    /// Caller asked to stop tracking.
    StopRequested,
}
