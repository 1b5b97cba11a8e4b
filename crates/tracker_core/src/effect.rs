use std::time::Duration;

use crate::{JobHandle, JobParameters, JobSeq, TrackerEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Submit { seq: JobSeq, params: JobParameters },
    /// Arm a repeating timer; the first tick is due one interval from now.
    StartTimer { seq: JobSeq, interval: Duration },
    CancelTimer,
    FetchStatus { seq: JobSeq, handle: JobHandle },
    Emit(TrackerEvent),
}
