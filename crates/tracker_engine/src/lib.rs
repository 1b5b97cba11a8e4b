//! Tracker engine: HTTP transport to the analysis service and the async
//! polling loop that drives `tracker_core`.
mod client;
mod orchestrator;
mod sink;
mod types;
mod wire;

pub use client::{ClientSettings, JobClient, ReqwestJobClient, DEFAULT_BASE_URL};
pub use orchestrator::PollingOrchestrator;
pub use sink::{ChannelSink, PresentationSink};
pub use tracker_core::PollSettings;
pub use types::{ClientError, FailureKind};
