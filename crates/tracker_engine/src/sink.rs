use tokio::sync::mpsc;
use tracker_core::TrackerEvent;

/// Receives display events. Nothing flows back into the tracker.
pub trait PresentationSink: Send + Sync {
    fn emit(&self, event: TrackerEvent);
}

/// Forwards events to an async consumer.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TrackerEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<TrackerEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TrackerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl PresentationSink for ChannelSink {
    fn emit(&self, event: TrackerEvent) {
        let _ = self.tx.send(event);
    }
}
