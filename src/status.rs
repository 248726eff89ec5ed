// Status sink: where setup and send failures get surfaced.
// The core reports and keeps going; the sink decides how to display it.

use tracing::warn;

pub trait StatusSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Default sink, forwards reports to the tracing subscriber
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn report(&self, message: &str) {
        warn!("{message}");
    }
}
