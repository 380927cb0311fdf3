use log::{info, warn};

/// Receives progress and status updates meant for the user.
pub trait Notifier: Send + Sync {
    /// A long running operation started
    fn started(&self);
    /// The operation finished, successfully or not
    fn finished(&self);
    /// Some of the requested objects could not be placed on the build plate
    fn partial_failure(&self, n_unplaced: usize);
    fn message(&self, text: &str);
}

/// Forwards all notifications to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn started(&self) {
        info!("[NOTIFY] multiplying objects");
    }

    fn finished(&self) {
        info!("[NOTIFY] done");
    }

    fn partial_failure(&self, n_unplaced: usize) {
        warn!("[NOTIFY] unable to find a location within the build volume for {n_unplaced} object(s)");
    }

    fn message(&self, text: &str) {
        info!("[NOTIFY] {text}");
    }
}
