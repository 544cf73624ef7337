use serde_json::json;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::constants::events;
use crate::events::EventPublisher;

/// Background task that cancels a token after a fixed delay.
///
/// Disarm it once every job has finished so it never fires late.
#[derive(Debug)]
pub struct CancellationTrigger {
    handle: JoinHandle<()>,
    after: Duration,
}

impl CancellationTrigger {
    pub fn spawn(after: Duration, token: CancellationToken, publisher: EventPublisher) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            token.cancel();

            crate::log_runner!(warn, "Cancellation requested", after_ms: after.as_millis());
            publisher.publish(
                events::CANCELLATION_REQUESTED,
                json!({ "after_ms": after.as_millis() as u64 }),
            );
        });

        Self { handle, after }
    }

    /// Abort the trigger if it has not fired yet
    pub fn disarm(self) {
        if !self.handle.is_finished() {
            crate::log_runner!(debug, "Cancellation trigger disarmed", after_ms: self.after.as_millis());
            self.handle.abort();
        }
    }
}
