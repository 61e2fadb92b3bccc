//! Event log subscriber: traces every published pipeline event.

use tokio::sync::broadcast;

use crate::bus::PipelineEvent;

/// Consume events until the bus is dropped, writing each to the log.
///
/// Intended to be spawned via `tokio::spawn` with a fresh subscription.
pub async fn run(mut rx: broadcast::Receiver<PipelineEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                tracing::info!(
                    event_type = %event.event_type,
                    entity_type = %event.entity_type,
                    entity_id = %event.entity_id,
                    action = %event.action,
                    from_state = %event.from_state,
                    to_state = %event.to_state,
                    "Pipeline event"
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event logger lagged behind the bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
