//! Periodic scan for generation jobs that died without reporting back.
//!
//! An entity left in `generating` past the staleness window is flagged in
//! the log and published on the event bus; the reset itself stays a manual
//! operation (`POST /{entity_type}/{id}/reset`) so an operator decides
//! whether to re-queue.

use std::sync::Arc;
use std::time::Duration;

use novela_db::repositories::EntityStateRepo;
use novela_db::DbPool;
use novela_events::{EventBus, PipelineEvent};
use tokio_util::sync::CancellationToken;

/// How often the monitor scans.
const CHECK_INTERVAL: Duration = Duration::from_secs(300); // 5 minutes

/// Run the stuck-generation monitor loop.
///
/// Scans every resettable entity table for rows in `generating` older than
/// `staleness_minutes`. Runs until `cancel` is triggered.
pub async fn run(
    pool: DbPool,
    event_bus: Arc<EventBus>,
    staleness_minutes: i64,
    cancel: CancellationToken,
) {
    let window = chrono::Duration::minutes(staleness_minutes);

    tracing::info!(
        staleness_minutes,
        interval_secs = CHECK_INTERVAL.as_secs(),
        "Stuck-generation monitor started"
    );

    let mut interval = tokio::time::interval(CHECK_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Stuck-generation monitor stopping");
                break;
            }
            _ = interval.tick() => {
                match EntityStateRepo::list_stuck_all(&pool, window).await {
                    Ok(stuck) if stuck.is_empty() => {
                        tracing::debug!("Stuck-generation monitor: nothing stuck");
                    }
                    Ok(stuck) => {
                        tracing::warn!(count = stuck.len(), "Entities stuck in generating");
                        for entity in &stuck {
                            tracing::warn!(
                                entity_type = entity.entity_type,
                                entity_id = %entity.id,
                                updated_at = %entity.updated_at,
                                "Entity stuck in generating past staleness window"
                            );
                            let mut event = PipelineEvent::state_changed(
                                entity.entity_type,
                                entity.id,
                                "stuck_detected",
                                &entity.state,
                                &entity.state,
                            );
                            event.event_type = "entity.stuck_detected".to_string();
                            event_bus.publish(event);
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Stuck-generation monitor scan failed");
                    }
                }
            }
        }
    }
}
