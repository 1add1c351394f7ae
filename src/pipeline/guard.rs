// src/pipeline/guard.rs

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::PipelineError;
use crate::types::TriggerWhileRunningBehaviour;

/// Single-slot lock owned by the controller: at most one pipeline mutates
/// the working copy and output directory at a time.
///
/// What an overlapping trigger does depends on the configured behaviour:
///
/// - `Queue`: wait until the running pipeline releases the slot. Waiters are
///   served in arrival order (tokio's mutex is fair).
/// - `Reject`: return [`PipelineError::Busy`] immediately.
#[derive(Debug)]
pub struct TriggerGuard {
    behaviour: TriggerWhileRunningBehaviour,
    slot: Mutex<()>,
}

/// Held for the duration of one trigger; dropping it frees the slot.
pub type TriggerSlot<'a> = MutexGuard<'a, ()>;

impl TriggerGuard {
    pub fn new(behaviour: TriggerWhileRunningBehaviour) -> Self {
        Self {
            behaviour,
            slot: Mutex::new(()),
        }
    }

    /// Whether a trigger currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.slot.try_lock().is_err()
    }

    pub async fn acquire(&self) -> Result<TriggerSlot<'_>, PipelineError> {
        if let Ok(slot) = self.slot.try_lock() {
            debug!("pipeline slot acquired");
            return Ok(slot);
        }

        match self.behaviour {
            TriggerWhileRunningBehaviour::Queue => {
                info!("pipeline already running; queued trigger waiting for it to finish");
                let slot = self.slot.lock().await;
                debug!("queued trigger acquired pipeline slot");
                Ok(slot)
            }
            TriggerWhileRunningBehaviour::Reject => {
                warn!("pipeline already running; rejecting overlapping trigger");
                Err(PipelineError::Busy)
            }
        }
    }
}
