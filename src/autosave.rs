//! Auto-save background loop.
//!
//! Spawns a tokio task that fires [`Trigger::AutoSaveTick`] on a fixed
//! interval. Ticks take the session lock like any other trigger, so a tick
//! never overlaps a user action.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::sync::{SharedSession, SyncController, SyncResponse, Trigger};

/// Default interval between auto-save ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Periodic auto-save driver.
pub struct AutoSaver {
    controller: Arc<SyncController>,
    session: SharedSession,
    interval: Duration,
    /// Receives every tick's response, if set.
    response_tx: Option<mpsc::UnboundedSender<SyncResponse>>,
}

impl AutoSaver {
    pub fn new(controller: Arc<SyncController>, session: SharedSession) -> Self {
        Self {
            controller,
            session,
            interval: DEFAULT_INTERVAL,
            response_tx: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Forward each tick's response to `tx`. The loop stops when `tx` closes.
    pub fn with_response_channel(mut self, tx: mpsc::UnboundedSender<SyncResponse>) -> Self {
        self.response_tx = Some(tx);
        self
    }

    /// Run one tick now.
    pub async fn tick(&self) -> SyncResponse {
        let mut session = self.session.lock().await;
        self.controller.handle(&mut session, Trigger::AutoSaveTick)
    }

    /// Start the background loop.
    pub fn run(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("auto-save started, every {:?}", self.interval);
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the first save waits a full period.
            interval.tick().await;

            loop {
                interval.tick().await;
                let response = self.tick().await;
                debug!(status = %response.status, "auto-save tick");

                if let Some(tx) = &self.response_tx {
                    if tx.send(response).is_err() {
                        debug!("auto-save response channel closed, stopping");
                        return;
                    }
                }
            }
        })
    }
}
