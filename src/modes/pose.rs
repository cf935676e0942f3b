use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::net::DirectionDispatcher;
use crate::pose::{
    CaptureEvent, DirectionSet, FrameSource, ScriptedModel, Slot, SyntheticSource,
    spawn_classifier,
};

/// Capture cadence. Classification may run slower; the frame slot makes it
/// skip straight to the newest frame instead of building a backlog.
const CAPTURE_TICK: Duration = Duration::from_millis(33);

/// The perception process: capture loop, classification worker and the
/// dispatcher that forwards each classified direction to the game, one
/// label per line.
pub struct PoseMode {
    server_addr: String,
}

impl PoseMode {
    pub fn new(server_addr: String) -> Self {
        Self { server_addr }
    }

    pub async fn run(&mut self) -> Result<()> {
        // The game must already be listening; a refused connection here is
        // fatal rather than retried.
        let mut dispatcher = DirectionDispatcher::connect(&self.server_addr)
            .await
            .context("is the game running?")?;
        info!(addr = %self.server_addr, "connected to game server");

        let frames = Arc::new(Slot::new());
        let results = Arc::new(Slot::new());
        let worker = spawn_classifier(
            Arc::clone(&frames),
            Arc::clone(&results),
            ScriptedModel::sweep(),
        );

        let result = self
            .pump(&mut dispatcher, &frames, &results)
            .await;

        // Sentinel first, then wait for the worker to see it.
        frames.put(CaptureEvent::Shutdown);
        if worker.join().is_err() {
            warn!("classification worker panicked");
        }

        result
    }

    /// Drive the capture loop until the source runs dry or Ctrl-C arrives.
    async fn pump(
        &mut self,
        dispatcher: &mut DirectionDispatcher,
        frames: &Slot<CaptureEvent>,
        results: &Slot<DirectionSet>,
    ) -> Result<()> {
        let mut source = SyntheticSource::new(640, 480);
        let mut capture_timer = interval(CAPTURE_TICK);

        loop {
            tokio::select! {
                _ = capture_timer.tick() => {
                    // Forward whatever the classifier finished since the
                    // last tick, newest only.
                    if let Some(directions) = results.try_take() {
                        for direction in directions.iter() {
                            dispatcher.send(direction).await;
                        }
                    }

                    match source.capture().context("frame capture failed")? {
                        Some(frame) => frames.put(CaptureEvent::Frame(frame)),
                        None => {
                            info!("capture source ended");
                            return Ok(());
                        }
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down");
                    return Ok(());
                }
            }
        }
    }
}
