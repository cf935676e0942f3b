use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

use super::classifier::{DirectionSet, HeadPoseClassifier};
use super::frame::CaptureEvent;
use super::model::FaceModel;
use super::slot::Slot;

/// How long the worker waits on the frame slot before checking again.
const POLL_WAIT: Duration = Duration::from_millis(100);

/// Spawn the classification worker on its own thread, keeping the blocking
/// model work off the async runtime.
///
/// The worker always consumes the freshest frame from `frames` (stale ones
/// were already overwritten in the slot), publishes the resulting direction
/// set into `results`, and exits when it observes the shutdown sentinel.
pub fn spawn_classifier<M>(
    frames: Arc<Slot<CaptureEvent>>,
    results: Arc<Slot<DirectionSet>>,
    model: M,
) -> JoinHandle<()>
where
    M: FaceModel + Send + 'static,
{
    thread::spawn(move || {
        let mut classifier = HeadPoseClassifier::new(model);
        loop {
            match frames.take_timeout(POLL_WAIT) {
                Some(CaptureEvent::Frame(frame)) => {
                    results.put(classifier.classify(&frame));
                }
                Some(CaptureEvent::Shutdown) => {
                    debug!("classification worker shutting down");
                    break;
                }
                None => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::classifier::HeadDirection;
    use crate::pose::frame::{Frame, PixelFormat};
    use crate::pose::model::ScriptedModel;

    #[test]
    fn test_worker_classifies_and_exits_on_sentinel() {
        let frames = Arc::new(Slot::new());
        let results = Arc::new(Slot::new());
        let worker = spawn_classifier(
            Arc::clone(&frames),
            Arc::clone(&results),
            ScriptedModel::new(vec![(0.0, 25.0)], 1),
        );

        frames.put(CaptureEvent::Frame(Frame::filled(
            4,
            4,
            PixelFormat::Srgb8,
            0,
        )));

        let directions = results
            .take_timeout(Duration::from_secs(5))
            .expect("worker produced no result");
        assert_eq!(directions.as_slice(), [HeadDirection::Left]);

        frames.put(CaptureEvent::Shutdown);
        worker.join().unwrap();
    }
}
