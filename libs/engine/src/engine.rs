use crate::poller::Poller;
use crate::tailer::Tailer;
use std::sync::Arc;
use sync::worker::Worker;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// The two ingestion loops, each on its own worker, sharing one shutdown signal.
pub struct Engine {
    shutdown_tx: broadcast::Sender<()>,
    tailer_handle: Option<JoinHandle<()>>,
    poller_handle: Option<JoinHandle<()>>,
}

impl Engine {
    pub fn start(tailer: Option<Arc<Tailer>>, poller: Option<Arc<Poller>>) -> Self {
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let tailer_handle = tailer.map(|tailer| {
            Worker::spawn("tailer", &shutdown_tx, move || {
                let tailer = Arc::clone(&tailer);
                async move { tailer.tick().await }
            })
        });

        let poller_handle = poller.map(|poller| {
            Worker::spawn("poller", &shutdown_tx, move || {
                let poller = Arc::clone(&poller);
                async move { poller.tick().await }
            })
        });

        if tailer_handle.is_none() && poller_handle.is_none() {
            tracing::warn!("Engine started with no loops enabled");
        }

        Self { shutdown_tx, tailer_handle, poller_handle }
    }

    pub fn is_idle(&self) -> bool {
        self.tailer_handle.is_none() && self.poller_handle.is_none()
    }

    // Send shutdown signal and wait for both loops to finish their current iteration
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        for handle in [self.tailer_handle, self.poller_handle].into_iter().flatten() {
            if let Err(e) = handle.await {
                tracing::error!("Worker terminated abnormally: {e:?}");
            }
        }
    }
}
