use std::{future::Future, pin::Pin, sync::Arc, time::Duration};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// One loop iteration. Resolves to how long to pause before the next one.
pub type WorkerCallback =
    dyn Fn() -> Pin<Box<dyn Future<Output = Duration> + Send>> + Send + Sync + 'static;

/// Runs a callback in a loop until the shutdown channel fires.
///
/// Shutdown is observed between iterations and while pausing; an iteration
/// that has started always runs to completion.
pub struct Worker {
    name: &'static str,
    callback: Arc<WorkerCallback>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl Worker {
    pub fn new(
        name: &'static str,
        callback: Arc<WorkerCallback>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self { name, callback, shutdown_rx }
    }

    pub fn spawn<F, Fut>(
        name: &'static str,
        shutdown_tx: &broadcast::Sender<()>,
        callback_factory: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Duration> + Send + 'static,
    {
        let callback: Arc<WorkerCallback> = Arc::new(move || Box::pin(callback_factory()));

        // subscribe before spawning so an early shutdown is not missed
        let worker = Worker::new(name, callback, shutdown_tx.subscribe());

        tokio::spawn(worker.run())
    }

    pub async fn run(mut self) {
        tracing::info!(worker = self.name, "Worker started");
        let mut iterations: u64 = 0;

        loop {
            match self.shutdown_rx.try_recv() {
                Err(TryRecvError::Empty) => {}
                _ => break,
            }

            let pause = (self.callback)().await;
            iterations += 1;

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = self.shutdown_rx.recv() => break,
            }
        }

        tracing::info!(worker = self.name, iterations, "Worker stopped");
    }
}
