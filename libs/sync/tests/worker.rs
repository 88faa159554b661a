#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use sync::worker::Worker;
    use tokio::sync::{Notify, broadcast};
    use tokio::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_worker_waits_the_returned_pause() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, _) = broadcast::channel(1);

        let counter = Arc::clone(&calls);
        let handle = Worker::spawn("test", &shutdown_tx, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Duration::from_secs(2)
            }
        });

        // iterations at t = 0, 2, 4, 6
        tokio::time::sleep(Duration::from_millis(6_500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        let _ = shutdown_tx.send(());
        handle.await.expect("worker panicked");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_a_long_pause() {
        let (shutdown_tx, _) = broadcast::channel(1);

        let handle =
            Worker::spawn("idle", &shutdown_tx, || async { Duration::from_secs(3_600) });

        tokio::time::sleep(Duration::from_millis(10)).await;
        let _ = shutdown_tx.send(());

        let stopped = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(stopped.is_ok(), "worker kept sleeping after shutdown");
    }

    #[tokio::test]
    async fn test_iteration_in_progress_completes() {
        let started = Arc::new(Notify::new());
        let finished = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, _) = broadcast::channel(1);

        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));
        let handle = Worker::spawn("busy", &shutdown_tx, move || {
            let (s, f) = (Arc::clone(&s), Arc::clone(&f));
            async move {
                s.notify_one();
                tokio::time::sleep(Duration::from_millis(50)).await;
                f.fetch_add(1, Ordering::SeqCst);
                Duration::from_millis(1)
            }
        });

        started.notified().await;
        let _ = shutdown_tx.send(());
        handle.await.expect("worker panicked");

        assert!(finished.load(Ordering::SeqCst) >= 1);
    }
}
