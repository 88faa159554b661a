pub mod args;
pub mod catchup;
pub mod checkpointer;
pub mod engine;
pub mod metrics;
pub mod poller;
pub mod retry;
pub mod tailer;
pub mod throttle;
pub mod sink {
    pub mod block;
    pub mod event;
    pub mod handle;
}
