pub mod block;
pub mod breaker;
pub mod error;
pub mod gateway;
pub mod governor;
pub mod pool;
pub mod rpc;
