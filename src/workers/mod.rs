//! # Workers
//! src/workers/mod.rs
//!
//! Pool fijo de threads que atienden los requests encolados.

pub mod pool;

pub use pool::WorkerPool;
