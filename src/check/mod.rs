//! Concurrent checking of input records.

mod engine;

pub use engine::{
    CheckEngine, CheckStats, DEFAULT_WORKERS, EngineError, MAX_WORKERS, MIN_WORKERS,
    stride_indices,
};
