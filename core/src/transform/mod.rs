//! Parallel pixel transform.
//!
//! Responsibilities:
//! - Apply a codec table element-wise across a pixel buffer
//! - Sequential, threaded (rayon pool) and accelerator (wgpu compute) backends
//! - Host profiling and load-aware dispatch for the `Auto` strategy
//!
//! Non-responsibilities:
//! - Key material and table construction
//! - Image I/O

pub mod types;
pub mod worker_cpu;
pub mod worker_gpu;
pub mod parallelism;
pub mod engine;

pub use types::{
    Strategy,
    TransformBackend,
    TransformError,
};
pub use worker_cpu::{
    SequentialBackend,
    ThreadedBackend,
};
pub use worker_gpu::{
    GpuTransformBackend,
};
pub use parallelism::{
    detect_gpu_count,
    HybridParallelismProfile,
    Scheduler,
    WorkerTarget,
};
pub use engine::{
    make_backend,
    transform,
    AutoBackend,
    TransformEngine,
};
