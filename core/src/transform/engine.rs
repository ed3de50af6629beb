use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::codec::{CipherSample, CodecTable, Direction};
use crate::constants::DEFAULT_GPU_THRESHOLD;
use crate::pixel::{PixelBuffer, Samples};
use crate::transform::parallelism::{HybridParallelismProfile, Scheduler, WorkerTarget};
use crate::transform::types::{Strategy, TransformBackend, TransformError};
use crate::transform::worker_cpu::{SequentialBackend, ThreadedBackend};
use crate::transform::worker_gpu::GpuTransformBackend;

/// Threaded backend plus an optional accelerator, chosen per buffer by a `Scheduler`.
pub struct AutoBackend {
    cpu: Arc<dyn TransformBackend>,
    gpu: Option<Arc<dyn TransformBackend>>,
    scheduler: Mutex<Scheduler>,
}

impl AutoBackend {
    /// The accelerator is only probed when the profile reports a GPU.
    pub fn new(profile: &HybridParallelismProfile, gpu_threshold: usize) -> Result<Self, TransformError> {
        let cpu: Arc<dyn TransformBackend> = Arc::new(ThreadedBackend::new(profile.cpu_workers)?);
        let gpu = if profile.gpu_workers > 0 {
            match GpuTransformBackend::new() {
                Ok(gpu) => Some(Arc::new(gpu) as Arc<dyn TransformBackend>),
                Err(e) => {
                    debug!("[AUTO] accelerator not usable, CPU only: {e}");
                    None
                }
            }
        } else {
            None
        };
        let gpu_workers = usize::from(gpu.is_some());
        let scheduler = Scheduler::new(profile.cpu_workers, gpu_workers, gpu_threshold);
        Ok(Self::from_parts(cpu, gpu, scheduler))
    }

    /// Assemble from already built backends. Targets the scheduler picks for a missing
    /// accelerator run on `cpu`.
    pub fn from_parts(
        cpu: Arc<dyn TransformBackend>,
        gpu: Option<Arc<dyn TransformBackend>>,
        scheduler: Scheduler,
    ) -> Self {
        Self { cpu, gpu, scheduler: Mutex::new(scheduler) }
    }

    pub fn has_accelerator(&self) -> bool {
        self.gpu.is_some()
    }

    fn run<T>(
        &self,
        samples: usize,
        f: impl FnOnce(&dyn TransformBackend) -> Result<T, TransformError>,
    ) -> Result<T, TransformError> {
        let target = self.scheduler.lock().unwrap_or_else(|e| e.into_inner()).dispatch(samples);
        debug!("[AUTO] {} samples -> {:?}", samples, target);
        let result = match (&self.gpu, target) {
            (Some(gpu), WorkerTarget::Gpu(_)) => f(gpu.as_ref()),
            _ => f(self.cpu.as_ref()),
        };
        self.scheduler.lock().unwrap_or_else(|e| e.into_inner()).complete(target);
        result
    }
}

impl TransformBackend for AutoBackend {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn encrypt(&self, table: &CodecTable, input: &[u8], out: &mut [CipherSample]) -> Result<(), TransformError> {
        self.run(input.len(), |b| b.encrypt(table, input, out))
    }

    fn decrypt(&self, table: &CodecTable, input: &[CipherSample], out: &mut [u8]) -> Result<(), TransformError> {
        self.run(input.len(), |b| b.decrypt(table, input, out))
    }
}

/// Factory: build the backend for `strategy`.
///
/// `Accelerator` degrades to `Threaded(profile.cpu_workers)` with a warning when no adapter can
/// be acquired. `Threaded(0)` is rejected.
pub fn make_backend(
    strategy: &Strategy,
    profile: &HybridParallelismProfile,
) -> Result<Arc<dyn TransformBackend>, TransformError> {
    let backend: Arc<dyn TransformBackend> = match *strategy {
        Strategy::Sequential => Arc::new(SequentialBackend),
        Strategy::Threaded(n) => Arc::new(ThreadedBackend::new(n)?),
        Strategy::Accelerator => match GpuTransformBackend::new() {
            Ok(gpu) => Arc::new(gpu),
            Err(e) => {
                warn!(
                    "[TRANSFORM] {e}; falling back to threaded with {} workers",
                    profile.cpu_workers
                );
                Arc::new(ThreadedBackend::new(profile.cpu_workers)?)
            }
        },
        Strategy::Auto => Arc::new(AutoBackend::new(profile, DEFAULT_GPU_THRESHOLD)?),
    };
    debug!("[TRANSFORM] strategy {} -> backend {}", strategy, backend.name());
    Ok(backend)
}

/// A backend bound once and reused across buffers. Cheap to clone.
#[derive(Clone)]
pub struct TransformEngine {
    backend: Arc<dyn TransformBackend>,
}

impl TransformEngine {
    pub fn new(strategy: &Strategy, profile: &HybridParallelismProfile) -> Result<Self, TransformError> {
        Ok(Self { backend: make_backend(strategy, profile)? })
    }

    pub fn from_backend(backend: Arc<dyn TransformBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Map every sample of `buffer` through `table` in `direction`.
    ///
    /// Plain buffers encrypt to ciphertext buffers and vice versa; geometry is preserved. An
    /// empty buffer comes back unchanged.
    pub fn apply(
        &self,
        buffer: &PixelBuffer,
        table: &CodecTable,
        direction: Direction,
    ) -> Result<PixelBuffer, TransformError> {
        if buffer.is_empty() {
            return Ok(buffer.clone());
        }
        match (&buffer.samples, direction) {
            (Samples::Plain(input), Direction::Encrypt) => {
                let mut out = vec![0 as CipherSample; input.len()];
                self.backend.encrypt(table, input, &mut out)?;
                Ok(buffer.with_samples(Samples::Cipher(out)))
            }
            (Samples::Cipher(input), Direction::Decrypt) => {
                let mut out = vec![0u8; input.len()];
                self.backend.decrypt(table, input, &mut out)?;
                Ok(buffer.with_samples(Samples::Plain(out)))
            }
            (samples, direction) => Err(TransformError::DirectionMismatch {
                direction,
                samples: samples.kind(),
            }),
        }
    }
}

/// One-shot transform. Builds a backend for `strategy` on every call; hold a `TransformEngine`
/// to reuse one.
pub fn transform(
    buffer: &PixelBuffer,
    table: &CodecTable,
    direction: Direction,
    strategy: &Strategy,
) -> Result<PixelBuffer, TransformError> {
    let profile = HybridParallelismProfile::new(num_cpus::get(), 1, 1);
    TransformEngine::new(strategy, &profile)?.apply(buffer, table, direction)
}
