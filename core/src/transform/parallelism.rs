//! transform/parallelism.rs
//!
//! Host profiling (CPU cores, free memory, GPU devices) and the load-aware scheduler behind the
//! `Auto` strategy.

use log::{debug, info};

use crate::constants::GPU_QUEUE_DEPTH;

#[cfg(feature = "opencl")]
fn detect_opencl_count() -> usize {
    let mut cl_count = 0;
    for p in ocl::Platform::list() {
        if let Ok(devices) = ocl::Device::list_all(p) {
            cl_count += devices.len();
        }
    }
    if cl_count > 0 {
        debug!("[GPU DETECT] OpenCL devices found: {}", cl_count);
    }
    cl_count
}

async fn detect_wgpu_count() -> usize {
    let instance = wgpu::Instance::default();
    let adapters = instance.enumerate_adapters(wgpu::Backends::all()).await;
    if !adapters.is_empty() {
        debug!("[GPU DETECT] wgpu adapters found: {}", adapters.len());
    }
    adapters.len()
}

/// Number of GPU devices visible through CUDA, OpenCL (feature-gated) or wgpu.
pub fn detect_gpu_count() -> usize {
    #[cfg(feature = "cuda")]
    {
        if let Ok(count) = cust::device::Device::num_devices() {
            if count > 0 {
                debug!("[GPU DETECT] CUDA devices found: {}", count);
                return count as usize;
            }
        }
    }

    #[cfg(feature = "opencl")]
    {
        let cl_count = detect_opencl_count();
        if cl_count > 0 {
            return cl_count;
        }
    }

    let wgpu_count = pollster::block_on(detect_wgpu_count());
    if wgpu_count > 0 {
        return wgpu_count;
    }

    debug!("[GPU DETECT] No GPU devices found");
    0
}

/// Worker counts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridParallelismProfile {
    /// Threads for the threaded backend and batch workers.
    pub cpu_workers: usize,
    pub gpu_workers: usize,
    /// Images decoded and queued ahead of the workers.
    pub inflight_images: usize,
}

impl HybridParallelismProfile {
    pub fn new(cpu_workers: usize, gpu_workers: usize, inflight_images: usize) -> Self {
        Self {
            cpu_workers: cpu_workers.max(1),
            gpu_workers,
            inflight_images: inflight_images.max(1),
        }
    }

    pub fn single_threaded() -> Self {
        Self {
            cpu_workers: 1,
            gpu_workers: 0,
            inflight_images: 1,
        }
    }

    /// Profile the host without probing for GPUs: one CPU worker per core minus one, and as many
    /// in-flight images as `mem_fraction` of free memory holds at `max_image_bytes` each, capped
    /// at `hard_cap`.
    pub fn cpu_only(max_image_bytes: u64, mem_fraction: f64, hard_cap: usize) -> Self {
        let cores = num_cpus::get();
        let cpu_workers = cores.saturating_sub(1).max(1);

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let avail_bytes = sys.available_memory();
        let budget = (avail_bytes as f64 * mem_fraction) as u64;
        let max_images = budget / max_image_bytes.max(1);

        Self {
            cpu_workers,
            gpu_workers: 0,
            inflight_images: (max_images.min(hard_cap as u64) as usize).max(1),
        }
    }

    /// `cpu_only` plus the GPU count from `detect_gpu_count`.
    pub fn dynamic(max_image_bytes: u64, mem_fraction: f64, hard_cap: usize) -> Self {
        let mut profile = Self::cpu_only(max_image_bytes, mem_fraction, hard_cap);
        profile.gpu_workers = detect_gpu_count();

        info!(
            "[PROFILE] cpu_workers={}, gpu_workers={}, inflight_images={}",
            profile.cpu_workers, profile.gpu_workers, profile.inflight_images
        );
        profile
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerTarget {
    Cpu(usize),
    Gpu(usize),
}

fn least_loaded(load: &[usize]) -> Option<usize> {
    load.iter()
        .enumerate()
        .min_by_key(|(_, l)| **l)
        .map(|(idx, _)| idx)
}

/// Tracks queue depth per worker.
///
/// Dispatch rules:
/// - A buffer at or above `gpu_threshold` samples goes to the least loaded GPU, unless every GPU
///   already holds `gpu_queue_depth` buffers; then it goes to the least loaded CPU slot
/// - A smaller buffer goes to the least loaded CPU slot, unless every CPU slot is busy and a GPU
///   has room
#[derive(Debug, Clone)]
pub struct Scheduler {
    cpu_load: Vec<usize>,
    gpu_load: Vec<usize>,
    gpu_threshold: usize,
    gpu_queue_depth: usize,
}

impl Scheduler {
    pub fn new(cpu_workers: usize, gpu_workers: usize, gpu_threshold: usize) -> Self {
        Scheduler {
            cpu_load: vec![0; cpu_workers.max(1)],
            gpu_load: vec![0; gpu_workers],
            gpu_threshold,
            gpu_queue_depth: GPU_QUEUE_DEPTH,
        }
    }

    pub fn with_gpu_queue_depth(mut self, depth: usize) -> Self {
        self.gpu_queue_depth = depth.max(1);
        self
    }

    /// Least loaded GPU that can still take a buffer.
    fn gpu_with_room(&self) -> Option<usize> {
        least_loaded(&self.gpu_load).filter(|idx| self.gpu_load[*idx] < self.gpu_queue_depth)
    }

    pub fn dispatch(&mut self, samples: usize) -> WorkerTarget {
        let cpu = least_loaded(&self.cpu_load).unwrap_or(0);
        let cpu_saturated = self.cpu_load.get(cpu).is_some_and(|l| *l > 0);

        match self.gpu_with_room() {
            Some(gpu) if samples >= self.gpu_threshold || cpu_saturated => {
                self.gpu_load[gpu] += 1;
                WorkerTarget::Gpu(gpu)
            }
            _ => {
                if let Some(load) = self.cpu_load.get_mut(cpu) {
                    *load += 1;
                }
                WorkerTarget::Cpu(cpu)
            }
        }
    }

    pub fn complete(&mut self, target: WorkerTarget) {
        let slot = match target {
            WorkerTarget::Cpu(idx) => self.cpu_load.get_mut(idx),
            WorkerTarget::Gpu(idx) => self.gpu_load.get_mut(idx),
        };
        if let Some(load) = slot {
            *load = load.saturating_sub(1);
        }
    }

    pub fn cpu_load(&self) -> &[usize] {
        &self.cpu_load
    }

    pub fn gpu_load(&self) -> &[usize] {
        &self.gpu_load
    }
}
