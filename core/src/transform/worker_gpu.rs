//! transform/worker_gpu.rs
//!
//! wgpu compute backend. One invocation per sample over a 2D grid of 64-wide workgroups; inputs
//! larger than the device's storage binding limit are split into batches, one dispatch each.

use bytemuck::cast_slice;
use crossbeam::channel::bounded;
use log::{debug, info};
use wgpu::{util::DeviceExt, wgt::PollType};

use crate::codec::{CipherSample, CodecTable};
use crate::constants::{GPU_MAX_GROUPS_PER_DIM, GPU_MISS_SENTINEL, GPU_WORKGROUP_SIZE};
use crate::transform::types::{check_lengths, TransformBackend, TransformError};
use crate::transform::worker_cpu::first_unknown;
use crate::utils::pack_bytes_le;

pub struct GpuTransformBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    encrypt_pipeline: wgpu::ComputePipeline,
    decrypt_pipeline: wgpu::ComputePipeline,
    /// Samples per dispatch; a multiple of 4 so packed byte words never straddle batches.
    batch_samples: usize,
    adapter_name: String,
}

impl GpuTransformBackend {
    /// Acquire the default adapter and compile both pipelines.
    ///
    /// Fails with `AcceleratorUnavailable` when no adapter or device can be obtained.
    pub fn new() -> Result<Self, TransformError> {
        pollster::block_on(Self::new_async())
    }

    pub async fn new_async() -> Result<Self, TransformError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| TransformError::AcceleratorUnavailable(format!("adapter request failed: {e:?}")))?;

        let info = adapter.get_info();
        let limits = adapter.limits();
        info!("[GPU] adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pixel-rsa-device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits.clone(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await
            .map_err(|e| TransformError::AcceleratorUnavailable(e.to_string()))?;

        let encrypt_pipeline = Self::pipeline(&device, "encrypt", include_str!("shaders/encrypt.wgsl"));
        let decrypt_pipeline = Self::pipeline(&device, "decrypt", include_str!("shaders/decrypt.wgsl"));

        let binding_limit = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
        let grid_limit = GPU_MAX_GROUPS_PER_DIM as u64 * GPU_MAX_GROUPS_PER_DIM as u64 * GPU_WORKGROUP_SIZE as u64;
        let batch_samples = ((binding_limit / 4).min(grid_limit) as usize) & !3;
        debug!("[GPU] batch size {} samples", batch_samples);

        Ok(Self {
            device,
            queue,
            encrypt_pipeline,
            decrypt_pipeline,
            batch_samples: batch_samples.max(4),
            adapter_name: info.name,
        })
    }

    fn pipeline(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ComputePipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(label),
            layout: None,
            module: &shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        })
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    pub fn batch_samples(&self) -> usize {
        self.batch_samples
    }

    fn storage(&self, label: &str, words: &[u32]) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: cast_slice(words),
            usage: wgpu::BufferUsages::STORAGE,
        })
    }

    /// Run `pipeline` over `count` samples with the given read-only bindings (starting at 1) and
    /// return the `count` output words.
    fn dispatch(
        &self,
        pipeline: &wgpu::ComputePipeline,
        inputs: &[&wgpu::Buffer],
        count: usize,
    ) -> Result<Vec<u32>, TransformError> {
        let groups = (count as u32).div_ceil(GPU_WORKGROUP_SIZE);
        let groups_x = groups.min(GPU_MAX_GROUPS_PER_DIM);
        let groups_y = groups.div_ceil(groups_x);
        let params: [u32; 4] = [count as u32, groups_x * GPU_WORKGROUP_SIZE, 0, 0];

        let params_buf = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("params"),
            contents: cast_slice(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let size = (count * 4) as u64;
        let output_buf = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("output"),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buf = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staging"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut entries = vec![wgpu::BindGroupEntry { binding: 0, resource: params_buf.as_entire_binding() }];
        for (i, buf) in inputs.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry { binding: i as u32 + 1, resource: buf.as_entire_binding() });
        }
        entries.push(wgpu::BindGroupEntry {
            binding: inputs.len() as u32 + 1,
            resource: output_buf.as_entire_binding(),
        });

        let layout = pipeline.get_bind_group_layout(0);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &layout,
            entries: &entries,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: None,
                timestamp_writes: None,
            });
            cpass.set_pipeline(pipeline);
            cpass.set_bind_group(0, &bind_group, &[]);
            cpass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        encoder.copy_buffer_to_buffer(&output_buf, 0, &staging_buf, 0, size);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging_buf.slice(..);
        let (tx, rx) = bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        self.device
            .poll(PollType::Wait { submission_index: None, timeout: None })
            .map_err(|e| TransformError::Gpu(format!("device poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| TransformError::Gpu("map callback dropped".into()))?
            .map_err(|e| TransformError::Gpu(format!("buffer map failed: {e:?}")))?;

        let data = slice.get_mapped_range();
        let words: Vec<u32> = data
            .chunks_exact(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        drop(data);
        staging_buf.unmap();
        Ok(words)
    }
}

impl TransformBackend for GpuTransformBackend {
    fn name(&self) -> &'static str {
        "accelerator"
    }

    fn encrypt(&self, table: &CodecTable, input: &[u8], out: &mut [CipherSample]) -> Result<(), TransformError> {
        check_lengths(input.len(), out.len())?;
        if input.is_empty() {
            return Ok(());
        }
        let table_buf = self.storage("encrypt-table", table.encrypt_entries());

        for (batch, dst) in input.chunks(self.batch_samples).zip(out.chunks_mut(self.batch_samples)) {
            let packed = pack_bytes_le(batch);
            let input_buf = self.storage("input", &packed);
            let words = self.dispatch(&self.encrypt_pipeline, &[&table_buf, &input_buf], batch.len())?;
            dst.copy_from_slice(&words);
        }
        Ok(())
    }

    fn decrypt(&self, table: &CodecTable, input: &[CipherSample], out: &mut [u8]) -> Result<(), TransformError> {
        check_lengths(input.len(), out.len())?;
        if input.is_empty() {
            return Ok(());
        }
        let (keys, values) = table.decrypt_columns();
        let keys_buf = self.storage("decrypt-keys", &keys);
        let values_buf = self.storage("decrypt-values", &values);

        for (batch, dst) in input.chunks(self.batch_samples).zip(out.chunks_mut(self.batch_samples)) {
            let input_buf = self.storage("input", batch);
            let words = self.dispatch(&self.decrypt_pipeline, &[&keys_buf, &values_buf, &input_buf], batch.len())?;
            for (o, w) in dst.iter_mut().zip(words) {
                if w == GPU_MISS_SENTINEL {
                    return Err(first_unknown(table, input)
                        .unwrap_or_else(|| TransformError::Gpu("lookup miss on a known ciphertext".into())));
                }
                *o = w as u8;
            }
        }
        Ok(())
    }
}
