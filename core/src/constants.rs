/// Default sieve bound for prime generation.
pub const DEFAULT_PRIME_BOUND: usize = 250;

/// Upper sieve bound. Every product of two primes below it fits in `u32`.
pub const MAX_PRIME_BOUND: usize = 65_536;

/// Number of distinct plaintext sample values.
pub const BYTE_DOMAIN: usize = 256;

/// Smallest modulus that keeps all 256 byte values distinguishable.
pub const MIN_MODULUS: u64 = BYTE_DOMAIN as u64;

/// Default prefix for encrypted outputs.
pub const DEFAULT_OUTPUT_PREFIX: &str = "RSA_";

/// Prefix for images written by the verify pass.
pub const DECRYPTED_OUTPUT_PREFIX: &str = "DEC_";

/// Extension appended to the lossless ciphertext container.
pub const CONTAINER_EXTENSION: &str = "rsai";

/// Container magic: "RSAI" = RSA Image v1
pub const MAGIC_RSAI: [u8; 4] = *b"RSAI";
pub const CONTAINER_V1: u16 = 1;

/// Minimum slice handed to one threaded worker (samples).
pub const MIN_THREAD_CHUNK: usize = 16 * 1024;

/// Sample count at or above which `Auto` prefers the accelerator.
pub const DEFAULT_GPU_THRESHOLD: usize = 4 * 1024 * 1024;

/// Buffers one accelerator may hold at once before `Auto` routes large buffers to the CPU.
pub const GPU_QUEUE_DEPTH: usize = 1;

/// Compute shader workgroup size; must match `@workgroup_size` in the WGSL sources.
pub const GPU_WORKGROUP_SIZE: u32 = 64;

/// Max workgroups per dispatch dimension (WebGPU default limit).
pub const GPU_MAX_GROUPS_PER_DIM: u32 = 65_535;

/// Ciphertext value the decrypt shader writes when a lookup misses.
pub const GPU_MISS_SENTINEL: u32 = u32::MAX;

/// Bounds for the batch in-flight queue.
pub const DEFAULT_INFLIGHT_CAP: usize = 64;
pub const DEFAULT_MEM_FRACTION: f64 = 0.50;

/// Working-set estimate per in-flight image (plain + widened cipher + preview), for sizing the
/// batch queue against free memory.
pub const INFLIGHT_IMAGE_BYTES: u64 = 96 * 1024 * 1024;
