use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pixel_rsa_core::codec::{build_table, Direction};
use pixel_rsa_core::keys::KeyPair;
use pixel_rsa_core::pixel::PixelBuffer;
use pixel_rsa_core::transform::{HybridParallelismProfile, Strategy, TransformEngine};

fn transform_throughput(c: &mut Criterion) {
    let table = build_table(&KeyPair::from_primes(241, 239).unwrap()).unwrap();
    // 1024x1024 RGB
    let samples: Vec<u8> = (0..1024 * 1024 * 3).map(|i| (i * 31 % 251) as u8).collect();
    let plain = PixelBuffer::plain(1024, 1024, 3, samples);
    let profile = HybridParallelismProfile::new(num_cpus::get(), 1, 1);

    let mut group = c.benchmark_group("encrypt_1mp_rgb");
    group.throughput(Throughput::Elements(plain.len() as u64));

    let strategies = [
        Strategy::Sequential,
        Strategy::Threaded(2),
        Strategy::Threaded(num_cpus::get()),
        Strategy::Accelerator,
    ];
    for strategy in strategies {
        let engine = TransformEngine::new(&strategy, &profile).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(strategy), &plain, |b, plain| {
            b.iter(|| engine.apply(black_box(plain), &table, Direction::Encrypt).unwrap())
        });
    }
    group.finish();

    let engine = TransformEngine::new(&Strategy::Threaded(num_cpus::get()), &profile).unwrap();
    let cipher = engine.apply(&plain, &table, Direction::Encrypt).unwrap();
    c.bench_function("decrypt_1mp_rgb_threaded", |b| {
        b.iter(|| engine.apply(black_box(&cipher), &table, Direction::Decrypt).unwrap())
    });
}

criterion_group!(benches, transform_throughput);
criterion_main!(benches);
