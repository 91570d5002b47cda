use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qr_reader::{Decoder, DecoderConfig};

mod common;

fn bench_decode_blank(c: &mut Criterion) {
    let pixels = vec![128u8; 640 * 480];
    c.bench_function("decode_640x480_blank", |b| {
        b.iter(|| qr_reader::decode(black_box(640), black_box(480), black_box(&pixels)))
    });
}

fn bench_decode_single(c: &mut Criterion) {
    let image = common::scene(320, 240, 1, 4);
    let decoder = Decoder::default();
    c.bench_function("decode_320x240_one_symbol", |b| {
        b.iter(|| decoder.decode(black_box(&image)))
    });
}

fn bench_decode_many(c: &mut Criterion) {
    let image = common::scene(1920, 1080, 8, 5);
    let sequential = Decoder::default();
    let parallel = Decoder::new(DecoderConfig {
        parallel_candidates: true,
        ..DecoderConfig::default()
    });

    let mut group = c.benchmark_group("decode_1920x1080_many_symbols");
    group.sample_size(20);
    group.bench_function("sequential", |b| {
        b.iter(|| sequential.decode(black_box(&image)))
    });
    group.bench_function("parallel_candidates", |b| {
        b.iter(|| parallel.decode(black_box(&image)))
    });
    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let image = common::scene(1920, 1080, 8, 5);
    let decoder = Decoder::default();
    c.bench_function("locate_1920x1080", |b| {
        b.iter(|| decoder.locate(black_box(&image)))
    });
}

fn bench_decode_batch(c: &mut Criterion) {
    let images: Vec<_> = (1..=8).map(|n| common::scene(640, 480, n % 3 + 1, 3)).collect();
    let decoder = Decoder::default();
    c.bench_function("decode_batch_8x640x480", |b| {
        b.iter(|| decoder.decode_batch(black_box(&images)))
    });
}

criterion_group!(
    benches,
    bench_decode_blank,
    bench_decode_single,
    bench_decode_many,
    bench_locate,
    bench_decode_batch
);
criterion_main!(benches);
