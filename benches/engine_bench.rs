//! Benchmarks for StrataKV engine operations

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use stratakv::loadgen::LoadData;
use stratakv::{Config, Engine};
use tempfile::TempDir;

const NUM_OPS: usize = 10_000;
const KEY_LEN: usize = 16;
const VALUE_LEN: usize = 64;

fn fresh_engine() -> (TempDir, Engine) {
    let temp = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp.path()).build();
    let engine = Engine::open(config).unwrap();
    (temp, engine)
}

fn write_throughput(c: &mut Criterion) {
    let data = LoadData::generate(0, NUM_OPS, KEY_LEN, VALUE_LEN);

    c.bench_function("engine_set_10k", |b| {
        b.iter_batched(
            fresh_engine,
            |(_temp, mut engine)| {
                for i in 0..NUM_OPS {
                    engine
                        .set(data.keys[i].clone(), data.values[i].clone())
                        .unwrap();
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn read_throughput(c: &mut Criterion) {
    let data = LoadData::generate(NUM_OPS, NUM_OPS, KEY_LEN, VALUE_LEN);

    // Pre-load and flush so reads exercise the SSTable path too
    let (_temp, mut engine) = fresh_engine();
    for i in 0..NUM_OPS {
        engine
            .set(data.keys[i].clone(), data.values[i].clone())
            .unwrap();
    }
    engine.flush().unwrap();

    c.bench_function("engine_get_10k", |b| {
        b.iter(|| {
            for key in &data.keys {
                std::hint::black_box(engine.get(key));
            }
        })
    });
}

fn mixed_workload(c: &mut Criterion) {
    let data = LoadData::generate(NUM_OPS, NUM_OPS, KEY_LEN, VALUE_LEN);

    c.bench_function("engine_mixed_10k", |b| {
        b.iter_batched(
            fresh_engine,
            |(_temp, mut engine)| {
                for i in 0..NUM_OPS {
                    if i % 2 == 0 {
                        engine
                            .set(data.keys[i].clone(), data.values[i].clone())
                            .unwrap();
                    } else {
                        std::hint::black_box(engine.get(&data.keys[i - 1]));
                    }
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, write_throughput, read_throughput, mixed_workload);
criterion_main!(benches);
