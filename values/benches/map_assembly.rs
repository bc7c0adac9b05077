//! Benchmarks for map assembly and lookup
//!
//! Run with: `cargo bench --bench map_assembly`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use datamodel_core::{Node, NodeAssembler, NodeBuilder, NodeRef};
use datamodel_values::{AnyBuilder, MapBuilder, MapStyle};

fn keys(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("key{i}")).collect()
}

fn assemble(b: &mut dyn NodeBuilder, keys: &[String], size_hint: usize) -> NodeRef {
    let ma = b.begin_map(size_hint).unwrap();
    for (i, key) in keys.iter().enumerate() {
        ma.assemble_entry(key).unwrap().assign_int(i as i64).unwrap();
    }
    ma.finish().unwrap();
    b.build().unwrap()
}

fn bench_size_hint(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_size_hint");

    for size in [8, 64, 1024] {
        let keys = keys(size);

        group.bench_with_input(BenchmarkId::new("exact", size), &keys, |b, keys| {
            let mut builder = MapBuilder::new(MapStyle::default());
            b.iter(|| {
                builder.reset();
                black_box(assemble(&mut builder, keys, keys.len()));
            });
        });

        group.bench_with_input(BenchmarkId::new("zero", size), &keys, |b, keys| {
            let mut builder = MapBuilder::new(MapStyle::default());
            b.iter(|| {
                builder.reset();
                black_box(assemble(&mut builder, keys, 0));
            });
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let keys = keys(16);
    c.bench_function("assemble_nested_any", |b| {
        let mut builder = AnyBuilder::new();
        b.iter(|| {
            builder.reset();
            let ma = builder.begin_map(keys.len()).unwrap();
            for key in &keys {
                let inner = ma.assemble_entry(key).unwrap().begin_map(2).unwrap();
                inner.assemble_entry("a").unwrap().assign_bool(true).unwrap();
                inner.assemble_entry("b").unwrap().assign_string(key).unwrap();
                inner.finish().unwrap();
            }
            ma.finish().unwrap();
            black_box(builder.build().unwrap());
        });
    });
}

fn bench_lookup(c: &mut Criterion) {
    let keys = keys(1024);
    let map = assemble(&mut MapBuilder::new(MapStyle::default()), &keys, keys.len());

    c.bench_function("lookup_string_1024", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(map.lookup_string(key).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_size_hint, bench_nested, bench_lookup);
criterion_main!(benches);
