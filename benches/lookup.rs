#![allow(dead_code)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use sizecache::{LayoutCache, SizeCache, TypeDescriptor, ValueType};

#[derive(ValueType, Clone, Copy)]
struct Record {
    id: u64,
    #[marshal(ByValTStr { len: 32 })]
    name: [u8; 32],
    flags: u32,
}

#[derive(ValueType, Clone, Copy)]
struct Nested {
    records: [Record; 4],
    count: u16,
}

/// Lookups of already-resolved types, which should never reach the resolver.
fn bench_cached_lookup(c: &mut Criterion) {
    SizeCache::<Nested>::size();

    let mut group = c.benchmark_group("cached");
    group.bench_function("size", |b| b.iter(|| black_box(SizeCache::<Nested>::size())));
    group.bench_function("requires_marshal", |b| {
        b.iter(|| black_box(SizeCache::<Nested>::requires_marshal()))
    });
    group.bench_function("primitive", |b| b.iter(|| black_box(SizeCache::<u32>::size())));
    group.finish();
}

/// Full resolution of a nested type in a fresh cache each iteration.
fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_nested", |b| {
        b.iter(|| {
            let cache = LayoutCache::new();
            black_box(cache.entry_for(black_box(TypeDescriptor::of::<Nested>())))
        })
    });
}

criterion_group!(benches, bench_cached_lookup, bench_resolve);
criterion_main!(benches);
