//! Per-variant read benchmarks over an in-memory stream.

use std::ffi::c_char;
use std::io::{Cursor, sink};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linebound_abi::{ask_name_in, ask_name_malloc_in, free_name_in};
use linebound_core::Session;
use linebound_membrane::{AllocationRegistry, SafetyLevel};

const LINES: usize = 1000;

fn input(line_len: usize) -> Vec<u8> {
    let mut line = vec![b'a'; line_len];
    line.push(b'\n');
    line.repeat(LINES)
}

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_1000_lines");

    for &line_len in &[8usize, 64, 512] {
        let data = input(line_len);

        group.bench_with_input(BenchmarkId::new("caller_owned", line_len), &data, |b, data| {
            b.iter(|| {
                let mut session = Session::new(Cursor::new(data.as_slice()), sink());
                let mut buf = [0u8; 100];
                for _ in 0..LINES {
                    criterion::black_box(session.read_line_into(&mut buf).ok());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("owned", line_len), &data, |b, data| {
            b.iter(|| {
                let mut session = Session::new(Cursor::new(data.as_slice()), sink());
                for _ in 0..LINES {
                    criterion::black_box(session.read_line_alloc(100));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("managed", line_len), &data, |b, data| {
            b.iter(|| {
                let mut session = Session::new(Cursor::new(data.as_slice()), sink());
                for _ in 0..LINES {
                    criterion::black_box(session.read_line_managed());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("abi_stack", line_len), &data, |b, data| {
            b.iter(|| {
                let mut session = Session::new(Cursor::new(data.as_slice()), sink());
                let mut diag = sink();
                let mut name = [0 as c_char; 100];
                for _ in 0..LINES {
                    let ok = unsafe { ask_name_in(&mut session, &mut diag, name.as_mut_ptr(), 100) };
                    criterion::black_box(ok);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("abi_malloc_free", line_len), &data, |b, data| {
            let registry = AllocationRegistry::new();
            b.iter(|| {
                let mut session = Session::new(Cursor::new(data.as_slice()), sink());
                let mut diag = sink();
                for _ in 0..LINES {
                    let p = ask_name_malloc_in(&mut session, &registry, &mut diag, 100);
                    unsafe { free_name_in(&registry, SafetyLevel::Strict, &mut diag, p) };
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_variants);
criterion_main!(benches);
