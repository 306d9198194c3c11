// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use cascara_compile::{CompileOptions, compile, compile_global};
use cascara_runtime::{MemoryHost, StyleRegistry};

/// Synthesize a component-sized fragment with `n` distinct declarations and a
/// sprinkling of pseudo and media blocks.
fn gen_fragment(n: usize) -> String {
    let mut css = String::with_capacity(n * 32);
    for i in 0..n {
        css.push_str(&format!("padding-{}: {}px;", side(i), i % 64));
        if i % 7 == 0 {
            css.push_str(&format!(":hover {{ color: #{:06x} }}", i * 1024));
        }
        if i % 13 == 0 {
            css.push_str(&format!(
                "@media (min-width: {}px) {{ color: #{:06x} }}",
                400 + i,
                i * 512
            ));
        }
    }
    css
}

fn side(i: usize) -> &'static str {
    ["top", "right", "bottom", "left"][i % 4]
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for n in [16_usize, 128, 512] {
        let css = gen_fragment(n);
        group.throughput(Throughput::Bytes(css.len() as u64));
        group.bench_function(format!("atomic/{n}"), |b| {
            b.iter(|| compile(black_box(&css), &CompileOptions::default()).unwrap());
        });
        group.bench_function(format!("atomic_optimized/{n}"), |b| {
            let options = CompileOptions {
                optimize_css: true,
                sort_at_rules: true,
                sort_shorthand: true,
                ..Default::default()
            };
            b.iter(|| compile(black_box(&css), &options).unwrap());
        });
        group.bench_function(format!("global/{n}"), |b| {
            b.iter(|| compile_global(black_box(&css), &CompileOptions::default()).unwrap());
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let css = gen_fragment(256);
    let out = compile(&css, &CompileOptions::default()).unwrap();

    let mut group = c.benchmark_group("apply_sheet");
    group.throughput(Throughput::Elements(out.sheets.len() as u64));
    group.bench_function("cold_registry", |b| {
        b.iter_batched(
            || StyleRegistry::new(MemoryHost::new()),
            |mut registry| {
                for sheet in &out.sheets {
                    registry.apply_sheet(black_box(sheet));
                }
                registry
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("idempotent_reapply", |b| {
        let mut registry = StyleRegistry::new(MemoryHost::new());
        for sheet in &out.sheets {
            registry.apply_sheet(sheet);
        }
        b.iter(|| {
            for sheet in &out.sheets {
                registry.apply_sheet(black_box(sheet));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_compile, bench_apply);
criterion_main!(benches);
