//! Benchmarks for graph construction and analysis
//!
//! Uses layered declaration files where every package depends on a few
//! packages of the next layer, so load ordering and traversal touch every
//! node.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use loadorder::analysis::{find_all_cycles, load_order, traverse};
use loadorder::parser::parse_str;

/// Converts an index to an uppercase-letter package name (A, B, ..., Z, BA, BB, ...)
fn package_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        index /= 26;
        if index == 0 {
            break;
        }
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

/// Creates declaration text with `layers` layers of `width` packages each
fn create_layered_declarations(layers: usize, width: usize, fan_out: usize) -> String {
    let mut text = String::new();
    for layer in 0..layers.saturating_sub(1) {
        for i in 0..width {
            let package = package_name(layer * width + i);
            let deps: Vec<String> = (0..fan_out)
                .map(|k| package_name((layer + 1) * width + (i + k) % width))
                .collect();
            text.push_str(&format!("{}: {}\n", package, deps.join(", ")));
        }
    }
    text
}

/// Benchmark declaration parsing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for layers in [10, 50, 100] {
        let text = create_layered_declarations(layers, 20, 3);
        group.bench_with_input(BenchmarkId::from_parameter(layers), &text, |b, text| {
            b.iter(|| parse_str(black_box(text)))
        });
    }

    group.finish();
}

/// Benchmark Kahn's load ordering from the top-left package
fn bench_load_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_order");

    for layers in [10, 50, 100] {
        let graph = parse_str(&create_layered_declarations(layers, 20, 3));
        group.bench_with_input(BenchmarkId::from_parameter(layers), &graph, |b, graph| {
            b.iter(|| load_order(black_box(graph), "A"))
        });
    }

    group.finish();
}

/// Benchmark depth-bounded traversal at increasing depth bounds
fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");
    let graph = parse_str(&create_layered_declarations(30, 10, 2));

    for depth in [4, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| traverse(black_box(&graph), "A", depth))
        });
    }

    group.finish();
}

/// Benchmark whole-graph cycle enumeration on a ring of packages
fn bench_find_all_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_all_cycles");

    for size in [10, 50, 100] {
        let mut text = String::new();
        for i in 0..size {
            text.push_str(&format!("{}: {}\n", package_name(i), package_name((i + 1) % size)));
        }
        let graph = parse_str(&text);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| find_all_cycles(black_box(graph)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_load_order,
    bench_traverse,
    bench_find_all_cycles
);
criterion_main!(benches);
