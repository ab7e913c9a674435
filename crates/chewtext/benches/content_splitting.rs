//! Benchmark – splitting and normalizing large buffers
#![allow(missing_docs)]

use std::time::Duration;

use chewtext::{ParseOptions, TextBuffer, normalize, split_lines, split_paragraphs};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// A deterministic response-file-like text of exactly `target_len` bytes:
/// indented paths, comments, blank lines and CRLF endings.
fn make_text(target_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(target_len + 64);
    let mut n = 0usize;
    while out.len() < target_len {
        match n % 7 {
            0 => out.extend_from_slice(b"# generated section\r\n"),
            3 => out.extend_from_slice(b"\r\n"),
            _ => {
                out.extend_from_slice(b"  src/module_");
                out.extend_from_slice(n.to_string().as_bytes());
                out.extend_from_slice(b"/file.rs \r\n");
            }
        }
        n += 1;
    }
    out.truncate(target_len);
    out
}

/// Like [`make_text`], with every fourth line stored as NUL-terminated
/// UTF-16LE and a few stray high bytes mixed in.
fn make_mixed(target_len: usize) -> Vec<u8> {
    let text = make_text(target_len);
    let mut out = Vec::with_capacity(target_len * 2);
    for (i, line) in text.split(|&b| b == b'\n').enumerate() {
        if i % 4 == 1 {
            for unit in String::from_utf8_lossy(line).encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out.extend_from_slice(&[0, 0]);
        } else {
            out.extend_from_slice(line);
            if i % 9 == 0 {
                out.push(0x80);
            }
            out.push(b'\n');
        }
    }
    out.truncate(target_len);
    out
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_splitting");
    let options = ParseOptions::response_file();

    for &len in &[64 * 1024usize, 4 * 1024 * 1024] {
        let buffer = TextBuffer::from_bytes(&make_text(len)).unwrap();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("lines", len), &buffer, |b, buf| {
            b.iter(|| black_box(split_lines(black_box(buf), &options).len()));
        });
        group.bench_with_input(BenchmarkId::new("paragraphs", len), &buffer, |b, buf| {
            b.iter(|| black_box(split_paragraphs(black_box(buf), &options).len()));
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for &len in &[64 * 1024usize, 4 * 1024 * 1024] {
        for (name, input) in [("clean", make_text(len)), ("mixed", make_mixed(len))] {
            let source = TextBuffer::from_bytes(&input).unwrap();
            group.throughput(Throughput::Bytes(input.len() as u64));
            group.bench_with_input(BenchmarkId::new(name, len), &source, |b, src| {
                b.iter_batched_ref(
                    || src.clone(),
                    |buf| black_box(normalize(buf)),
                    criterion::BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_split, bench_normalize }
criterion_main!(benches);
