use brc_processor::models::{Chunk, StationMap};
use brc_processor::processors::{Aggregator, ParallelProcessor};
use brc_processor::readers::{parse_tenths, ChunkReader, LineAccumulator, ParseMode};
use brc_processor::writers::format_report;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

// Create test data for benchmarking
fn create_measurements(station_count: usize, rows: usize) -> String {
    let mut content = String::with_capacity(rows * 16);
    for i in 0..rows {
        let station = i % station_count;
        let tenths = (i * 7919 % 1999) as i64 - 999;
        let sign = if tenths < 0 { "-" } else { "" };
        let abs = tenths.abs();
        content.push_str(&format!(
            "Test Station {};{}{}.{}\n",
            station,
            sign,
            abs / 10,
            abs % 10
        ));
    }
    content
}

fn benchmark_parse_tenths(c: &mut Criterion) {
    let fields: [&[u8]; 4] = [b"12.3", b"-4.5", b"99.9", b"-0.1"];

    c.bench_function("parse_tenths", |b| {
        b.iter(|| {
            let mut total = 0i64;
            for field in &fields {
                total += parse_tenths(black_box(field)) as i64;
            }
            black_box(total)
        })
    });
}

fn benchmark_line_accumulator(c: &mut Criterion) {
    let data = create_measurements(400, 50_000);

    c.bench_function("line_accumulator", |b| {
        b.iter(|| {
            let mut stats = StationMap::default();
            let mut acc = LineAccumulator::new(ParseMode::Lenient);
            acc.feed(black_box(data.as_bytes()), &mut stats).unwrap();
            acc.finish(&mut stats).unwrap();
            black_box(stats.len())
        })
    });
}

fn benchmark_aggregator(c: &mut Criterion) {
    let data = create_measurements(400, 50_000);
    let len = data.len() as u64;
    let reader = ChunkReader::new();
    let locals: Vec<StationMap> = (0..8)
        .map(|_| {
            reader
                .read_chunk_buffered(Cursor::new(data.as_bytes()), Chunk::new(0, len))
                .unwrap()
        })
        .collect();

    c.bench_function("aggregator_merge_8", |b| {
        b.iter(|| black_box(Aggregator::merge_all(locals.clone()).len()))
    });

    let global = Aggregator::merge_all(locals);
    c.bench_function("format_report", |b| {
        b.iter(|| black_box(format_report(&global).len()))
    });
}

fn benchmark_worker_counts(c: &mut Criterion) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(create_measurements(1_000, 200_000).as_bytes())
        .unwrap();

    let mut group = c.benchmark_group("process_file");
    group.sample_size(10);
    for workers in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &w| {
            let processor = ParallelProcessor::new(w);
            b.iter(|| black_box(processor.process_file(file.path(), None).unwrap().len()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_tenths,
    benchmark_line_accumulator,
    benchmark_aggregator,
    benchmark_worker_counts
);
criterion_main!(benches);
