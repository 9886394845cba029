use bytestage::convert::hex;
use bytestage::{
    ByteFilter, ChunkedConversion, FilterTable, Interceptor, IoSink,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

fn generate_random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

fn filter_benchmark(c: &mut Criterion) {
    let input = generate_random_data(65536);
    let mut group = c.benchmark_group("filter");

    group.bench_function("direct_predicate", |b| {
        let mut filter = ByteFilter::new(|byte: u8| byte.is_ascii_graphic());
        let mut buf = input.clone();
        b.iter(|| {
            buf.copy_from_slice(&input);
            let mut sink = IoSink::new(std::io::sink());
            black_box(filter.intercept_write(&mut sink, &mut buf).count)
        });
    });

    group.bench_function("compiled_table", |b| {
        let mut filter = ByteFilter::new(FilterTable::ascii_graphic());
        let mut buf = input.clone();
        b.iter(|| {
            buf.copy_from_slice(&input);
            let mut sink = IoSink::new(std::io::sink());
            black_box(filter.intercept_write(&mut sink, &mut buf).count)
        });
    });

    group.finish();
}

fn hex_benchmark(c: &mut Criterion) {
    let inputs = [("hex_small", 1024), ("hex_large", 1048576)];

    for (name, size) in inputs.iter() {
        let input = generate_random_data(*size);
        let mut group = c.benchmark_group(name.to_string());

        group.bench_function("encode", |b| {
            let mut engine = ChunkedConversion::new(hex::Encoder);
            let mut buf = input.clone();
            b.iter(|| {
                let mut sink = IoSink::new(std::io::sink());
                black_box(engine.intercept_write(&mut sink, &mut buf).count)
            });
        });

        group.finish();
    }
}

criterion_group!(benches, filter_benchmark, hex_benchmark);
criterion_main!(benches);
