use criterion::{criterion_group, criterion_main, Criterion};
use portprobe::port_spec::parse;
use std::hint::black_box;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse single port", |b| b.iter(|| parse(black_box("8080"))));
    c.bench_function("parse range", |b| b.iter(|| parse(black_box("1-65535"))));
    c.bench_function("parse and expand full range", |b| {
        b.iter(|| parse(black_box("65535,0")).map(|ports| ports.iter().count()));
    });
    c.bench_function("reject malformed", |b| b.iter(|| parse(black_box("1-2-3"))));
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
