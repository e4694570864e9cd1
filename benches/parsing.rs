use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vi_numeric::{FieldValue, NumberStyle};

const INPUTS: [&str; 6] = ["5,50%", "1.234,5", "55", "15.000.000", " -12,5 % ", "abc"];

fn bench_parse(c: &mut Criterion) {
    let style = NumberStyle::default();
    c.bench_function("parse_field_text", |b| {
        b.iter(|| {
            for input in INPUTS {
                black_box(style.parse(black_box(input)));
            }
        });
    });
}

fn bench_format(c: &mut Criterion) {
    let style = NumberStyle::default();
    let values = [0.055, 1234.5, 15_000_000.0, -0.125, 12.345_678_9];
    c.bench_function("format_field_value", |b| {
        b.iter(|| {
            for value in values {
                black_box(style.format(FieldValue::Set(black_box(value))));
            }
        });
    });
}

criterion_group!(benches, bench_parse, bench_format);
criterion_main!(benches);
