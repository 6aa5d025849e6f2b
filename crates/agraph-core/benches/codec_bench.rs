use std::hint::black_box;

use agraph_core::agtype::{alter_property, compare_encoded, encode, from_text, hash_encoded};
use agraph_core::{Agtype, Value, decode};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

const PAIRS: usize = 256;

fn wide_object() -> Value {
    let pairs = (0..PAIRS).map(|i| {
        let value = match i % 4 {
            0 => Value::from(i as i64),
            1 => Value::from(format!("value-{i}")),
            2 => Value::from(i as f64 / 3.0),
            _ => Value::array([Value::from(true), Value::Null, Value::from(i as i64)]),
        };
        (format!("key{i}"), value)
    });
    Value::object(pairs).expect("unique keys")
}

fn codec(c: &mut Criterion) {
    let value = wide_object();
    let encoded = encode(&value).expect("encode");
    let text = encoded.to_text(false).expect("to_text");

    let mut group = c.benchmark_group("agtype/codec");
    group.throughput(Throughput::Elements(PAIRS as u64));
    group.bench_function("encode", |b| b.iter(|| black_box(encode(&value))));
    group.bench_function("decode", |b| b.iter(|| black_box(decode(&encoded))));
    group.bench_function("to_text", |b| b.iter(|| black_box(encoded.to_text(false))));
    group.bench_function("from_text", |b| b.iter(|| black_box(from_text(&text))));
    group.finish();
}

fn access(c: &mut Criterion) {
    let encoded = encode(&wide_object()).expect("encode");
    let other: Agtype = encode(&wide_object()).expect("encode");
    let replacement = encode(&Value::from(7)).expect("encode");

    let mut group = c.benchmark_group("agtype/access");
    group.bench_function("find_key", |b| b.iter(|| black_box(encoded.find_key("key200"))));
    group.bench_function("hash_encoded", |b| b.iter(|| black_box(hash_encoded(&encoded))));
    group.bench_function("compare_encoded", |b| {
        b.iter(|| black_box(compare_encoded(&encoded, &other)));
    });
    group.bench_function("alter_property", |b| {
        b.iter(|| black_box(alter_property(&encoded, "key17", Some(&replacement), false)));
    });
    group.finish();
}

criterion_group!(benches, codec, access);
criterion_main!(benches);
