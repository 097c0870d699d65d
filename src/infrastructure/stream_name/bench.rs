use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

// Reference the main crate
extern crate msitable;

use msitable::infrastructure::stream_name::{encode_name, MIME_ALPHABET};

// Generate a random table name of the given length from the folding alphabet
fn generate_table_name(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| MIME_ALPHABET[rng.gen_range(0..MIME_ALPHABET.len())] as char)
        .collect()
}

// Names with a separator every few chars, which breaks folding
fn generate_broken_name(length: usize) -> String {
    generate_table_name(length)
        .chars()
        .enumerate()
        .map(|(i, c)| if i % 4 == 3 { ' ' } else { c })
        .collect()
}

pub fn bench_encode(c: &mut Criterion) {
    let short = generate_table_name(8);
    let long = generate_table_name(56);
    let broken = generate_broken_name(24);

    let mut group = c.benchmark_group("EncodeName");

    group.bench_function("short_table", |b| {
        b.iter(|| encode_name(true, black_box(&short)))
    });
    group.bench_function("long_table", |b| {
        b.iter(|| encode_name(true, black_box(&long)))
    });
    group.bench_function("broken_fold", |b| {
        b.iter(|| encode_name(false, black_box(&broken)))
    });

    group.finish();
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
