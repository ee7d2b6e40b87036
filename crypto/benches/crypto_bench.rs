use ballot_crypto::FingerprintInput;
use ballot_types::{BlockHash, Timestamp};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| ballot_crypto::blake2b_256(black_box(&data)))
    });
}

fn blake2b_multi_bench(c: &mut Criterion) {
    let parts: Vec<&[u8]> = vec![&[1u8; 32], &[2u8; 64], &[3u8; 128]];

    c.bench_function("blake2b_256_multi_3parts", |b| {
        b.iter(|| ballot_crypto::blake2b_256_multi(black_box(&parts)))
    });
}

fn fingerprint_bench(c: &mut Criterion) {
    let payload = vec![0x42u8; 96];
    let previous = BlockHash::new([0x11; 32]);

    c.bench_function("fingerprint_vote_block", |b| {
        b.iter(|| {
            ballot_crypto::fingerprint(black_box(FingerprintInput {
                index: 1_000,
                timestamp: Timestamp::new(1_700_000_000),
                payload: &payload,
                previous_hash: &previous,
            }))
        })
    });
}

criterion_group!(
    benches,
    blake2b_256_bench,
    blake2b_multi_bench,
    fingerprint_bench
);
criterion_main!(benches);
