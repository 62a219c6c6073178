//! Performance benchmarks for best-fit lookup and the fallback buffer protocol.
//!
//! Tables are synthetic: one pair every few code units across the BMP, sized
//! like real single-byte (~1,000 pairs) and double-byte (~10,000 pairs)
//! best-fit tables.

use bestfit::{BestFitBuffer, BestFitPair, FallbackBuffer, MappingTable};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn synthetic_table(pairs: usize) -> MappingTable {
    let step = (0xD000 / pairs).max(1) as u16;
    MappingTable::from_pairs(
        (0..pairs as u16)
            .map(|i| BestFitPair::new(0x00A0 + i * step, char::from(b'A' + (i % 26) as u8)))
            .collect(),
    )
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for pairs in [16usize, 1_000, 10_000] {
        let table = synthetic_table(pairs);
        let keys: Vec<u16> = (0x00A0..0xD000).step_by(37).collect();
        group.bench_with_input(BenchmarkId::from_parameter(pairs), &table, |b, table| {
            b.iter(|| {
                let mut hits = 0usize;
                for &key in &keys {
                    if table.lookup(black_box(key)).is_some() {
                        hits += 1;
                    }
                }
                hits
            });
        });
    }
    group.finish();
}

fn bench_buffer(c: &mut Criterion) {
    let table = synthetic_table(1_000);
    let units: Vec<u16> = (0x00A0..0x2000).collect();

    c.bench_function("buffer_single_fallback", |b| {
        b.iter(|| {
            let mut buffer = BestFitBuffer::new(&table);
            let mut out = 0u32;
            for &unit in &units {
                buffer.fallback(black_box(unit));
                while let Some(ch) = buffer.next_char() {
                    out = out.wrapping_add(u32::from(ch));
                }
            }
            out
        });
    });

    c.bench_function("buffer_surrogate_pair", |b| {
        b.iter(|| {
            let mut buffer = BestFitBuffer::new(&table);
            let mut out = 0usize;
            for low in 0xDC00..0xDE00u16 {
                buffer
                    .fallback_pair(black_box(0xD83D), black_box(low))
                    .expect("valid pair");
                while buffer.next_char().is_some() {
                    out += 1;
                }
            }
            out
        });
    });
}

criterion_group!(benches, bench_lookup, bench_buffer);
criterion_main!(benches);
