use core::hash::Hasher;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use oa_hash::DeletionPolicy;
use oa_hash::HashTable;
use oa_hash::HashTableConfig;
use oa_hash::hash_fns::universal_hash;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use siphasher::sip::SipHasher;

fn sip_hash(key: &str, size: usize) -> usize {
    let mut hasher = SipHasher::new();
    hasher.write(key.as_bytes());
    (hasher.finish() % size as u64) as usize
}

#[derive(Clone, Copy)]
struct Variant {
    name: &'static str,
    double_hashing: bool,
    policy: DeletionPolicy,
}

const VARIANTS: &[Variant] = &[
    Variant {
        name: "linear_mark",
        double_hashing: false,
        policy: DeletionPolicy::Mark,
    },
    Variant {
        name: "linear_pack",
        double_hashing: false,
        policy: DeletionPolicy::Pack,
    },
    Variant {
        name: "double_mark",
        double_hashing: true,
        policy: DeletionPolicy::Mark,
    },
    Variant {
        name: "double_pack",
        double_hashing: true,
        policy: DeletionPolicy::Pack,
    },
];

impl Variant {
    fn table(self, capacity: usize) -> HashTable<u64> {
        let mut config = HashTableConfig::new(sip_hash)
            .initial_capacity(capacity)
            .max_load_factor(0.75)
            .deletion_policy(self.policy);
        if self.double_hashing {
            config = config.secondary_hash(universal_hash);
        }
        HashTable::new(config).unwrap()
    }
}

const SIZES: &[usize] = &[(1 << 8), (1 << 10), (1 << 12), (1 << 14)];

fn keys(n: usize, seed: u64) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| format!("key_{:016X}", rng.random::<u64>()))
        .collect()
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = keys(size, 0xA11CE);
        group.throughput(Throughput::Elements(size as u64));

        for variant in VARIANTS {
            group.bench_function(format!("{}/{size}", variant.name), |b| {
                b.iter_batched(
                    || variant.table(1),
                    |mut table| {
                        for (i, key) in keys.iter().enumerate() {
                            table.insert(key.as_str(), i as u64).unwrap();
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                HashbrownMap::<String, u64>::new,
                |mut map| {
                    for (i, key) in keys.iter().enumerate() {
                        map.insert(key.clone(), i as u64);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_hit_miss");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let present = keys(size, 0xB0B);
        let absent = keys(size, 0xC0FFEE);
        group.throughput(Throughput::Elements(2 * size as u64));

        for variant in VARIANTS {
            let mut table = variant.table(size);
            for (i, key) in present.iter().enumerate() {
                table.insert(key.as_str(), i as u64).unwrap();
            }

            group.bench_function(format!("{}/{size}", variant.name), |b| {
                b.iter(|| {
                    for key in &present {
                        black_box(table.find(key.as_str()).ok());
                    }
                    for key in &absent {
                        black_box(table.find(key.as_str()).ok());
                    }
                })
            });
        }
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    // Pack with double hashing re-places the whole table on every removal.
    for &size in &SIZES[..2] {
        let keys = keys(size, 0xD00D);
        group.throughput(Throughput::Elements(size as u64));

        for variant in VARIANTS {
            group.bench_function(format!("{}/{size}", variant.name), |b| {
                b.iter_batched(
                    || {
                        let mut table = variant.table(size);
                        for (i, key) in keys.iter().enumerate() {
                            table.insert(key.as_str(), i as u64).unwrap();
                        }
                        let mut order = keys.clone();
                        order.shuffle(&mut SmallRng::seed_from_u64(size as u64));
                        (table, order)
                    },
                    |(mut table, order)| {
                        for key in &order {
                            table.remove(key.as_str()).unwrap();
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    // Steady-state insert/remove cycles: tombstones pile up under Mark and
    // are absent under Pack.
    let size = 1 << 10;
    let keys = keys(2 * size, 0xFACE);
    group.throughput(Throughput::Elements(size as u64));

    for variant in VARIANTS {
        let mut table = variant.table(2 * size);
        for (i, key) in keys[..size].iter().enumerate() {
            table.insert(key.as_str(), i as u64).unwrap();
        }

        group.bench_function(variant.name, |b| {
            let mut offset = 0usize;
            b.iter(|| {
                for i in 0..size {
                    let out = &keys[(offset + i) % keys.len()];
                    let into = &keys[(offset + i + size) % keys.len()];
                    let _ = table.remove(out.as_str());
                    let _ = table.insert(into.as_str(), i as u64);
                }
                offset = (offset + size) % keys.len();
                black_box(table.stats().probes)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random,
    bench_find_hit_miss,
    bench_remove,
    bench_churn
);
criterion_main!(benches);
