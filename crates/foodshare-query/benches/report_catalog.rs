// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use criterion::{criterion_group, criterion_main, Criterion};
use foodshare_core::StoreConfig;
use foodshare_ingest::{seed_directory, LoadMode};
use foodshare_query::{run_report, QueryRunner, ReportKind};

fn seeded_runner(dir: &tempfile::TempDir) -> QueryRunner {
    let cfg = StoreConfig::new(dir.path().join("bench.db"));
    let seed =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../foodshare-ingest/tests/fixtures/seed");
    seed_directory(&cfg, &seed, LoadMode::Append).expect("seed");
    QueryRunner::new(cfg)
}

fn bench_reports(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tmp");
    let runner = seeded_runner(&dir);
    let mut group = c.benchmark_group("report_catalog");
    for kind in ReportKind::ALL {
        let city = kind.takes_city().then_some("New Jessica");
        group.bench_function(kind.id(), |b| {
            b.iter(|| run_report(&runner, kind, city).expect("report"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reports);
criterion_main!(benches);
