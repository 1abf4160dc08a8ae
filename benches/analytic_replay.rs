// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Analytic replay benchmark
//!
//! Run with: cargo bench --bench analytic_replay
//!
//! Measures a full prepare + emission cycle over 10K in-memory rows:
//! 1. One ordered group (ROW_NUMBER, RANK, LAG) over a partitioned comparator
//! 2. One unordered group (SUM, fraction of total)
//! 3. Unordered streaming functions only (no index, no replay)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use rowreplay::{
    row, AnalyticConfig, AnalyticFunction, AnalyticRecordSource, CancellationHandle,
    ColumnComparator, ColumnMetadata, DataType, FractionOfTotalFunction, LagFunction,
    MemoryRecordSource, PartitionBy, RankFunction, Record, RecordComparator, RecordCursor,
    RecordMetadata, Row, RowNumberFunction, RunningRowNumberFunction, RunningSumFunction,
    SumFunction,
};

const ROW_COUNT: usize = 10_000;
const PARTITIONS: i64 = 16;

fn rows() -> Vec<Row> {
    (0..ROW_COUNT as i64)
        .map(|i| row![i, (i * 7919) % 1000, format!("p{}", i % PARTITIONS)])
        .collect()
}

fn source(rows: &[Row]) -> MemoryRecordSource {
    let metadata = RecordMetadata::new(vec![
        ColumnMetadata::not_null("id", DataType::Integer),
        ColumnMetadata::new("val", DataType::Integer),
        ColumnMetadata::new("part", DataType::Text),
    ]);
    MemoryRecordSource::new(metadata, rows.to_vec())
}

fn ordered_group() -> (Option<Box<dyn RecordComparator>>, Vec<Box<dyn AnalyticFunction>>) {
    let part = PartitionBy::new(&[2]);
    (
        Some(Box::new(ColumnComparator::ascending(&[2, 1]))),
        vec![
            Box::new(RowNumberFunction::new("rn", part.clone())),
            Box::new(RankFunction::new("rnk", part.clone(), PartitionBy::new(&[1]))),
            Box::new(LagFunction::new("prev", 1, DataType::Integer, part)),
        ],
    )
}

fn unordered_group() -> (Option<Box<dyn RecordComparator>>, Vec<Box<dyn AnalyticFunction>>) {
    (
        None,
        vec![
            Box::new(SumFunction::new(
                "sum",
                1,
                DataType::Integer,
                PartitionBy::new(&[2]),
            )),
            Box::new(FractionOfTotalFunction::new("share", 1, PartitionBy::none())),
        ],
    )
}

fn streaming_group() -> (Option<Box<dyn RecordComparator>>, Vec<Box<dyn AnalyticFunction>>) {
    (
        None,
        vec![
            Box::new(RunningRowNumberFunction::new("rrn", PartitionBy::new(&[2]))),
            Box::new(RunningSumFunction::new(
                "rsum",
                1,
                DataType::Integer,
                PartitionBy::none(),
            )),
        ],
    )
}

fn run(
    config: &AnalyticConfig,
    rows: &[Row],
    groups: Vec<(Option<Box<dyn RecordComparator>>, Vec<Box<dyn AnalyticFunction>>)>,
) -> i64 {
    let (comparators, functions) = groups.into_iter().unzip();
    let mut src =
        AnalyticRecordSource::new(config.clone(), Box::new(source(rows)), comparators, functions)
            .unwrap();
    src.prepare_cursor(&CancellationHandle::new()).unwrap();

    let last = src.metadata().column_count() - 1;
    let mut checksum = 0i64;
    while src.has_next().unwrap() {
        checksum += src.next().get(last).and_then(|v| v.as_int64()).unwrap_or(0);
    }
    src.close().unwrap();
    checksum
}

fn bench_replay(c: &mut Criterion) {
    let rows = rows();
    let mut group = c.benchmark_group("analytic_replay");

    for (name, config) in [
        ("default_pages", AnalyticConfig::default()),
        ("small_pages", AnalyticConfig::small()),
    ] {
        group.bench_with_input(BenchmarkId::new("ordered", name), &config, |b, config| {
            b.iter(|| black_box(run(config, &rows, vec![ordered_group()])))
        });
    }

    group.bench_function("ordered_and_unordered", |b| {
        b.iter(|| {
            black_box(run(
                &AnalyticConfig::default(),
                &rows,
                vec![ordered_group(), unordered_group()],
            ))
        })
    });

    group.bench_function("streaming_only", |b| {
        b.iter(|| black_box(run(&AnalyticConfig::default(), &rows, vec![streaming_group()])))
    });

    group.finish();
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
