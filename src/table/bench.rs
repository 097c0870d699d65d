use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

// Reference the main crate
extern crate msitable;

use msitable::table::row::{fetch_cell, ColumnMajorBuilder};
use msitable::table::{ColumnInfo, Table};
use msitable::table::column::layout_columns;
use msitable::types::ColumnType;

// Column layout of a typical component table: key, string, int16, int32
fn bench_columns() -> (Vec<ColumnInfo>, usize) {
    let mut columns = vec![
        ColumnInfo::new("Bench", 1, "Key", ColumnType::string(72).key()),
        ColumnInfo::new("Bench", 2, "Name", ColumnType::string(0)),
        ColumnInfo::new("Bench", 3, "Attributes", ColumnType::integer(2)),
        ColumnInfo::new("Bench", 4, "Sequence", ColumnType::integer(4)),
    ];
    let row_size = layout_columns("Bench", &mut columns).unwrap();
    (columns, row_size)
}

// Fill a table with random cells
fn generate_table(columns: &[ColumnInfo], rows: usize) -> Table {
    let mut rng = rand::thread_rng();
    let mut builder = ColumnMajorBuilder::for_columns(columns).unwrap();
    for _ in 0..rows {
        builder
            .push_row(&[
                rng.gen_range(1..0x10000),
                rng.gen_range(1..0x10000),
                rng.gen_range(0..0x10000),
                rng.r#gen::<u32>(),
            ])
            .unwrap();
    }
    Table::new("Bench", builder.build())
}

pub fn bench_row_scan(c: &mut Criterion) {
    let (columns, row_size) = bench_columns();

    let mut group = c.benchmark_group("RowScan");

    for rows in [64usize, 1024, 16384] {
        let table = generate_table(&columns, rows);

        group.bench_with_input(BenchmarkId::new("int32_column", rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut sum = 0u64;
                for row in 0..rows {
                    sum += fetch_cell(&table, &columns, row_size, row, 4).unwrap() as u64;
                }
                black_box(sum)
            })
        });

        group.bench_with_input(BenchmarkId::new("full_rows", rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut sum = 0u64;
                for row in 0..rows {
                    for ordinal in 1..=columns.len() as u32 {
                        sum += fetch_cell(&table, &columns, row_size, row, ordinal).unwrap() as u64;
                    }
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_row_scan);
criterion_main!(benches);
