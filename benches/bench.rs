// Criterion benchmarks for Nearby Customers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nearby_customers::core::{
    distance::{distance, haversine_distance, DistanceUnit},
    filters::select_eligible,
    sorting::{sort_customers, SortDirection},
};
use nearby_customers::{AppConfig, Coordinate, CustomerRecord, ErrorPosture};
use serde_json::json;

fn create_record(id: usize, lat: f64, lon: f64) -> CustomerRecord {
    serde_json::from_value(json!({
        "user_id": id,
        "name": format!("Customer {}", id),
        "latitude": lat.to_string(),
        "longitude": lon.to_string(),
    }))
    .expect("valid record")
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(53.339428),
                black_box(-6.257664),
                black_box(52.986375),
                black_box(-6.043701),
            )
        });
    });

    c.bench_function("distance_miles", |b| {
        let source = Coordinate::new(53.339428, -6.257664);
        let destination = Coordinate::new(52.986375, -6.043701);
        b.iter(|| distance(black_box(source), black_box(destination), DistanceUnit::Miles));
    });
}

fn bench_filter_and_sort(c: &mut Criterion) {
    let config = AppConfig::default();

    let mut group = c.benchmark_group("filter_and_sort");

    for record_count in [10, 100, 1000, 10_000].iter() {
        let records: Vec<CustomerRecord> = (0..*record_count)
            .map(|i| {
                let lat_offset = (i as f64 * 0.003) % 2.0;
                let lon_offset = (i as f64 * 0.007) % 2.0;
                create_record(*record_count - i, 52.5 + lat_offset, -7.0 + lon_offset)
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("select_eligible", record_count),
            record_count,
            |b, _| {
                b.iter(|| {
                    let mut selection =
                        select_eligible(black_box(&records), &config, ErrorPosture::Production)
                            .expect("lenient selection");
                    sort_customers(&mut selection.eligible, "user_id", SortDirection::Ascending);
                    black_box(selection)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_haversine_distance, bench_filter_and_sort);

criterion_main!(benches);
