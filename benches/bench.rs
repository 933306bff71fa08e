// Criterion benchmarks for the tutormatch engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tutormatch::core::distance::{city_distance_km, haversine_distance};
use tutormatch::core::grader::{grade_candidate, grade_in_place};
use tutormatch::models::{CandidatePair, Coordinates, Gender};

fn create_candidate(i: usize) -> CandidatePair {
    CandidatePair {
        child_id: i as i64,
        child_name: format!("Child {}", i),
        child_city: "Haifa".to_string(),
        child_age: 8 + (i % 10) as i16,
        child_gender: if i % 2 == 0 { Gender::Female } else { Gender::Male },
        tutor_id: (i + 10_000) as i64,
        tutor_name: format!("Tutor {}", i),
        tutor_city: "Tel Aviv".to_string(),
        tutor_age: 20 + (i % 25) as i16,
        tutor_gender: if i % 2 == 0 { Gender::Female } else { Gender::Male },
        distance_km: (i % 70) as i32,
        tutor_coord: None,
        child_coord: None,
        grade: 0,
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(31.7683),
                black_box(35.2137),
                black_box(32.0853),
                black_box(34.7818),
            )
        });
    });
}

fn bench_city_distance(c: &mut Criterion) {
    let jerusalem = Coordinates { latitude: 31.7683, longitude: 35.2137 };
    let tel_aviv = Coordinates { latitude: 32.0853, longitude: 34.7818 };

    c.bench_function("city_distance_km", |b| {
        b.iter(|| city_distance_km(black_box(jerusalem), black_box(tel_aviv)));
    });
}

fn bench_grade_candidate(c: &mut Criterion) {
    c.bench_function("grade_candidate", |b| {
        b.iter(|| {
            grade_candidate(black_box(7), black_box(40), black_box(6), black_box(23))
        });
    });
}

fn bench_grading(c: &mut Criterion) {
    let mut group = c.benchmark_group("grading");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let board: Vec<CandidatePair> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("grade_in_place", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    let mut pairs = board.clone();
                    grade_in_place(black_box(&mut pairs));
                    black_box(pairs)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_city_distance,
    bench_grade_candidate,
    bench_grading
);

criterion_main!(benches);
