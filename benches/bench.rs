// Criterion benchmarks for the inference pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use exam_score_api::config::ArtifactSettings;
use exam_score_api::core::{FeatureTransform, PolynomialConfig, PolynomialFeatures};
use exam_score_api::models::parse_prediction_request;
use exam_score_api::services::ModelArtifacts;
use serde_json::json;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn sample_body() -> serde_json::Value {
    json!({
        "Hours_Studied": 10,
        "Attendance": 80,
        "Parental_Involvement": "High",
        "Access_to_Resources": "Medium",
        "Extracurricular_Activities": true,
        "Sleep_Hours": 7,
        "Previous_Scores": 70,
        "Motivation_Level": "Medium",
        "Internet_Access": true,
        "Tutoring_Sessions": 2,
        "Family_Income": "Low",
        "Teacher_Quality": "High",
        "School_Type": "Public",
        "Peer_Influence": "Positive",
        "Physical_Activity": 3,
        "Learning_Disabilities": false,
        "Parental_Education_Level": "College",
        "Distance_from_Home": "Near",
        "Gender": "Female"
    })
}

fn bench_parse_request(c: &mut Criterion) {
    let body = sample_body();
    c.bench_function("parse_prediction_request", |b| {
        b.iter(|| parse_prediction_request(black_box(&body)).unwrap());
    });
}

fn bench_predict(c: &mut Criterion) {
    let settings = ArtifactSettings {
        model_path: fixture_path("model.json"),
        transformer_path: fixture_path("poly_transformer.json"),
        scaling_path: fixture_path("scaling_params.json"),
    };
    let pipeline = ModelArtifacts::load(&settings)
        .and_then(ModelArtifacts::into_pipeline)
        .unwrap();
    let record = parse_prediction_request(&sample_body()).unwrap();

    c.bench_function("pipeline_predict", |b| {
        b.iter(|| pipeline.predict(black_box(&record)).unwrap());
    });
}

fn bench_polynomial_degrees(c: &mut Criterion) {
    let mut group = c.benchmark_group("polynomial_transform");

    for degree in [2u32, 5, 8].iter() {
        let poly = PolynomialFeatures::new(PolynomialConfig {
            degree: *degree,
            include_bias: true,
            interaction_only: false,
            n_features_in: 3,
            feature_names_in: None,
        })
        .unwrap();
        let input = [0.17, 0.1, 0.5];

        group.bench_with_input(BenchmarkId::from_parameter(degree), &poly, |b, poly| {
            b.iter(|| poly.transform(black_box(&input)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_request, bench_predict, bench_polynomial_degrees);
criterion_main!(benches);
