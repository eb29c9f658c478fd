use chrono::NaiveDate;
use flate2::write::GzEncoder;
use flate2::Compression;
use rumah_core::{CategoryField, FixedClock, InflationRequest, RawInput, SizeUnit};
use rumah_serving::{
    dataset_note, render_outcome, ArtifactConfig, FormInput, PredictionForm, ServingError,
};
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const COLUMNS: &[&str] = &[
    "Rooms",
    "Bathrooms",
    "Car Parks",
    "Size",
    "Location_Ampang",
    "Location_Cheras",
    "Location_Mont Kiara",
    "Property Type_Condominium",
    "Property Type_Terrace",
    "Furnishing_Fully Furnished",
    "Furnishing_Unfurnished",
];

const LOCATION_AMPANG: i64 = 4;
const SIZE: i64 = 3;

fn forest() -> serde_json::Value {
    json!({
        "type": "random_forest",
        "n_features": COLUMNS.len(),
        "trees": [
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [LOCATION_AMPANG, -2, -2],
                "threshold": [0.5, -2.0, -2.0],
                "value": [0.0, 300000.0, 500000.0]
            },
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [SIZE, -2, -2],
                "threshold": [0.0, -2.0, -2.0],
                "value": [0.0, 350000.0, 450000.0]
            }
        ]
    })
}

/// Size is centred on 1000 sq ft; everything else passes through.
fn scaler() -> serde_json::Value {
    let mut mean = vec![0.0; COLUMNS.len()];
    let mut scale = vec![1.0; COLUMNS.len()];
    mean[SIZE as usize] = 1000.0;
    scale[SIZE as usize] = 500.0;
    json!({ "type": "standard", "mean": mean, "scale": scale })
}

fn write_json(path: &Path, value: &serde_json::Value) {
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn write_gz(path: &Path, value: &serde_json::Value) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&serde_json::to_vec(value).unwrap())
        .unwrap();
    std::fs::write(path, encoder.finish().unwrap()).unwrap();
}

fn write_artifacts(dir: &Path, compressed: bool) {
    write_json(&dir.join("feature_columns.json"), &json!(COLUMNS));
    write_json(&dir.join("scaler.json"), &scaler());
    if compressed {
        write_gz(&dir.join("model.json.gz"), &forest());
    } else {
        write_json(&dir.join("model.json"), &forest());
    }
}

fn load_form(dir: &Path, today: NaiveDate) -> PredictionForm {
    let config = ArtifactConfig::builder().artifact_dir(dir).build();
    PredictionForm::load(&config, Arc::new(FixedClock(today))).unwrap()
}

fn request(location: &str, size: f64, unit: SizeUnit) -> FormInput {
    FormInput {
        raw: RawInput {
            location: location.to_string(),
            property_type: "Condominium".to_string(),
            furnishing: "Fully Furnished".to_string(),
            rooms: 3,
            bathrooms: 2,
            car_parks: 1,
            size,
            size_unit: unit,
        },
        inflation: InflationRequest::none(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn ampang_condominium_end_to_end() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), false);
    let form = load_form(dir.path(), date(2024, 7, 4));

    let vector = form
        .artifacts()
        .assembler
        .assemble(&request("Ampang", 1200.0, SizeUnit::SquareFeet).raw)
        .unwrap();
    let expected: Vec<(&str, f64)> = vec![
        ("Rooms", 3.0),
        ("Bathrooms", 2.0),
        ("Car Parks", 1.0),
        ("Size", 1200.0),
        ("Location_Ampang", 1.0),
        ("Location_Cheras", 0.0),
        ("Location_Mont Kiara", 0.0),
        ("Property Type_Condominium", 1.0),
        ("Property Type_Terrace", 0.0),
        ("Furnishing_Fully Furnished", 1.0),
        ("Furnishing_Unfurnished", 0.0),
    ];
    assert_eq!(vector.iter().collect::<Vec<_>>(), expected);

    let outcome = form
        .submit(&request("Ampang", 1200.0, SizeUnit::SquareFeet))
        .unwrap();
    assert_eq!(outcome.price, 475_000.0);
    assert_eq!(
        render_outcome(&outcome),
        vec!["Predicted Price: RM 475,000.00"]
    );
}

#[test]
fn inflation_adjusted_end_to_end() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), false);
    let form = load_form(dir.path(), date(2024, 7, 4));

    let mut input = request("Cheras", 800.0, SizeUnit::SquareFeet);
    input.inflation = InflationRequest::at_rate(3.0);
    let outcome = form.submit(&input).unwrap();

    // (300k + 350k) / 2, then five years at 3%.
    assert_eq!(outcome.price, 325_000.0);
    let adjustment = outcome.adjustment.unwrap();
    assert_eq!(adjustment.years, 5);
    assert_eq!(
        render_outcome(&outcome),
        vec![
            "Predicted Price: RM 325,000.00",
            "Inflation-Adjusted Price: RM 376,764.07",
        ]
    );
    assert_eq!(
        dataset_note(form.reference_date()),
        "Note: The dataset used to train this model was last updated on July 4, 2019."
    );
}

#[test]
fn metric_size_is_converted_before_scaling() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), false);
    let form = load_form(dir.path(), date(2024, 7, 4));

    // 90 sqm is about 969 sq ft: below the 1000 sq ft split.
    let small = form
        .submit(&request("Cheras", 90.0, SizeUnit::SquareMeters))
        .unwrap();
    assert_eq!(small.price, 325_000.0);

    // 100 sqm is about 1076 sq ft: above it.
    let large = form
        .submit(&request("Cheras", 100.0, SizeUnit::SquareMeters))
        .unwrap();
    assert_eq!(large.price, 375_000.0);
}

#[test]
fn compressed_model_is_decompressed_once() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), true);
    assert!(!dir.path().join("model.json").exists());

    let form = load_form(dir.path(), date(2024, 7, 4));
    assert!(dir.path().join("model.json").exists());
    let first = form
        .submit(&request("Ampang", 1200.0, SizeUnit::SquareFeet))
        .unwrap();

    // A second startup reuses the decompressed copy.
    let form = load_form(dir.path(), date(2024, 7, 4));
    let second = form
        .submit(&request("Ampang", 1200.0, SizeUnit::SquareFeet))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn catalog_lists_values_from_columns() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), false);
    let form = load_form(dir.path(), date(2024, 7, 4));

    let catalog = form.catalog();
    assert_eq!(
        catalog.values(CategoryField::Location).collect::<Vec<_>>(),
        vec!["Ampang", "Cheras", "Mont Kiara"]
    );
    assert_eq!(
        catalog
            .values(CategoryField::PropertyType)
            .collect::<Vec<_>>(),
        vec!["Condominium", "Terrace"]
    );
    assert_eq!(
        catalog.values(CategoryField::Furnishing).collect::<Vec<_>>(),
        vec!["Fully Furnished", "Unfurnished"]
    );
}

#[test]
fn unknown_category_is_rejected() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), false);
    let form = load_form(dir.path(), date(2024, 7, 4));

    let err = form
        .submit(&request("Putrajaya", 1200.0, SizeUnit::SquareFeet))
        .unwrap_err();
    assert!(err.is_client_error());
    assert!(err.to_string().contains("Putrajaya"));
}

#[test]
fn width_mismatch_is_fatal_at_startup() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), false);
    let mut columns = COLUMNS.to_vec();
    columns.push("Furnishing_Partly Furnished");
    write_json(&dir.path().join("feature_columns.json"), &json!(columns));

    let config = ArtifactConfig::builder().artifact_dir(dir.path()).build();
    let err = PredictionForm::load(&config, Arc::new(FixedClock(date(2024, 7, 4)))).unwrap_err();
    assert!(matches!(err, ServingError::ConfigError(_)));
    assert!(err.is_config_error());
}

#[test]
fn missing_artifacts_are_fatal_at_startup() {
    let dir = tempdir().unwrap();
    let config = ArtifactConfig::builder().artifact_dir(dir.path()).build();
    let err = PredictionForm::load(&config, Arc::new(FixedClock(date(2024, 7, 4)))).unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn form_is_shareable_across_threads() {
    let dir = tempdir().unwrap();
    write_artifacts(dir.path(), false);
    let form = Arc::new(load_form(dir.path(), date(2024, 7, 4)));

    let handles: Vec<_> = ["Ampang", "Cheras", "Mont Kiara"]
        .into_iter()
        .map(|location| {
            let form = Arc::clone(&form);
            std::thread::spawn(move || {
                form.submit(&request(location, 1200.0, SizeUnit::SquareFeet))
                    .unwrap()
                    .price
            })
        })
        .collect();
    let prices: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(prices, vec![475_000.0, 375_000.0, 375_000.0]);
}
