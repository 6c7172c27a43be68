//! End-to-end tests of the test engine over mock ports.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::sync::Arc;

use ishihara_core::{
    DeficiencyType, DiagnosisStatus, EngineError, PlateCatalog, PlateCategory, ResponseEvaluator,
    ResponseRecord, SessionBuilder, Severity,
};
use ishihara_test_support::{MockDigitClassifier, MockPlateSource, PlateNameBuilder};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Ten plates per category, digits cycling 0..9.
fn plate_names() -> Vec<String> {
    PlateCategory::ALL
        .iter()
        .flat_map(|&category| {
            (0..10u8).map(move |digit| {
                PlateNameBuilder::new(digit)
                    .font(format!("Font{digit}"))
                    .category(category)
                    .build()
            })
        })
        .collect()
}

fn names_in(category: PlateCategory) -> Vec<String> {
    plate_names()
        .into_iter()
        .filter(|n| n.contains(&format!("type_{}", category.number())))
        .collect()
}

fn digit_of(name: &str) -> u8 {
    name.as_bytes()[0] - b'0'
}

/// Answers every plate of `category`, getting the first `wrong` of them wrong.
fn answers(category: PlateCategory, wrong: usize) -> Vec<ResponseRecord> {
    names_in(category)
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let digit = digit_of(&name);
            let answer = if i < wrong { (digit + 1) % 10 } else { digit };
            ResponseRecord::new(name, answer)
        })
        .collect()
}

fn catalog() -> PlateCatalog {
    PlateCatalog::new(Arc::new(MockPlateSource::with_synthetic(plate_names())))
}

fn evaluator() -> ResponseEvaluator {
    ResponseEvaluator::new(catalog(), Arc::new(MockDigitClassifier::reading_marker()))
}

#[test]
fn test_mild_deutan_scenario() {
    let mut responses = answers(PlateCategory::GreenOrange, 1);
    responses.extend(answers(PlateCategory::GreenYellow, 1));

    let result = evaluator().evaluate(&responses).unwrap();
    let d = &result.diagnosis;

    assert_eq!(result.total_questions, 20);
    assert_eq!(result.total_correct, 18);
    assert!((result.overall_accuracy - 90.0).abs() < 1e-9);
    assert_eq!(d.status, DiagnosisStatus::PossibleWeakness);
    assert_eq!(d.deficiency_type, Some(DeficiencyType::Deuteranomaly));
    assert_eq!(d.severity, Severity::Mild);
    assert!((d.deutan_likelihood - 10.0).abs() < 1e-9);
    assert!(d.protan_likelihood.abs() < 1e-9);
}

#[test]
fn test_all_correct_is_normal() {
    let responses: Vec<_> = PlateCategory::ALL
        .iter()
        .flat_map(|&c| answers(c, 0).into_iter().take(5))
        .collect();

    let result = evaluator().evaluate(&responses).unwrap();
    assert_eq!(result.total_questions, 20);
    assert_eq!(result.diagnosis.status, DiagnosisStatus::Normal);
    assert_eq!(result.diagnosis.severity, Severity::None);
    assert_eq!(result.diagnosis.deficiency_type, None);
    assert!((result.overall_accuracy - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_strong_protan_scenario() {
    let mut responses = answers(PlateCategory::RedGreen, 6);
    responses.extend(answers(PlateCategory::RedGray, 5));

    let result = evaluator().evaluate(&responses).unwrap();
    let d = &result.diagnosis;

    assert_eq!(d.status, DiagnosisStatus::ColourBlind);
    assert_eq!(d.deficiency_type, Some(DeficiencyType::Protanopia));
    assert_eq!(d.severity, Severity::Strong);
    assert!((d.protan_likelihood - 55.0).abs() < 1e-9);
}

#[test]
fn test_response_order_does_not_change_outcome() {
    let mut responses = answers(PlateCategory::RedGreen, 4);
    responses.extend(answers(PlateCategory::GreenOrange, 2));

    let forward = evaluator().evaluate(&responses).unwrap();
    responses.reverse();
    let backward = evaluator().evaluate(&responses).unwrap();

    assert_eq!(forward.diagnosis, backward.diagnosis);
    assert_eq!(forward.per_category_stats, backward.per_category_stats);
}

#[test]
fn test_unreadable_plate_is_skipped() {
    let broken = PlateNameBuilder::new(4).category(PlateCategory::RedGreen).build();
    let good = PlateNameBuilder::new(2).category(PlateCategory::RedGreen).build();
    let source = MockPlateSource::with_synthetic([good.clone()]).unreadable(broken.clone());
    let classifier = Arc::new(MockDigitClassifier::reading_marker());
    let evaluator =
        ResponseEvaluator::new(PlateCatalog::new(Arc::new(source)), classifier.clone());

    let result = evaluator
        .evaluate(&[ResponseRecord::new(broken, 4), ResponseRecord::new(good, 2)])
        .unwrap();

    assert_eq!(result.total_questions, 1);
    assert_eq!(classifier.calls(), 1);
}

#[test]
fn test_classifier_failure_surfaces_reason() {
    let evaluator = ResponseEvaluator::new(
        catalog(),
        Arc::new(MockDigitClassifier::failing("weights missing")),
    );
    let err = evaluator
        .evaluate(&answers(PlateCategory::RedGray, 0))
        .unwrap_err();

    assert_eq!(err.code(), "classifier_unavailable");
    assert!(err.to_string().contains("weights missing"));
}

#[test]
fn test_out_of_range_answer_is_a_mistake() {
    let name = PlateNameBuilder::new(3).font("Font3").build();
    let result = evaluator()
        .evaluate(&[ResponseRecord::new(name, 42)])
        .unwrap();
    assert_eq!(result.total_questions, 1);
    assert_eq!(result.total_correct, 0);
}

#[test]
fn test_session_never_exposes_digits() {
    let builder = SessionBuilder::new(catalog());
    let session = builder
        .start_session_with_rng(Some(25), &mut StdRng::seed_from_u64(11))
        .unwrap();

    assert_eq!(session.total_images, 25);
    let json = serde_json::to_value(&session).unwrap();
    let plate = &json["plates"][0];
    assert!(plate.get("digit").is_none());
    assert!(plate.get("id").is_some());
    assert!(plate.get("category").is_some());

    let unique: HashSet<_> = session.plates.iter().map(|p| p.filename.as_str()).collect();
    assert_eq!(unique.len(), 25);
}

#[test]
fn test_session_over_failing_source() {
    let builder = SessionBuilder::new(PlateCatalog::new(Arc::new(MockPlateSource::failing(
        "permission denied",
    ))));
    let err = builder.start_session(None).unwrap_err();
    assert!(matches!(err, EngineError::Source { .. }));
    assert_eq!(err.code(), "source_unavailable");
}

#[test]
fn test_session_over_only_malformed_names() {
    let source = MockPlateSource::with_synthetic(["a.png", "b.png", "notes.png"]);
    let builder = SessionBuilder::new(PlateCatalog::new(Arc::new(source)));
    let err = builder.start_session(Some(15)).unwrap_err();
    assert!(matches!(err, EngineError::InsufficientData));
}

#[test]
fn test_evaluation_json_shape() {
    let result = evaluator()
        .evaluate(&answers(PlateCategory::GreenYellow, 3))
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["per_category_stats"].as_array().unwrap().len(), 4);
    assert_eq!(json["per_category_stats"][3]["category"], 4);
    assert_eq!(json["diagnosis"]["status"], "colour_weak");
    assert_eq!(json["diagnosis"]["type"], "Deuteranomaly");
    assert_eq!(json["detailed_results"][0]["is_correct"], false);
}
