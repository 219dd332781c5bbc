//! Train from CSV, publish, reload, and answer the four reference queries.

mod common;

use std::fs::File;

use skillence::artifacts::ArtifactStore;
use skillence::catalog::{self, ROLES};
use skillence::inference::skill_gap::{assess_skill_gap, ReadinessLevel};
use skillence::inference::ModelBundle;
use skillence::models::profile::ProfileRecord;
use skillence::training::dataset::write_csv;
use skillence::training::fixtures::rows;
use skillence::training::pipeline;

fn train_and_load(dir: &std::path::Path) -> ModelBundle {
    let config = common::training_config(dir);
    write_csv(File::create(&config.train_data_path).unwrap(), &rows(10)).unwrap();
    write_csv(File::create(&config.test_data_path).unwrap(), &rows(3)).unwrap();

    let report = pipeline::run(&config).unwrap();
    assert_eq!(report.train_samples, 70);
    assert_eq!(report.test_samples, 21);

    let bundle = ArtifactStore::new(&config.models_dir).load().unwrap();
    assert_eq!(bundle.manifest().bundle_id, report.bundle_id);
    bundle
}

#[test]
fn test_career_prediction_for_data_profile() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = train_and_load(dir.path());

    let outcome = bundle
        .predict_career(&ProfileRecord {
            education: "BSc".to_string(),
            skills: vec!["Python".into(), "SQL".into(), "Statistics".into()],
            interest: "Data".to_string(),
            experience_years: 3,
        })
        .unwrap();

    assert!(catalog::role_names().contains(&outcome.predicted_career.as_str()));
    assert!((0.0..=1.0).contains(&outcome.confidence));
    assert_eq!(outcome.probabilities.len(), ROLES.len());
    let total: f64 = outcome.probabilities.iter().map(|p| p.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_skill_gap_for_business_analyst() {
    let gap = assess_skill_gap(&["Excel", "SQL", "Power BI", "Statistics"][..], "Business Analyst")
        .unwrap();
    assert_eq!(gap.missing_skills, vec!["Communication"]);
    assert_eq!(gap.readiness_level, ReadinessLevel::Advanced);
    assert!((gap.coverage - 0.8).abs() < 1e-12);
}

#[test]
fn test_skill_gap_from_nothing() {
    let none: [&str; 0] = [];
    let gap = assess_skill_gap(&none[..], "Frontend Developer").unwrap();
    assert_eq!(gap.missing_skills, vec!["JavaScript", "HTML", "CSS", "Communication"]);
    assert_eq!(gap.readiness_level, ReadinessLevel::Beginner);
}

#[test]
fn test_identical_resume_and_job_description_match_fully() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = train_and_load(dir.path());
    let jd = catalog::job_description_for("ML Engineer");

    let result = bundle.match_resume(&jd, &jd);
    assert_eq!(result.match_percentage, 100.0);
    assert!(result.missing_keywords.is_empty());
}

#[test]
fn test_skill_readiness_follows_vocabulary_order() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = train_and_load(dir.path());

    let skills = bundle
        .skill_readiness(&ProfileRecord {
            education: "BCA".to_string(),
            skills: vec!["HTML".into(), "CSS".into()],
            interest: "Web".to_string(),
            experience_years: 1,
        })
        .unwrap();

    let names: Vec<&str> = skills.iter().map(|s| s.skill.as_str()).collect();
    assert_eq!(names, catalog::SKILL_VOCABULARY);
    assert!(skills.iter().all(|s| (0.0..=1.0).contains(&s.probability)));
}

#[test]
fn test_retraining_publishes_a_new_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let first = train_and_load(dir.path());
    let second = train_and_load(dir.path());
    assert_ne!(first.manifest().bundle_id, second.manifest().bundle_id);

    let store = ArtifactStore::new(common::training_config(dir.path()).models_dir);
    assert_eq!(store.current_bundle_id().unwrap(), Some(second.manifest().bundle_id));
}
