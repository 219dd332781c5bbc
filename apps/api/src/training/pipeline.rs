//! Training orchestrator.
//!
//! Steps run strictly in order:
//!
//! 1. load train/test rows
//! 2. fit the feature encoder on train, transform both splits
//! 3. fit the target encoder on train labels, encode both splits
//! 4. fit the career classifier
//! 5. synthesize skill labels from the role table, fit the skill-readiness model
//! 6. fit the text vectorizer on the synthetic résumé + job-description corpus
//! 7. publish every artifact as one bundle
//!
//! Any failure aborts the run; nothing is published unless step 7 is reached
//! with every part fitted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::corpus::{build_corpus, text_pairs};
use super::dataset::{load_csv, DatasetError};
use super::evaluation::{
    evaluate_career, evaluate_skills, evaluate_text, CareerEvaluation, SkillEvaluation,
    TextEvaluation,
};
use crate::artifacts::{ArtifactError, ArtifactStore, BundleManifest};
use crate::catalog::SKILL_VOCABULARY;
use crate::config::TrainingConfig;
use crate::inference::ModelBundle;
use crate::ml::career::CareerClassifier;
use crate::ml::features::{FeatureEncoder, FittedFeatureEncoder};
use crate::ml::forest::ForestParams;
use crate::ml::label::TargetEncoder;
use crate::ml::logistic::LogisticParams;
use crate::ml::skill_readiness::{synthesize_labels, SkillReadinessModel};
use crate::ml::text::{TfidfParams, TfidfVectorizer};
use crate::ml::MlError;
use crate::models::profile::{LabeledProfile, ProfileRecord};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("training failed: {0}")]
    Ml(#[from] MlError),

    #[error("failed to persist model bundle: {0}")]
    Artifact(#[from] ArtifactError),
}

#[derive(Debug, Clone, Default)]
pub struct PipelineParams {
    pub forest: ForestParams,
    pub logistic: LogisticParams,
    pub tfidf: TfidfParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub bundle_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub train_samples: usize,
    pub test_samples: usize,
    pub feature_width: usize,
    pub career: CareerEvaluation,
    pub skills: SkillEvaluation,
    pub text: TextEvaluation,
}

/// Parts fitted so far. `finish` refuses to build a bundle from a partial set.
#[derive(Default)]
struct FittedParts {
    encoder: Option<FittedFeatureEncoder>,
    targets: Option<TargetEncoder>,
    career: Option<CareerClassifier>,
    skills: Option<SkillReadinessModel>,
    vectorizer: Option<TfidfVectorizer>,
}

impl FittedParts {
    fn finish(self) -> Result<ModelBundle, MlError> {
        let encoder = self.encoder.ok_or(MlError::NotFitted("feature encoder"))?;
        let targets = self.targets.ok_or(MlError::NotFitted("target encoder"))?;
        let career = self.career.ok_or(MlError::NotFitted("career classifier"))?;
        let skills = self.skills.ok_or(MlError::NotFitted("skill-readiness model"))?;
        let vectorizer = self.vectorizer.ok_or(MlError::NotFitted("text vectorizer"))?;

        let manifest = BundleManifest::new(
            encoder.skill_vocabulary().to_vec(),
            encoder.width(),
            targets.classes().to_vec(),
        );
        ModelBundle::assemble(manifest, encoder, targets, career, skills, vectorizer)
    }
}

fn split(rows: &[LabeledProfile]) -> (Vec<ProfileRecord>, Vec<&str>) {
    rows.iter()
        .map(|r| (r.profile.clone(), r.target_role.as_str()))
        .unzip()
}

/// Steps 2–6 over in-memory rows. Returns an unpublished bundle.
pub fn fit_bundle(
    train: &[LabeledProfile],
    test: &[LabeledProfile],
    params: &PipelineParams,
) -> Result<(ModelBundle, TrainingReport), MlError> {
    if train.is_empty() {
        return Err(MlError::EmptyDataset("training split"));
    }
    let mut parts = FittedParts::default();
    let (train_profiles, train_roles) = split(train);
    let (test_profiles, test_roles) = split(test);

    let encoder = FeatureEncoder::new(SKILL_VOCABULARY).fit(&train_profiles)?;
    let x_train = encoder.transform(&train_profiles)?;
    let x_test = encoder.transform(&test_profiles)?;
    info!(
        step = 2,
        train = x_train.len(),
        test = x_test.len(),
        width = encoder.width(),
        "feature encoder fitted"
    );

    let targets = TargetEncoder::fit(train_roles.iter().copied())?;
    let y_train = targets.encode(&train_roles[..])?;
    let y_test = targets.encode(&test_roles[..])?;
    info!(step = 3, classes = targets.n_classes(), "target encoder fitted");

    let career = CareerClassifier::train(&x_train, &y_train, targets.n_classes(), &params.forest)?;
    let career_eval = evaluate_career(
        &career,
        targets.classes(),
        (&x_train, &y_train),
        (&x_test, &y_test),
    )?;
    info!(
        step = 4,
        train_accuracy = career_eval.train.accuracy,
        test_accuracy = career_eval.test.accuracy,
        test_f1 = career_eval.test.f1,
        "career classifier fitted"
    );

    let skill_train = synthesize_labels(&train_roles[..], encoder.skill_vocabulary())?;
    let skill_test = synthesize_labels(&test_roles[..], encoder.skill_vocabulary())?;
    let skills = SkillReadinessModel::train(
        &x_train,
        &skill_train,
        encoder.skill_vocabulary(),
        &params.logistic,
    )?;
    let skill_eval = evaluate_skills(&skills, (&x_train, &skill_train), (&x_test, &skill_test))?;
    info!(
        step = 5,
        test_exact_match = skill_eval.test.exact_match_accuracy,
        test_f1 = skill_eval.test.weighted_f1,
        "skill-readiness model fitted"
    );

    let vectorizer = TfidfVectorizer::fit(&build_corpus(train), params.tfidf)?;
    let text_eval = evaluate_text(&vectorizer, &text_pairs(test));
    info!(step = 6, vocabulary = text_eval.vocabulary_size, "text vectorizer fitted");

    parts.encoder = Some(encoder);
    parts.targets = Some(targets);
    parts.career = Some(career);
    parts.skills = Some(skills);
    parts.vectorizer = Some(vectorizer);
    let bundle = parts.finish()?;

    let manifest = bundle.manifest();
    let report = TrainingReport {
        bundle_id: manifest.bundle_id,
        trained_at: manifest.trained_at,
        train_samples: train.len(),
        test_samples: test.len(),
        feature_width: manifest.feature_width,
        career: career_eval,
        skills: skill_eval,
        text: text_eval,
    };
    Ok((bundle, report))
}

/// Full run: load the configured CSVs, fit, and publish under `models_dir`.
pub fn run(config: &TrainingConfig) -> Result<TrainingReport, PipelineError> {
    let train = load_csv(&config.train_data_path)?;
    let test = load_csv(&config.test_data_path)?;
    info!(step = 1, train = train.len(), test = test.len(), "datasets loaded");

    let (bundle, report) = fit_bundle(&train, &test, &config.pipeline_params())?;

    let store = ArtifactStore::new(&config.models_dir);
    store.save(&bundle)?;
    info!(step = 7, bundle_id = %report.bundle_id, "training complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_parts_are_not_a_bundle() {
        let err = FittedParts::default().finish().unwrap_err();
        assert_eq!(err, MlError::NotFitted("feature encoder"));
    }

    #[test]
    fn test_empty_training_split_aborts() {
        let err = fit_bundle(&[], &[], &PipelineParams::default()).unwrap_err();
        assert_eq!(err, MlError::EmptyDataset("training split"));
    }

    #[test]
    fn test_unknown_test_label_aborts() {
        let row = |role: &str, interest: &str| LabeledProfile {
            profile: ProfileRecord {
                education: "BSc".to_string(),
                skills: vec!["Python".to_string()],
                interest: interest.to_string(),
                experience_years: 1,
            },
            target_role: role.to_string(),
        };
        let train = vec![row("Data Analyst", "Data"), row("ML Engineer", "AI")];
        let test = vec![row("Astronaut", "Data")];
        let err = fit_bundle(&train, &test, &PipelineParams::default()).unwrap_err();
        assert_eq!(err, MlError::UnknownLabel("Astronaut".to_string()));
    }

    #[test]
    fn test_fit_bundle_covers_every_role() {
        let train = crate::training::fixtures::rows(8);
        let test = crate::training::fixtures::rows(2);
        let (bundle, report) =
            fit_bundle(&train, &test, &crate::training::fixtures::fast_params()).unwrap();

        assert_eq!(report.train_samples, 56);
        assert_eq!(report.test_samples, 14);
        assert_eq!(bundle.targets().n_classes(), 7);
        assert_eq!(report.career.confusion_matrix.len(), 7);
        assert_eq!(report.skills.skills.len(), SKILL_VOCABULARY.len());
        assert!(report.text.vocabulary_size > 0);
        assert!(report.career.train.accuracy > 0.5);
    }
}
