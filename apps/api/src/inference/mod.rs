//! Immutable model bundle shared by every inference request.
//!
//! A `ModelBundle` is only constructed from a complete, mutually consistent set
//! of fitted artifacts. Handlers hold it behind an `Arc` and never mutate it.

pub mod handlers;
pub mod resume_match;
pub mod skill_gap;

use serde::Serialize;

use crate::artifacts::BundleManifest;
use crate::ml::career::CareerClassifier;
use crate::ml::features::FittedFeatureEncoder;
use crate::ml::label::TargetEncoder;
use crate::ml::skill_readiness::{SkillProbability, SkillReadinessModel};
use crate::ml::text::TfidfVectorizer;
use crate::ml::MlError;
use crate::models::profile::ProfileRecord;
use resume_match::ResumeMatch;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleProbability {
    pub role: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerOutcome {
    pub predicted_career: String,
    pub confidence: f64,
    /// One entry per fitted role, in class-id order.
    pub probabilities: Vec<RoleProbability>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    manifest: BundleManifest,
    encoder: FittedFeatureEncoder,
    targets: TargetEncoder,
    career: CareerClassifier,
    skills: SkillReadinessModel,
    vectorizer: TfidfVectorizer,
}

fn inconsistent(msg: String) -> MlError {
    MlError::InconsistentBundle(msg)
}

impl ModelBundle {
    /// Checks that the parts were fit against each other before exposing them.
    pub fn assemble(
        manifest: BundleManifest,
        encoder: FittedFeatureEncoder,
        targets: TargetEncoder,
        career: CareerClassifier,
        skills: SkillReadinessModel,
        vectorizer: TfidfVectorizer,
    ) -> Result<Self, MlError> {
        if manifest.feature_width != encoder.width() {
            return Err(inconsistent(format!(
                "manifest declares {} features, encoder produces {}",
                manifest.feature_width,
                encoder.width()
            )));
        }
        if career.n_features() != encoder.width() {
            return Err(inconsistent(format!(
                "career model expects {} features, encoder produces {}",
                career.n_features(),
                encoder.width()
            )));
        }
        if career.n_classes() != targets.n_classes() {
            return Err(inconsistent(format!(
                "career model has {} classes, target encoder has {}",
                career.n_classes(),
                targets.n_classes()
            )));
        }
        if skills.skills() != encoder.skill_vocabulary()
            || manifest.skill_vocabulary != encoder.skill_vocabulary()
        {
            return Err(inconsistent(
                "skill vocabulary differs between encoder, skill model and manifest".to_string(),
            ));
        }

        Ok(Self {
            manifest,
            encoder,
            targets,
            career,
            skills,
            vectorizer,
        })
    }

    pub fn predict_career(&self, profile: &ProfileRecord) -> Result<CareerOutcome, MlError> {
        let row = self.encoder.transform_one(profile)?;
        let prediction = self.career.predict(&row)?;
        let predicted_career = self.targets.decode_one(prediction.class_id)?.to_string();
        let probabilities = self
            .targets
            .classes()
            .iter()
            .zip(&prediction.probabilities)
            .map(|(role, p)| RoleProbability {
                role: role.clone(),
                probability: *p,
            })
            .collect();
        Ok(CareerOutcome {
            predicted_career,
            confidence: prediction.confidence,
            probabilities,
        })
    }

    pub fn skill_readiness(&self, profile: &ProfileRecord) -> Result<Vec<SkillProbability>, MlError> {
        let row = self.encoder.transform_one(profile)?;
        self.skills.predict_labeled(&row)
    }

    pub fn match_resume(&self, resume_text: &str, job_description: &str) -> ResumeMatch {
        resume_match::match_resume(&self.vectorizer, resume_text, job_description)
    }

    pub fn manifest(&self) -> &BundleManifest {
        &self.manifest
    }

    pub fn encoder(&self) -> &FittedFeatureEncoder {
        &self.encoder
    }

    pub fn targets(&self) -> &TargetEncoder {
        &self.targets
    }

    pub fn career(&self) -> &CareerClassifier {
        &self.career
    }

    pub fn skills(&self) -> &SkillReadinessModel {
        &self.skills
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }
}
