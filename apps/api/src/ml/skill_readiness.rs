//! Skill-readiness model: one independent logistic regression per skill.
//!
//! Training targets are synthesized from the catalog's role → required-skills
//! table (weak supervision): a sample is labeled with every skill its true role
//! requires. The model never sees per-person skill annotations. Columns are
//! treated as conditionally independent given the features, and probabilities
//! from different columns are not calibrated against each other; each is only
//! meaningful against its own 0.5 boundary.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::logistic::{LogisticParams, LogisticRegression};
use super::{check_lengths, FeatureVector, MlError};
use crate::catalog;

/// Builds the multi-label target matrix for `roles` over `skill_vocabulary`.
///
/// Fails on a role missing from the catalog: a silent all-zero row would teach
/// the model that the role needs nothing.
pub fn synthesize_labels<S: AsRef<str>>(
    roles: &[S],
    skill_vocabulary: &[String],
) -> Result<Vec<Vec<bool>>, MlError> {
    roles
        .iter()
        .map(|role| {
            let role = role.as_ref();
            let profile =
                catalog::find_role(role).ok_or_else(|| MlError::UnknownRole(role.to_string()))?;
            Ok(skill_vocabulary
                .iter()
                .map(|skill| profile.required_skills.contains(&skill.as_str()))
                .collect())
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillReadinessModel {
    skills: Vec<String>,
    columns: Vec<LogisticRegression>,
}

/// Probability for one skill column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillProbability {
    pub skill: String,
    pub probability: f64,
}

impl SkillReadinessModel {
    pub fn train(
        x: &[FeatureVector],
        labels: &[Vec<bool>],
        skills: &[String],
        params: &LogisticParams,
    ) -> Result<Self, MlError> {
        check_lengths(x.len(), labels.len())?;
        info!(
            samples = x.len(),
            skills = skills.len(),
            "training skill-readiness model"
        );

        let columns = skills
            .iter()
            .enumerate()
            .map(|(j, skill)| {
                let column = labels
                    .iter()
                    .map(|row| {
                        row.get(j).copied().ok_or(MlError::DimensionMismatch {
                            expected: skills.len(),
                            actual: row.len(),
                        })
                    })
                    .collect::<Result<Vec<bool>, _>>()?;
                let model = LogisticRegression::fit(x, &column, params).map_err(|e| match e {
                    MlError::SingleClass { .. } => MlError::SingleClass {
                        model: format!("skill-readiness column '{skill}'"),
                    },
                    other => other,
                })?;
                debug!(skill = %skill, iterations = model.iterations(), "skill column fitted");
                Ok(model)
            })
            .collect::<Result<Vec<_>, MlError>>()?;

        Ok(Self {
            skills: skills.to_vec(),
            columns,
        })
    }

    /// Per-skill probabilities in vocabulary order.
    pub fn predict(&self, row: &[f64]) -> Result<Vec<f64>, MlError> {
        self.columns.iter().map(|m| m.predict_proba(row)).collect()
    }

    pub fn predict_labeled(&self, row: &[f64]) -> Result<Vec<SkillProbability>, MlError> {
        Ok(self
            .skills
            .iter()
            .zip(self.predict(row)?)
            .map(|(skill, probability)| SkillProbability {
                skill: skill.clone(),
                probability,
            })
            .collect())
    }

    /// Hard decisions at each column's own 0.5 boundary.
    pub fn predict_labels(&self, row: &[f64]) -> Result<Vec<bool>, MlError> {
        Ok(self.predict(row)?.into_iter().map(|p| p >= 0.5).collect())
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SKILL_VOCABULARY;

    fn vocabulary() -> Vec<String> {
        SKILL_VOCABULARY.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_label_synthesis_follows_role_table() {
        let labels = synthesize_labels(&["Backend Developer"][..], &vocabulary()).unwrap();
        // Python, SQL, JavaScript
        assert_eq!(
            labels[0],
            vec![true, true, false, false, true, false, false, false, false, false]
        );
    }

    #[test]
    fn test_label_synthesis_rejects_unknown_role() {
        let err = synthesize_labels(&["Astronaut"][..], &vocabulary()).unwrap_err();
        assert_eq!(err, MlError::UnknownRole("Astronaut".to_string()));
    }

    #[test]
    fn test_one_column_per_skill() {
        // feature 0 flags frontend-ish profiles
        let roles = ["Frontend Developer", "ML Engineer"];
        let mut x = Vec::new();
        let mut role_column = Vec::new();
        for i in 0..20 {
            let r = i % 2;
            x.push(vec![r as f64, (i % 3) as f64]);
            role_column.push(roles[r]);
        }
        let labels = synthesize_labels(&role_column[..], &vocabulary()).unwrap();
        // only skills that differ between the two roles are trainable
        let skills: Vec<String> = ["HTML", "ML"].iter().map(|s| s.to_string()).collect();
        let idx_html = 5;
        let idx_ml = 9;
        let reduced: Vec<Vec<bool>> = labels
            .iter()
            .map(|row| vec![row[idx_html], row[idx_ml]])
            .collect();

        let model =
            SkillReadinessModel::train(&x, &reduced, &skills, &LogisticParams::default()).unwrap();
        let frontend = model.predict(&[0.0, 1.0]).unwrap();
        assert_eq!(frontend.len(), 2);
        assert!(frontend[0] > 0.5, "HTML should be likely for frontend");
        assert!(frontend[1] < 0.5, "ML should be unlikely for frontend");
        assert_eq!(model.predict_labels(&[1.0, 1.0]).unwrap(), vec![false, true]);
    }

    #[test]
    fn test_constant_column_names_the_skill() {
        let x = vec![vec![0.0], vec![1.0]];
        let labels = vec![vec![true], vec![true]];
        let skills = vec!["CSS".to_string()];
        let err = SkillReadinessModel::train(&x, &labels, &skills, &LogisticParams::default())
            .unwrap_err();
        assert_eq!(
            err,
            MlError::SingleClass {
                model: "skill-readiness column 'CSS'".to_string()
            }
        );
    }
}
