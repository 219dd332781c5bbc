//! Feature encoder: turns raw profiles into fixed-width numeric rows.
//!
//! Layout: `[education_code, interest_code, experience_scaled, skill flags...]`,
//! one flag per vocabulary skill in vocabulary order. Width = 3 + |vocabulary|.
//!
//! The unfitted and fitted states are distinct types: only
//! `FittedFeatureEncoder` can transform, so train/serve skew from an unfitted
//! encoder cannot be expressed. Re-fitting produces a brand-new
//! `FittedFeatureEncoder`; models trained against an older one must be
//! retrained by the caller.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::label::CategoryEncoder;
use super::scaler::StandardScaler;
use super::{FeatureVector, MlError};
use crate::models::profile::ProfileRecord;

/// Number of leading non-skill columns.
pub const BASE_FEATURES: usize = 3;

/// Unfitted encoder: holds only the configured skill vocabulary.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    skill_vocabulary: Vec<String>,
}

/// Fitted encoder state. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedFeatureEncoder {
    education: CategoryEncoder,
    interest: CategoryEncoder,
    experience: StandardScaler,
    skill_vocabulary: Vec<String>,
}

impl FeatureEncoder {
    pub fn new<S: AsRef<str>>(skill_vocabulary: &[S]) -> Self {
        Self {
            skill_vocabulary: skill_vocabulary
                .iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
        }
    }

    /// Learns category codes and experience statistics from training rows only.
    pub fn fit(&self, records: &[ProfileRecord]) -> Result<FittedFeatureEncoder, MlError> {
        if records.is_empty() {
            return Err(MlError::EmptyDataset("feature encoder"));
        }

        let education =
            CategoryEncoder::fit("education", records.iter().map(|r| r.education.as_str()))?;
        let interest =
            CategoryEncoder::fit("interest", records.iter().map(|r| r.interest.as_str()))?;
        let years: Vec<f64> = records.iter().map(|r| r.experience_years as f64).collect();
        let experience = StandardScaler::fit(&years)?;

        Ok(FittedFeatureEncoder {
            education,
            interest,
            experience,
            skill_vocabulary: self.skill_vocabulary.clone(),
        })
    }
}

impl FittedFeatureEncoder {
    /// Reassembles a fitted encoder from independently persisted parts.
    pub fn from_parts(
        education: CategoryEncoder,
        interest: CategoryEncoder,
        experience: StandardScaler,
        skill_vocabulary: Vec<String>,
    ) -> Self {
        Self {
            education,
            interest,
            experience,
            skill_vocabulary,
        }
    }

    pub fn width(&self) -> usize {
        BASE_FEATURES + self.skill_vocabulary.len()
    }

    pub fn transform_one(&self, record: &ProfileRecord) -> Result<FeatureVector, MlError> {
        let mut row = Vec::with_capacity(self.width());
        row.push(self.education.encode(&record.education)? as f64);
        row.push(self.interest.encode(&record.interest)? as f64);
        row.push(self.experience.transform(record.experience_years as f64));
        row.extend(self.skill_flags(&record.skills));
        Ok(row)
    }

    pub fn transform(&self, records: &[ProfileRecord]) -> Result<Vec<FeatureVector>, MlError> {
        records.iter().map(|r| self.transform_one(r)).collect()
    }

    /// Multi-hot block. Unknown skills are dropped; matching is case-sensitive
    /// after trimming.
    fn skill_flags(&self, skills: &[String]) -> Vec<f64> {
        let present: HashSet<&str> = skills.iter().map(|s| s.trim()).collect();
        self.skill_vocabulary
            .iter()
            .map(|skill| if present.contains(skill.as_str()) { 1.0 } else { 0.0 })
            .collect()
    }

    pub fn skill_vocabulary(&self) -> &[String] {
        &self.skill_vocabulary
    }

    pub fn education(&self) -> &CategoryEncoder {
        &self.education
    }

    pub fn interest(&self) -> &CategoryEncoder {
        &self.interest
    }

    pub fn experience(&self) -> &StandardScaler {
        &self.experience
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SKILL_VOCABULARY;

    fn profile(education: &str, skills: &[&str], interest: &str, years: u32) -> ProfileRecord {
        ProfileRecord {
            education: education.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interest: interest.to_string(),
            experience_years: years,
        }
    }

    fn fitted() -> FittedFeatureEncoder {
        let train = vec![
            profile("BSc", &["Python"], "Data", 1),
            profile("BA", &["Excel"], "Business", 3),
            profile("MBA", &[], "AI", 5),
        ];
        FeatureEncoder::new(SKILL_VOCABULARY).fit(&train).unwrap()
    }

    #[test]
    fn test_width_is_three_plus_vocabulary() {
        let enc = fitted();
        assert_eq!(enc.width(), 13);
        let row = enc
            .transform_one(&profile("BA", &["Python", "SQL", "CSS", "ML"], "AI", 0))
            .unwrap();
        assert_eq!(row.len(), 13);
    }

    #[test]
    fn test_column_layout() {
        let enc = fitted();
        let row = enc
            .transform_one(&profile("MBA", &["SQL", "ML"], "Data", 3))
            .unwrap();
        // education sorted: BA, BSc, MBA
        assert_eq!(row[0], 2.0);
        // interest sorted: AI, Business, Data
        assert_eq!(row[1], 2.0);
        // mean of [1,3,5] is 3
        assert_eq!(row[2], 0.0);
        assert_eq!(&row[3..], &[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unknown_and_duplicate_skills_degrade_gracefully() {
        let enc = fitted();
        let row = enc
            .transform_one(&profile(
                "BA",
                &["Python", " Python ", "Rust", "python", "Cobol"],
                "AI",
                1,
            ))
            .unwrap();
        assert_eq!(row.len(), 13);
        let flags: f64 = row[3..].iter().sum();
        assert_eq!(flags, 1.0);
        assert_eq!(row[3], 1.0);
    }

    #[test]
    fn test_unknown_education_is_an_error() {
        let enc = fitted();
        let err = enc
            .transform_one(&profile("PhD", &[], "AI", 1))
            .unwrap_err();
        assert!(matches!(err, MlError::UnknownCategory { ref field, .. } if field == "education"));
    }

    #[test]
    fn test_unknown_interest_is_an_error() {
        let enc = fitted();
        let err = enc
            .transform_one(&profile("BA", &[], "Sales", 1))
            .unwrap_err();
        assert!(matches!(err, MlError::UnknownCategory { ref field, .. } if field == "interest"));
    }

    #[test]
    fn test_transform_is_pure() {
        let enc = fitted();
        let before = enc.clone();
        let p = profile("BSc", &["Python", "HTML"], "Data", 4);
        let a = enc.transform_one(&p).unwrap();
        let b = enc.transform_one(&p).unwrap();
        assert_eq!(a, b);
        assert_eq!(enc, before);
    }

    #[test]
    fn test_fit_on_empty_fails() {
        let err = FeatureEncoder::new(SKILL_VOCABULARY).fit(&[]).unwrap_err();
        assert_eq!(err, MlError::EmptyDataset("feature encoder"));
    }

    #[test]
    fn test_constant_experience_normalizes_to_zero() {
        let train = vec![
            profile("BSc", &[], "Data", 2),
            profile("BA", &[], "AI", 2),
        ];
        let enc = FeatureEncoder::new(SKILL_VOCABULARY).fit(&train).unwrap();
        let row = enc.transform_one(&profile("BA", &[], "AI", 5)).unwrap();
        assert_eq!(row[2], 0.0);
    }

    #[test]
    fn test_refit_starts_from_scratch() {
        let encoder = FeatureEncoder::new(SKILL_VOCABULARY);
        let first = encoder.fit(&[profile("BA", &[], "AI", 1)]).unwrap();
        let second = encoder.fit(&[profile("MBA", &[], "Web", 4)]).unwrap();
        assert_eq!(first.education().classes(), &["BA"]);
        assert_eq!(second.education().classes(), &["MBA"]);
    }
}
