//! Axum route handlers for the classical-ML inference API.
//!
//! Boundary validation lives here: education, interest and experience range
//! are checked against the catalog before anything reaches the encoder.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::resume_match::ResumeMatch;
use super::skill_gap::{assess_skill_gap, ReadinessLevel};
use super::CareerOutcome;
use crate::catalog::{self, MAX_EXPERIENCE_YEARS, MIN_EXPERIENCE_YEARS};
use crate::errors::AppError;
use crate::ml::skill_readiness::SkillProbability;
use crate::models::profile::ProfileRecord;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub education: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub interest: String,
    /// Signed so out-of-range values are a validation error, not a decode error.
    pub experience_years: i64,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    #[serde(default)]
    pub current_skills: Vec<String>,
    pub target_role: String,
}

#[derive(Debug, Serialize)]
pub struct SkillGapResponse {
    pub missing_skills: Vec<String>,
    pub readiness_level: ReadinessLevel,
    pub coverage: f64,
}

#[derive(Debug, Deserialize)]
pub struct ResumeMatchRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct SkillReadinessResponse {
    pub skills: Vec<SkillProbability>,
}

impl ProfileRequest {
    /// Rejects values outside the accepted enumerations and range.
    pub fn validate(self) -> Result<ProfileRecord, AppError> {
        if !catalog::is_valid_education(&self.education) {
            return Err(AppError::Validation(format!(
                "Invalid education. Must be one of {:?}",
                catalog::EDUCATIONS
            )));
        }
        if !catalog::is_valid_interest(&self.interest) {
            return Err(AppError::Validation(format!(
                "Invalid interest. Must be one of {:?}",
                catalog::INTERESTS
            )));
        }
        let years = u32::try_from(self.experience_years)
            .ok()
            .filter(|y| (MIN_EXPERIENCE_YEARS..=MAX_EXPERIENCE_YEARS).contains(y))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "experience_years must be between {MIN_EXPERIENCE_YEARS} and {MAX_EXPERIENCE_YEARS}"
                ))
            })?;
        Ok(ProfileRecord {
            education: self.education,
            skills: self.skills,
            interest: self.interest,
            experience_years: years,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /predict-career
pub async fn handle_predict_career(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<CareerOutcome>, AppError> {
    let bundle = state.bundle()?;
    let profile = request.validate()?;
    Ok(Json(bundle.predict_career(&profile)?))
}

/// POST /skill-readiness
pub async fn handle_skill_readiness(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<SkillReadinessResponse>, AppError> {
    let bundle = state.bundle()?;
    let profile = request.validate()?;
    Ok(Json(SkillReadinessResponse {
        skills: bundle.skill_readiness(&profile)?,
    }))
}

/// POST /skill-gap
///
/// Pure catalog arithmetic; answers even when no model bundle is loaded.
pub async fn handle_skill_gap(
    Json(request): Json<SkillGapRequest>,
) -> Result<Json<SkillGapResponse>, AppError> {
    let gap = assess_skill_gap(&request.current_skills[..], &request.target_role).map_err(|_| {
        AppError::Validation(format!(
            "Invalid target_role. Must be one of {:?}",
            catalog::role_names()
        ))
    })?;
    Ok(Json(SkillGapResponse {
        missing_skills: gap.missing_skills,
        readiness_level: gap.readiness_level,
        coverage: gap.coverage,
    }))
}

/// POST /resume-match
pub async fn handle_resume_match(
    State(state): State<AppState>,
    Json(request): Json<ResumeMatchRequest>,
) -> Result<Json<ResumeMatch>, AppError> {
    let bundle = state.bundle()?;
    // A blank resume is a valid query: it scores 0 and lists the job's keywords.
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(Json(
        bundle.match_resume(&request.resume_text, &request.job_description),
    ))
}
