//! Skill-gap policy: pure arithmetic over the catalog's required-skill sets.

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog;
use crate::ml::MlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadinessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ReadinessLevel {
    pub fn from_coverage(coverage: f64) -> Self {
        if coverage >= 0.8 {
            ReadinessLevel::Advanced
        } else if coverage >= 0.5 {
            ReadinessLevel::Intermediate
        } else {
            ReadinessLevel::Beginner
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessLevel::Beginner => "Beginner",
            ReadinessLevel::Intermediate => "Intermediate",
            ReadinessLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    /// Required skills the user lacks, in the role's listed order.
    pub missing_skills: Vec<String>,
    pub readiness_level: ReadinessLevel,
    pub coverage: f64,
}

/// `|current ∩ required| / |required|`, or 0 for an empty requirement set.
pub fn coverage<S: AsRef<str>>(current: &[S], required: &[&str]) -> f64 {
    let required: HashSet<&str> = required.iter().copied().collect();
    if required.is_empty() {
        return 0.0;
    }
    let current: HashSet<&str> = current.iter().map(|s| s.as_ref().trim()).collect();
    current.intersection(&required).count() as f64 / required.len() as f64
}

/// Gap between `current` and an explicit requirement set.
pub fn assess<S: AsRef<str>>(current: &[S], required: &[&str]) -> SkillGap {
    let have: HashSet<&str> = current.iter().map(|s| s.as_ref().trim()).collect();
    let mut seen = HashSet::new();
    let missing_skills = required
        .iter()
        .filter(|skill| !have.contains(**skill) && seen.insert(**skill))
        .map(|skill| skill.to_string())
        .collect();
    let coverage = coverage(current, required);
    SkillGap {
        missing_skills,
        readiness_level: ReadinessLevel::from_coverage(coverage),
        coverage,
    }
}

/// Gap between `current` and a catalog role. Unknown roles are rejected.
pub fn assess_skill_gap<S: AsRef<str>>(current: &[S], target_role: &str) -> Result<SkillGap, MlError> {
    let role = catalog::find_role(target_role)
        .ok_or_else(|| MlError::UnknownRole(target_role.to_string()))?;
    Ok(assess(current, role.required_skills))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_analyst_is_advanced_at_eighty_percent() {
        let gap = assess_skill_gap(&["Excel", "SQL", "Power BI", "Statistics"][..], "Business Analyst")
            .unwrap();
        assert_eq!(gap.missing_skills, vec!["Communication"]);
        assert_eq!(gap.readiness_level, ReadinessLevel::Advanced);
        assert!((gap.coverage - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_no_skills_is_beginner_missing_everything() {
        let none: [&str; 0] = [];
        let gap = assess_skill_gap(&none[..], "Frontend Developer").unwrap();
        assert_eq!(gap.missing_skills, vec!["JavaScript", "HTML", "CSS", "Communication"]);
        assert_eq!(gap.readiness_level, ReadinessLevel::Beginner);
    }

    #[test]
    fn test_intermediate_band() {
        let gap = assess_skill_gap(&["Python", "SQL"][..], "ML Engineer").unwrap();
        assert_eq!(gap.readiness_level, ReadinessLevel::Intermediate);
        assert_eq!(gap.missing_skills, vec!["ML", "Statistics"]);
    }

    #[test]
    fn test_empty_requirement_set_has_zero_coverage() {
        assert_eq!(coverage(&["Python"][..], &[]), 0.0);
        let gap = assess(&["Python"][..], &[]);
        assert!(gap.missing_skills.is_empty());
        assert_eq!(gap.readiness_level, ReadinessLevel::Beginner);
    }

    #[test]
    fn test_current_skills_are_trimmed_and_case_sensitive() {
        assert_eq!(coverage(&[" SQL "][..], &["SQL"]), 1.0);
        assert_eq!(coverage(&["sql"][..], &["SQL"]), 0.0);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = assess_skill_gap(&["Python"][..], "Astronaut").unwrap_err();
        assert_eq!(err, MlError::UnknownRole("Astronaut".to_string()));
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(ReadinessLevel::from_coverage(0.49).as_str(), "Beginner");
        assert_eq!(ReadinessLevel::from_coverage(0.5).as_str(), "Intermediate");
        assert_eq!(ReadinessLevel::from_coverage(1.0).as_str(), "Advanced");
    }
}
