//! Synthetic résumé / job-description text used to fit the text vectorizer.

use crate::catalog;
use crate::models::profile::LabeledProfile;

/// Résumé-like text rendered from a labeled profile.
pub fn resume_text(row: &LabeledProfile) -> String {
    let p = &row.profile;
    format!(
        "Education: {}. Interest: {}. Skills: {}. Experience: {} years in {}.",
        p.education,
        p.interest,
        p.skills_joined(),
        p.experience_years,
        row.target_role
    )
}

/// One document per row: the résumé text followed by its role's job description.
pub fn build_corpus(rows: &[LabeledProfile]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            format!(
                "{} {}",
                resume_text(row),
                catalog::job_description_for(&row.target_role)
            )
        })
        .collect()
}

/// `(résumé, job description)` pairs, used to report similarity statistics.
pub fn text_pairs(rows: &[LabeledProfile]) -> Vec<(String, String)> {
    rows.iter()
        .map(|row| (resume_text(row), catalog::job_description_for(&row.target_role)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ProfileRecord;

    fn row() -> LabeledProfile {
        LabeledProfile {
            profile: ProfileRecord {
                education: "BSc".to_string(),
                skills: vec!["Python".to_string(), "SQL".to_string()],
                interest: "Data".to_string(),
                experience_years: 2,
            },
            target_role: "Data Analyst".to_string(),
        }
    }

    #[test]
    fn test_resume_text_layout() {
        assert_eq!(
            resume_text(&row()),
            "Education: BSc. Interest: Data. Skills: Python, SQL. Experience: 2 years in Data Analyst."
        );
    }

    #[test]
    fn test_corpus_appends_role_description() {
        let corpus = build_corpus(&[row()]);
        assert!(corpus[0].ends_with("visualization with Power BI."));
        assert!(corpus[0].starts_with("Education: BSc."));
    }
}
