use serde::Serialize;

use crate::ml::text::{cosine_similarity, match_percentage, TfidfVectorizer};

/// Job-description terms considered when looking for gaps.
pub const KEYWORD_CANDIDATES: usize = 20;
/// Maximum missing keywords reported.
pub const KEYWORD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeMatch {
    /// Cosine similarity × 100, two decimals.
    pub match_percentage: f64,
    pub missing_keywords: Vec<String>,
}

pub fn match_resume(vectorizer: &TfidfVectorizer, resume_text: &str, job_description: &str) -> ResumeMatch {
    let resume = vectorizer.transform(resume_text);
    let job = vectorizer.transform(job_description);
    ResumeMatch {
        match_percentage: match_percentage(cosine_similarity(&resume, &job)),
        missing_keywords: vectorizer.missing_keywords(&resume, &job, KEYWORD_CANDIDATES, KEYWORD_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ROLES;
    use crate::ml::text::TfidfParams;

    fn vectorizer() -> TfidfVectorizer {
        let corpus: Vec<String> = ROLES
            .iter()
            .flat_map(|r| {
                [
                    format!("Skills: {}. {}", r.required_skills.join(", "), r.job_description),
                    r.job_description.to_string(),
                ]
            })
            .collect();
        TfidfVectorizer::fit(&corpus, TfidfParams::default()).unwrap()
    }

    #[test]
    fn test_identical_text_is_full_match() {
        let v = vectorizer();
        let jd = ROLES[0].job_description;
        let m = match_resume(&v, jd, jd);
        assert_eq!(m.match_percentage, 100.0);
        assert!(m.missing_keywords.is_empty());
    }

    #[test]
    fn test_partial_match_reports_gaps() {
        let v = vectorizer();
        let m = match_resume(&v, "I know Python.", ROLES[0].job_description);
        assert!(m.match_percentage > 0.0 && m.match_percentage < 100.0);
        assert!(!m.missing_keywords.is_empty());
        assert!(m.missing_keywords.len() <= KEYWORD_LIMIT);
        assert!(!m.missing_keywords.contains(&"python".to_string()));
    }

    #[test]
    fn test_unrelated_resume_scores_zero() {
        let v = vectorizer();
        let m = match_resume(&v, "zzz qqq", ROLES[2].job_description);
        assert_eq!(m.match_percentage, 0.0);
    }
}
