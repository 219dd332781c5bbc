//! Catalog: the single shared table of enumerations, skills, and roles.
//!
//! Training, evaluation, and inference all read from here. Nothing else in the
//! crate may hold its own copy of the role → skill table or the job-description
//! templates.

use serde::Serialize;

/// Accepted education values at the inference boundary.
pub const EDUCATIONS: &[&str] = &["BCA", "BBA", "BA", "BSc", "BCom", "MBA"];

/// Accepted interest values at the inference boundary.
pub const INTERESTS: &[&str] = &["Data", "Web", "Business", "AI", "Teaching", "Sales"];

/// Fixed skill vocabulary. Column order of the multi-hot block follows this slice.
pub const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "SQL",
    "Excel",
    "Power BI",
    "JavaScript",
    "HTML",
    "CSS",
    "Communication",
    "Statistics",
    "ML",
];

/// Inclusive bounds for `experience_years` at the inference boundary.
pub const MIN_EXPERIENCE_YEARS: u32 = 0;
pub const MAX_EXPERIENCE_YEARS: u32 = 5;

/// A known career role with its requirement profile.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoleProfile {
    pub name: &'static str,
    pub required_skills: &'static [&'static str],
    pub job_description: &'static str,
}

pub const ROLES: &[RoleProfile] = &[
    RoleProfile {
        name: "Data Analyst",
        required_skills: &["Python", "SQL", "Excel", "Power BI", "Statistics"],
        job_description: "Looking for a Data Analyst with Python, SQL, Excel, and Statistics skills. \
            Experience in data analysis and visualization with Power BI.",
    },
    RoleProfile {
        name: "Business Analyst",
        required_skills: &["Excel", "SQL", "Power BI", "Communication", "Statistics"],
        job_description: "Seeking Business Analyst with Excel, SQL, Communication skills. \
            Experience in business intelligence and reporting.",
    },
    RoleProfile {
        name: "Frontend Developer",
        required_skills: &["JavaScript", "HTML", "CSS", "Communication"],
        job_description: "Frontend Developer position requiring HTML, CSS, JavaScript skills. \
            Experience in web development and UI/UX.",
    },
    RoleProfile {
        name: "Backend Developer",
        required_skills: &["Python", "JavaScript", "SQL"],
        job_description: "Backend Developer needed with Python or JavaScript, SQL skills. \
            Experience in server-side development and APIs.",
    },
    RoleProfile {
        name: "ML Engineer",
        required_skills: &["Python", "ML", "Statistics", "SQL"],
        job_description: "Machine Learning Engineer position requiring Python, ML, Statistics skills. \
            Experience in machine learning models and algorithms.",
    },
    RoleProfile {
        name: "QA Tester",
        required_skills: &["JavaScript", "Python", "Communication"],
        job_description: "QA Tester position requiring JavaScript or Python skills. \
            Experience in testing and quality assurance.",
    },
    RoleProfile {
        name: "Product Manager",
        required_skills: &["Communication", "Excel", "Statistics"],
        job_description: "Product Manager role requiring Communication, Excel, Statistics skills. \
            Experience in product management and analytics.",
    },
];

/// Looks up a role by exact name.
pub fn find_role(name: &str) -> Option<&'static RoleProfile> {
    ROLES.iter().find(|r| r.name == name)
}

/// Names of all known roles, in catalog order.
pub fn role_names() -> Vec<&'static str> {
    ROLES.iter().map(|r| r.name).collect()
}

/// Job-description text for a role. Unknown roles get a generic template.
pub fn job_description_for(role: &str) -> String {
    match find_role(role) {
        Some(profile) => profile.job_description.to_string(),
        None => format!("{role} position requiring relevant skills."),
    }
}

pub fn is_valid_education(value: &str) -> bool {
    EDUCATIONS.contains(&value)
}

pub fn is_valid_interest(value: &str) -> bool {
    INTERESTS.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_seven_roles() {
        assert_eq!(ROLES.len(), 7);
    }

    #[test]
    fn test_required_skills_are_in_vocabulary() {
        for role in ROLES {
            assert!(
                (3..=5).contains(&role.required_skills.len()),
                "{} has {} skills",
                role.name,
                role.required_skills.len()
            );
            for skill in role.required_skills {
                assert!(SKILL_VOCABULARY.contains(skill), "{skill} not in vocabulary");
            }
        }
    }

    #[test]
    fn test_find_role_is_exact_match() {
        assert!(find_role("Business Analyst").is_some());
        assert!(find_role("business analyst").is_none());
    }

    #[test]
    fn test_unknown_role_gets_generic_description() {
        assert_eq!(
            job_description_for("Astronaut"),
            "Astronaut position requiring relevant skills."
        );
    }
}
