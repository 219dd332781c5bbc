//! Offline training: dataset loading, corpus synthesis, fitting, evaluation.

pub mod corpus;
pub mod dataset;
pub mod evaluation;
pub mod pipeline;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures {
    use crate::catalog::{EDUCATIONS, INTERESTS, ROLES};
    use crate::ml::forest::ForestParams;
    use crate::ml::logistic::LogisticParams;
    use crate::models::profile::{LabeledProfile, ProfileRecord};

    use super::pipeline::PipelineParams;

    /// `per_role` rows for every catalog role. Each row carries the role's
    /// required skills minus one rotating entry; every education and interest
    /// value appears once `per_role >= 6`.
    pub fn rows(per_role: usize) -> Vec<LabeledProfile> {
        let mut out = Vec::with_capacity(per_role * ROLES.len());
        for (r, role) in ROLES.iter().enumerate() {
            for i in 0..per_role {
                let dropped = i % (role.required_skills.len() + 1);
                let skills = role
                    .required_skills
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != dropped)
                    .map(|(_, s)| s.to_string())
                    .collect();
                out.push(LabeledProfile {
                    profile: ProfileRecord {
                        education: EDUCATIONS[(r + i) % EDUCATIONS.len()].to_string(),
                        skills,
                        interest: INTERESTS[(r + i / 2) % INTERESTS.len()].to_string(),
                        experience_years: (i % 6) as u32,
                    },
                    target_role: role.name.to_string(),
                });
            }
        }
        out
    }

    pub fn fast_params() -> PipelineParams {
        PipelineParams {
            forest: ForestParams {
                n_estimators: 15,
                ..ForestParams::default()
            },
            logistic: LogisticParams {
                max_iter: 200,
                ..LogisticParams::default()
            },
            ..PipelineParams::default()
        }
    }
}
