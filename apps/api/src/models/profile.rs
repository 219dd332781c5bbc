use serde::{Deserialize, Serialize};

/// Raw profile as supplied by a caller or read from the training set.
///
/// `skills` is free-form: entries outside the skill vocabulary are dropped
/// during encoding and duplicates collapse to one flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub education: String,
    pub skills: Vec<String>,
    pub interest: String,
    pub experience_years: u32,
}

/// A training/test row: a profile plus its ground-truth role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledProfile {
    pub profile: ProfileRecord,
    pub target_role: String,
}

impl ProfileRecord {
    /// Skills re-joined the way the dataset stores them (`"Python, SQL"`).
    pub fn skills_joined(&self) -> String {
        self.skills.join(", ")
    }
}

/// Splits a comma-separated skill cell into trimmed, non-empty entries.
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
