//! CSV dataset loading.
//!
//! Expected header: `education,skills,interest,experience_years,target_role`,
//! with `skills` a comma-separated list inside one quoted cell.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::{parse_skill_list, LabeledProfile, ProfileRecord};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("dataset is empty")]
    Empty,
}

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    education: String,
    skills: String,
    interest: String,
    experience_years: i64,
    target_role: String,
}

pub fn load_csv(path: &Path) -> Result<Vec<LabeledProfile>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_csv(file)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<LabeledProfile>, DatasetError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (i, record) in csv.deserialize::<Row>().enumerate() {
        let row = record?;
        // header is line 1
        let line = i + 2;
        let experience_years = u32::try_from(row.experience_years).map_err(|_| {
            DatasetError::InvalidRow {
                row: line,
                message: format!("negative experience_years {}", row.experience_years),
            }
        })?;
        if row.target_role.is_empty() {
            return Err(DatasetError::InvalidRow {
                row: line,
                message: "empty target_role".to_string(),
            });
        }
        rows.push(LabeledProfile {
            profile: ProfileRecord {
                education: row.education,
                skills: parse_skill_list(&row.skills),
                interest: row.interest,
                experience_years,
            },
            target_role: row.target_role,
        });
    }
    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(rows)
}

/// Writes rows in the same layout `read_csv` accepts.
pub fn write_csv<W: std::io::Write>(writer: W, rows: &[LabeledProfile]) -> Result<(), DatasetError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(Row {
            education: row.profile.education.clone(),
            skills: row.profile.skills_joined(),
            interest: row.profile.interest.clone(),
            experience_years: i64::from(row.profile.experience_years),
            target_role: row.target_role.clone(),
        })?;
    }
    csv.flush().map_err(|e| DatasetError::Csv(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "education,skills,interest,experience_years,target_role\n\
        BSc,\"Python, SQL, Statistics\",Data,3,Data Analyst\n\
        MBA,\"Communication, Excel\",Business,4,Product Manager\n";

    #[test]
    fn test_reads_rows_and_splits_skills() {
        let rows = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].profile.skills, vec!["Python", "SQL", "Statistics"]);
        assert_eq!(rows[0].profile.experience_years, 3);
        assert_eq!(rows[1].target_role, "Product Manager");
    }

    #[test]
    fn test_negative_experience_is_rejected_with_line_number() {
        let data = "education,skills,interest,experience_years,target_role\n\
            BSc,Python,Data,-1,Data Analyst\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRow { row: 2, .. }));
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = "education,skills,interest,experience_years,target_role\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_non_numeric_experience_is_a_csv_error() {
        let data = "education,skills,interest,experience_years,target_role\n\
            BSc,Python,Data,three,Data Analyst\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(DatasetError::Csv(_))));
    }

    #[test]
    fn test_write_then_read() {
        let rows = read_csv(SAMPLE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows).unwrap();
        assert_eq!(read_csv(buf.as_slice()).unwrap(), rows);
    }
}
