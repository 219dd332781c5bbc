//! Label encoders: sorted-order bijections between strings and integer codes.
//!
//! Codes are assigned in lexicographic order of the distinct values seen at fit
//! time, so the same training set always yields the same codes regardless of
//! row order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::MlError;

fn sorted_distinct<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Encoder for a categorical input column (education, interest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    field: String,
    classes: Vec<String>,
}

impl CategoryEncoder {
    /// Fits on the distinct values of one column. Fails on an empty column.
    pub fn fit<'a, I>(field: &str, values: I) -> Result<Self, MlError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes = sorted_distinct(values);
        if classes.is_empty() {
            return Err(MlError::EmptyDataset("category encoder"));
        }
        Ok(Self {
            field: field.to_string(),
            classes,
        })
    }

    pub fn encode(&self, value: &str) -> Result<usize, MlError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| MlError::UnknownCategory {
                field: self.field.clone(),
                value: value.to_string(),
            })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Bidirectional role-name ↔ class-id mapping for the prediction target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetEncoder {
    classes: Vec<String>,
}

impl TargetEncoder {
    pub fn fit<'a, I>(labels: I) -> Result<Self, MlError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes = sorted_distinct(labels);
        if classes.is_empty() {
            return Err(MlError::EmptyDataset("target encoder"));
        }
        Ok(Self { classes })
    }

    pub fn encode_one(&self, label: &str) -> Result<usize, MlError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| MlError::UnknownLabel(label.to_string()))
    }

    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, MlError> {
        labels.iter().map(|l| self.encode_one(l.as_ref())).collect()
    }

    pub fn decode_one(&self, id: usize) -> Result<&str, MlError> {
        self.classes
            .get(id)
            .map(String::as_str)
            .ok_or(MlError::InvalidId {
                id,
                n_classes: self.classes.len(),
            })
    }

    pub fn decode(&self, ids: &[usize]) -> Result<Vec<String>, MlError> {
        ids.iter()
            .map(|id| self.decode_one(*id).map(str::to_string))
            .collect()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes_are_sorted_not_first_seen() {
        let enc = CategoryEncoder::fit("education", ["MBA", "BA", "BSc", "BA"]).unwrap();
        assert_eq!(enc.classes(), &["BA", "BSc", "MBA"]);
        assert_eq!(enc.encode("BA").unwrap(), 0);
        assert_eq!(enc.encode("MBA").unwrap(), 2);
    }

    #[test]
    fn test_category_unknown_value_is_rejected() {
        let enc = CategoryEncoder::fit("interest", ["Data", "Web"]).unwrap();
        let err = enc.encode("Gardening").unwrap_err();
        assert_eq!(
            err,
            MlError::UnknownCategory {
                field: "interest".to_string(),
                value: "Gardening".to_string()
            }
        );
    }

    #[test]
    fn test_category_empty_fit_fails() {
        let empty: Vec<&str> = vec![];
        assert!(matches!(
            CategoryEncoder::fit("education", empty),
            Err(MlError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_target_round_trip() {
        let labels = ["QA Tester", "Data Analyst", "ML Engineer", "Data Analyst"];
        let enc = TargetEncoder::fit(labels).unwrap();
        let ids = enc.encode(&labels[..]).unwrap();
        assert_eq!(ids, vec![2, 0, 1, 0]);
        assert_eq!(enc.decode(&ids).unwrap(), labels);
    }

    #[test]
    fn test_target_unknown_label() {
        let enc = TargetEncoder::fit(["Data Analyst"]).unwrap();
        assert_eq!(
            enc.encode_one("Astronaut").unwrap_err(),
            MlError::UnknownLabel("Astronaut".to_string())
        );
    }

    #[test]
    fn test_target_invalid_id() {
        let enc = TargetEncoder::fit(["Data Analyst", "QA Tester"]).unwrap();
        assert_eq!(
            enc.decode_one(2).unwrap_err(),
            MlError::InvalidId {
                id: 2,
                n_classes: 2
            }
        );
    }
}
