use serde::{Deserialize, Serialize};

use super::MlError;

/// Standardizes a single numeric column with population mean and stddev.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: f64,
    stddev: f64,
}

impl StandardScaler {
    pub fn fit(values: &[f64]) -> Result<Self, MlError> {
        if values.is_empty() {
            return Err(MlError::EmptyDataset("standard scaler"));
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Ok(Self {
            mean,
            stddev: variance.sqrt(),
        })
    }

    /// `(value - mean) / stddev`, or 0 for every input when the column was constant.
    pub fn transform(&self, value: f64) -> f64 {
        if self.stddev == 0.0 {
            return 0.0;
        }
        (value - self.mean) / self.stddev
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn stddev(&self) -> f64 {
        self.stddev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_statistics() {
        let scaler = StandardScaler::fit(&[1.0, 3.0]).unwrap();
        assert_eq!(scaler.mean(), 2.0);
        // population stddev, not sample
        assert_eq!(scaler.stddev(), 1.0);
        assert_eq!(scaler.transform(3.0), 1.0);
        assert_eq!(scaler.transform(0.0), -2.0);
    }

    #[test]
    fn test_zero_stddev_maps_everything_to_zero() {
        let scaler = StandardScaler::fit(&[2.0, 2.0, 2.0]).unwrap();
        assert_eq!(scaler.transform(2.0), 0.0);
        assert_eq!(scaler.transform(5.0), 0.0);
    }

    #[test]
    fn test_empty_fit_fails() {
        assert_eq!(
            StandardScaler::fit(&[]).unwrap_err(),
            MlError::EmptyDataset("standard scaler")
        );
    }
}
