//! Per-column standardization (zero mean, unit variance).

use ndarray::{Array1, Array2, Axis};

use super::ModelError;

#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn column means and population standard deviations.
    /// Constant columns get a scale of 1 so they map to zero.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<(), ModelError> {
        let mean = x.mean_axis(Axis(0)).ok_or(ModelError::EmptyDataset)?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s.is_finite() && s > f64::EPSILON { s } else { 1.0 });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        let (mean, scale) = match (&self.mean, &self.scale) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(ModelError::NotFitted),
        };
        if x.ncols() != mean.len() {
            return Err(ModelError::ShapeMismatch {
                expected: mean.len(),
                actual: x.ncols(),
            });
        }
        Ok((x - mean) / scale)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }
}
