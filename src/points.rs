//! Validated point clouds.
//!
//! A point is identified by its row index. The matrix is never mutated after
//! construction; every stage of the pipeline reads it by view.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};

/// An `n x d` matrix of finite values, optionally carrying one name per row.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    data: Array2<f64>,
    sample_names: Option<Vec<String>>,
}

impl PointCloud {
    /// Wrap a matrix.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] for a matrix without rows or columns, and
    /// [`Error::InvalidInput`] if any entry is NaN or infinite.
    pub fn new(data: Array2<f64>) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(Error::EmptyInput);
        }
        if let Some(((row, col), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "non-finite value at row {row}, column {col}"
            )));
        }
        Ok(Self {
            data,
            sample_names: None,
        })
    }

    /// Build from row vectors, all of the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }
        let d = rows[0].len();
        let mut flat = Vec::with_capacity(rows.len() * d);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != d {
                return Err(Error::InvalidInput(format!(
                    "row {i} has {} columns, expected {d}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        let data = Array2::from_shape_vec((rows.len(), d), flat)
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        Self::new(data)
    }

    /// Attach row labels.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] unless there is exactly one name per row.
    pub fn with_sample_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.data.nrows() {
            return Err(Error::InvalidInput(format!(
                "{} sample names for {} rows",
                names.len(),
                self.data.nrows()
            )));
        }
        self.sample_names = Some(names);
        Ok(self)
    }

    /// Number of points (rows).
    pub fn n_points(&self) -> usize {
        self.data.nrows()
    }

    /// Number of features (columns).
    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }

    /// Borrow the matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Row labels, if any were attached.
    pub fn sample_names(&self) -> Option<&[String]> {
        self.sample_names.as_deref()
    }

    /// Row labels, falling back to the 0-based row range.
    pub fn resolved_sample_names(&self) -> Vec<String> {
        match &self.sample_names {
            Some(names) => names.clone(),
            None => (0..self.data.nrows()).map(|i| i.to_string()).collect(),
        }
    }

    /// Consume and return the matrix.
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

impl TryFrom<Array2<f64>> for PointCloud {
    type Error = Error;

    fn try_from(data: Array2<f64>) -> Result<Self> {
        Self::new(data)
    }
}

impl TryFrom<Vec<Vec<f64>>> for PointCloud {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl TryFrom<&[Vec<f64>]> for PointCloud {
    type Error = Error;

    fn try_from(rows: &[Vec<f64>]) -> Result<Self> {
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ndarray::array;

    #[test]
    fn test_from_rows() {
        let cloud = PointCloud::from_rows(&[vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
        assert_eq!(cloud.n_points(), 2);
        assert_eq!(cloud.n_features(), 2);
        assert_eq!(cloud.view()[[1, 0]], 2.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = PointCloud::from_rows(&[vec![0.0, 1.0], vec![2.0]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_empty_rejected() {
        let rows: Vec<Vec<f64>> = vec![];
        assert_eq!(PointCloud::try_from(rows), Err(Error::EmptyInput));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = PointCloud::new(array![[0.0, f64::NAN]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_sample_names() {
        let cloud = PointCloud::new(array![[0.0], [1.0], [2.0]]).unwrap();
        assert_eq!(cloud.resolved_sample_names(), vec!["0", "1", "2"]);

        let named = cloud.clone().with_sample_names(["a", "b", "c"]).unwrap();
        assert_eq!(named.resolved_sample_names(), vec!["a", "b", "c"]);

        assert!(cloud.with_sample_names(["a"]).is_err());
    }
}
