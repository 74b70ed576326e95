//! Coordinate lens: keep the data (or some of its columns) as the projection.

use super::traits::Lens;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2, Axis};

/// Projects each point onto its own coordinates, optionally restricted to a
/// subset of columns.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    columns: Option<Vec<usize>>,
}

impl Identity {
    /// Keep every column.
    pub fn new() -> Self {
        Self { columns: None }
    }

    /// Keep only the given columns, in the given order.
    pub fn with_columns(mut self, columns: Vec<usize>) -> Self {
        self.columns = Some(columns);
        self
    }
}

impl Lens for Identity {
    fn name(&self) -> &str {
        "Identity"
    }

    fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        match &self.columns {
            None => Ok(data.to_owned()),
            Some(columns) => {
                if columns.is_empty() {
                    return Err(Error::InvalidParameter {
                        name: "columns",
                        message: "must select at least one column",
                    });
                }
                if let Some(&bad) = columns.iter().find(|&&c| c >= data.ncols()) {
                    return Err(Error::DimensionMismatch {
                        expected: data.ncols(),
                        found: bad + 1,
                    });
                }
                Ok(data.select(Axis(1), columns))
            }
        }
    }
}
