use std::collections::HashSet;

use crate::error::{Result, TreeError};

/// Square, labelled correlation matrix stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
	labels: Vec<String>,
	values: Vec<f64>,
}

impl CorrelationMatrix {
	/// Builds a matrix from labels and `labels.len()²` row-major values.
	pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
		if labels.is_empty() {
			return Err(TreeError::invalid_input("matrix has no labels"));
		}
		let mut seen = HashSet::with_capacity(labels.len());
		for label in &labels {
			if label.is_empty() {
				return Err(TreeError::invalid_input("matrix has an empty label"));
			}
			if !seen.insert(label.as_str()) {
				return Err(TreeError::invalid_input(format!("duplicate label `{label}`")));
			}
		}

		let n = labels.len();
		if values.len() != n * n {
			return Err(TreeError::invalid_input(format!(
				"matrix is not square: {} labels but {} values",
				n,
				values.len()
			)));
		}
		if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
			return Err(TreeError::invalid_input(format!(
				"non-numeric value at ({}, {})",
				labels[pos / n],
				labels[pos % n]
			)));
		}

		Ok(Self { labels, values })
	}

	/// Builds a matrix from nested rows.
	pub fn from_rows<S: Into<String>>(labels: Vec<S>, rows: Vec<Vec<f64>>) -> Result<Self> {
		let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
		if rows.len() != labels.len() {
			return Err(TreeError::invalid_input(format!(
				"matrix has {} labels but {} rows",
				labels.len(),
				rows.len()
			)));
		}
		if let Some(row) = rows.iter().position(|r| r.len() != labels.len()) {
			return Err(TreeError::invalid_input(format!(
				"row {} has {} columns, expected {}",
				row,
				rows[row].len(),
				labels.len()
			)));
		}
		Self::new(labels, rows.into_iter().flatten().collect())
	}

	pub fn labels(&self) -> &[String] {
		&self.labels
	}

	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	pub fn get(&self, row: usize, col: usize) -> f64 {
		self.values[row * self.labels.len() + col]
	}

	pub fn is_symmetric(&self) -> bool {
		let n = self.len();
		(0..n).all(|i| (i + 1..n).all(|j| self.get(i, j) == self.get(j, i)))
	}

	/// Every (row, col, value) cell in row-major order, diagonal included.
	pub fn cells(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
		let n = self.len();
		self.values.iter().enumerate().map(move |(pos, &value)| {
			(self.labels[pos / n].as_str(), self.labels[pos % n].as_str(), value)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_non_square() {
		let err = CorrelationMatrix::new(vec!["A".into(), "B".into()], vec![1.0, 0.5, 0.5]);
		assert!(matches!(err, Err(TreeError::InvalidInput(_))));

		let err = CorrelationMatrix::from_rows(vec!["A", "B"], vec![vec![1.0, 0.5], vec![0.5]]);
		assert!(matches!(err, Err(TreeError::InvalidInput(_))));
	}

	#[test]
	fn rejects_missing_or_duplicate_labels() {
		assert!(CorrelationMatrix::new(vec![], vec![]).is_err());
		assert!(CorrelationMatrix::from_rows(vec!["A", ""], vec![vec![1.0, 0.0]; 2]).is_err());
		assert!(CorrelationMatrix::from_rows(vec!["A", "A"], vec![vec![1.0, 0.0]; 2]).is_err());
	}

	#[test]
	fn rejects_nan() {
		let err = CorrelationMatrix::from_rows(
			vec!["A", "B"],
			vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
		)
		.unwrap_err();
		assert!(err.to_string().contains("(A, B)"));
	}

	#[test]
	fn cells_are_row_major() {
		let m = CorrelationMatrix::from_rows(vec!["A", "B"], vec![vec![1.0, 0.3], vec![0.4, 1.0]])
			.unwrap();
		let cells: Vec<_> = m.cells().collect();
		assert_eq!(
			cells,
			vec![("A", "A", 1.0), ("A", "B", 0.3), ("B", "A", 0.4), ("B", "B", 1.0)]
		);
		assert!(!m.is_symmetric());
	}
}
