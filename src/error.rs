//! Error type shared by the correlation-tree pipeline.

use thiserror::Error;

/// Errors raised while turning prices or a correlation matrix into a tree.
#[derive(Debug, Error)]
pub enum TreeError {
	/// The matrix or price table is malformed (non-square, non-numeric, missing labels).
	#[error("invalid input: {0}")]
	InvalidInput(String),

	/// An argument is outside the set of accepted values.
	#[error("invalid argument `{arg}`: {reason}")]
	InvalidArgument {
		/// Name of the offending argument.
		arg: &'static str,
		/// What was wrong with it.
		reason: String,
	},

	/// The price CSV could not be read.
	#[error("csv error: {0}")]
	Csv(#[from] csv::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TreeError>;

impl TreeError {
	pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
		Self::InvalidInput(msg.into())
	}
}
