use super::layout::LayoutParams;
use super::spanning::Algorithm;

/// Settings for one matrix-to-tree run.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeConfig {
	/// Correlations at or above this value become edges.
	pub threshold: f64,
	pub algorithm: Algorithm,
	/// Collapse reversed duplicate links into one edge.
	pub filtered: bool,
	/// Sort edges ascending by weight before building the graph.
	pub sorted: bool,
	pub layout: LayoutParams,
}

impl Default for TreeConfig {
	fn default() -> Self {
		Self {
			threshold: 0.0,
			algorithm: Algorithm::Kruskal,
			filtered: true,
			sorted: true,
			layout: LayoutParams::default(),
		}
	}
}
