//! Correlation matrix to weighted graph.

use std::collections::HashSet;

use log::{debug, info, warn};

use super::graph::{Attributes, Edge, Graph, Link};
use super::matrix::CorrelationMatrix;
use crate::error::{Result, TreeError};

/// Links split by comparing each correlation against a threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkSet {
	/// Links with `weight >= threshold`.
	pub positive: Vec<Link>,
	/// Links with `weight < threshold`. Kept for later use, not fed into the graph.
	pub negative: Vec<Link>,
}

/// Options for [`CorrelationGraphBuilder::edges_from_links`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeOptions {
	/// Collapse `(a, b)` and `(b, a)` into one edge, first orientation wins.
	pub filtered: bool,
	/// Sort ascending by weight (stable).
	pub sorted: bool,
}

impl Default for EdgeOptions {
	fn default() -> Self {
		Self {
			filtered: true,
			sorted: true,
		}
	}
}

/// Turns a correlation matrix into a deduplicated, sorted edge list and a graph.
///
/// The link and edge fields hold the working state of the last call and are
/// overwritten, never appended to.
#[derive(Clone, Debug, Default)]
pub struct CorrelationGraphBuilder {
	threshold: f64,
	options: EdgeOptions,
	links: LinkSet,
	edges: Vec<Edge>,
}

impl CorrelationGraphBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder splitting links at `threshold` and shaping edges with `options`.
	pub fn with_options(threshold: f64, options: EdgeOptions) -> Result<Self> {
		if !threshold.is_finite() {
			return Err(TreeError::InvalidArgument {
				arg: "threshold",
				reason: format!("{threshold} is not a finite number"),
			});
		}
		Ok(Self {
			threshold,
			options,
			..Self::default()
		})
	}

	/// Positive and negative links from the last [`links_from_matrix`](Self::links_from_matrix).
	pub fn links(&self) -> &LinkSet {
		&self.links
	}

	/// Edges from the last [`build_graph`](Self::build_graph).
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Flattens `matrix` row-major into links, drops the diagonal and splits the
	/// rest at `threshold`.
	pub fn links_from_matrix(&mut self, matrix: &CorrelationMatrix, threshold: f64) -> &LinkSet {
		if !matrix.is_symmetric() {
			warn!("correlation matrix is not symmetric, links are classified per ordered pair");
		}

		let mut links = LinkSet::default();
		for (src, trgt, value) in matrix.cells() {
			if src == trgt {
				continue;
			}
			let link = Link {
				source: src.to_owned(),
				target: trgt.to_owned(),
				attrs: Attributes { weight: value },
			};
			if value >= threshold {
				links.positive.push(link);
			} else {
				links.negative.push(link);
			}
		}
		debug!(
			"split {} links at {}: {} positive, {} negative",
			links.positive.len() + links.negative.len(),
			threshold,
			links.positive.len(),
			links.negative.len()
		);

		self.links = links;
		&self.links
	}

	/// Turns links into edges, optionally deduplicating by unordered pair and
	/// sorting by weight.
	pub fn edges_from_links(links: &[Link], options: EdgeOptions) -> Vec<Edge> {
		let mut edges: Vec<Edge> = if options.filtered {
			let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(links.len());
			let mut kept = Vec::with_capacity(links.len() / 2);
			for l in links {
				let (src, trgt) = (l.source.as_str(), l.target.as_str());
				if seen.contains(&(src, trgt)) {
					continue;
				}
				seen.insert((src, trgt));
				seen.insert((trgt, src));
				kept.push(Edge::from(l.clone()));
			}
			kept
		} else {
			links.iter().cloned().map(Edge::from).collect()
		};
		if edges.len() < links.len() {
			debug!("dropped {} duplicate links", links.len() - edges.len());
		}

		if options.sorted {
			edges.sort_by(|a, b| a.weight().total_cmp(&b.weight()));
		}
		edges
	}

	/// Links, then edges from the positive links, then the graph over them.
	pub fn build_graph(&mut self, matrix: &CorrelationMatrix) -> Graph {
		self.links_from_matrix(matrix, self.threshold);
		self.edges = Self::edges_from_links(&self.links.positive, self.options);

		let graph = Graph::from_edges(self.edges.iter().cloned());
		info!(
			"built correlation graph: {} nodes, {} edges",
			graph.node_count(),
			graph.edge_count()
		);
		graph
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn abc() -> CorrelationMatrix {
		CorrelationMatrix::from_rows(
			vec!["A", "B", "C"],
			vec![
				vec![1.0, 0.9, 0.1],
				vec![0.9, 1.0, -0.2],
				vec![0.1, -0.2, 1.0],
			],
		)
		.unwrap()
	}

	fn link(s: &str, t: &str, w: f64) -> Link {
		Link {
			source: s.into(),
			target: t.into(),
			attrs: Attributes { weight: w },
		}
	}

	#[test]
	fn splits_links_at_threshold() {
		let mut builder = CorrelationGraphBuilder::new();
		let links = builder.links_from_matrix(&abc(), 0.0);

		assert_eq!(links.positive.len(), 4);
		assert_eq!(links.negative.len(), 2);
		assert!(links.positive.iter().all(|l| l.source != l.target));
		assert_eq!(links.negative[0], link("B", "C", -0.2));
		assert_eq!(links.negative[1], link("C", "B", -0.2));
	}

	#[test]
	fn threshold_is_inclusive() {
		let mut builder = CorrelationGraphBuilder::new();
		let links = builder.links_from_matrix(&abc(), 0.1);
		assert!(links.positive.contains(&link("A", "C", 0.1)));
	}

	#[test]
	fn repeated_calls_overwrite_links() {
		let mut builder = CorrelationGraphBuilder::new();
		builder.links_from_matrix(&abc(), 0.0);
		builder.links_from_matrix(&abc(), 0.5);
		assert_eq!(builder.links().positive.len(), 2);
		assert_eq!(builder.links().negative.len(), 4);
	}

	#[test]
	fn first_orientation_wins() {
		let links = vec![
			link("B", "A", 0.5),
			link("A", "B", 0.5),
			link("A", "C", 0.3),
			link("C", "A", 0.3),
		];
		let edges = CorrelationGraphBuilder::edges_from_links(
			&links,
			EdgeOptions {
				filtered: true,
				sorted: false,
			},
		);
		assert_eq!(edges, vec![Edge::new("B", "A", 0.5), Edge::new("A", "C", 0.3)]);
	}

	#[test]
	fn unfiltered_keeps_both_orientations() {
		let links = vec![link("A", "B", 0.5), link("B", "A", 0.5)];
		let edges = CorrelationGraphBuilder::edges_from_links(
			&links,
			EdgeOptions {
				filtered: false,
				sorted: true,
			},
		);
		assert_eq!(edges.len(), 2);
	}

	#[test]
	fn sorting_is_stable() {
		let links = vec![link("A", "B", 0.5), link("C", "D", 0.1), link("E", "F", 0.5)];
		let edges = CorrelationGraphBuilder::edges_from_links(&links, EdgeOptions::default());
		let order: Vec<_> = edges.iter().map(|e| e.source.as_str()).collect();
		assert_eq!(order, ["C", "A", "E"]);
	}

	#[test]
	fn graph_uses_positive_links_only() {
		let mut builder = CorrelationGraphBuilder::new();
		let graph = builder.build_graph(&abc());
		assert_eq!(graph.edge_count(), 2);
		assert!(!graph.contains_edge("B", "C"));
		assert_eq!(builder.edges()[0], Edge::new("A", "C", 0.1));
	}

	#[test]
	fn rejects_nan_threshold() {
		let err = CorrelationGraphBuilder::with_options(f64::NAN, EdgeOptions::default());
		assert!(matches!(err, Err(TreeError::InvalidArgument { arg: "threshold", .. })));
	}
}
