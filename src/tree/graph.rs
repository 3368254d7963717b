use std::collections::HashMap;

/// Attributes carried by a link or edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attributes {
	/// Correlation value, used as the spanning-tree weight.
	pub weight: f64,
}

/// A directed candidate edge taken from one matrix cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub source: String,
	pub target: String,
	pub attrs: Attributes,
}

/// An undirected weighted edge. `source`/`target` keep the orientation it was first seen in.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub source: String,
	pub target: String,
	pub attrs: Attributes,
}

impl Edge {
	pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			attrs: Attributes { weight },
		}
	}

	pub fn weight(&self) -> f64 {
		self.attrs.weight
	}

	/// The endpoints in a canonical order, so `{a, b}` and `{b, a}` compare equal.
	pub fn key(&self) -> (&str, &str) {
		if self.source <= self.target {
			(&self.source, &self.target)
		} else {
			(&self.target, &self.source)
		}
	}

	pub fn connects(&self, a: &str, b: &str) -> bool {
		(self.source == a && self.target == b) || (self.source == b && self.target == a)
	}
}

impl From<Link> for Edge {
	fn from(link: Link) -> Self {
		Self {
			source: link.source,
			target: link.target,
			attrs: link.attrs,
		}
	}
}

/// Undirected, simple, weighted graph.
///
/// Nodes are kept in order of first appearance among edge endpoints, and only
/// enter the graph through an edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<String>,
	index: HashMap<String, usize>,
	edges: Vec<Edge>,
	/// Ordered node-index pair to position in `edges`.
	pairs: HashMap<(usize, usize), usize>,
}

impl Graph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
		let mut graph = Self::new();
		for edge in edges {
			graph.add_edge(edge);
		}
		graph
	}

	/// Adds an edge, registering unseen endpoints. An edge joining an
	/// already-connected pair replaces the old one's attributes.
	pub fn add_edge(&mut self, edge: Edge) {
		let u = self.ensure_node(&edge.source);
		let v = self.ensure_node(&edge.target);
		let pair = (u.min(v), u.max(v));
		match self.pairs.get(&pair) {
			Some(&pos) => self.edges[pos].attrs = edge.attrs,
			None => {
				self.pairs.insert(pair, self.edges.len());
				self.edges.push(edge);
			}
		}
	}

	fn ensure_node(&mut self, label: &str) -> usize {
		if let Some(&idx) = self.index.get(label) {
			return idx;
		}
		let idx = self.nodes.len();
		self.index.insert(label.to_owned(), idx);
		self.nodes.push(label.to_owned());
		idx
	}

	pub fn nodes(&self) -> &[String] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn contains_edge(&self, a: &str, b: &str) -> bool {
		match (self.index.get(a), self.index.get(b)) {
			(Some(&u), Some(&v)) => self.pairs.contains_key(&(u.min(v), u.max(v))),
			_ => false,
		}
	}

	/// Edges touching `label`.
	pub fn incident_edges<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
		self.edges
			.iter()
			.filter(move |e| e.source == label || e.target == label)
	}

	pub fn degree(&self, label: &str) -> usize {
		self.incident_edges(label).count()
	}

	pub fn total_weight(&self) -> f64 {
		self.edges.iter().map(Edge::weight).sum()
	}

	/// Edges as (source index, target index, weight), in edge order.
	pub(crate) fn indexed_edges(&self) -> Vec<(usize, usize, f64)> {
		self.edges
			.iter()
			.map(|e| (self.index[&e.source], self.index[&e.target], e.weight()))
			.collect()
	}

	/// Number of connected components.
	pub fn component_count(&self) -> usize {
		let mut sets = super::spanning::UnionFind::new(self.nodes.len());
		let merged = self
			.indexed_edges()
			.into_iter()
			.filter(|&(u, v, _)| sets.union(u, v))
			.count();
		self.nodes.len() - merged
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nodes_follow_first_appearance() {
		let g = Graph::from_edges([Edge::new("B", "C", 0.2), Edge::new("A", "B", 0.1)]);
		assert_eq!(g.nodes(), ["B", "C", "A"]);
		assert_eq!(g.degree("B"), 2);
	}

	#[test]
	fn reversed_edge_replaces_attributes() {
		let mut g = Graph::from_edges([Edge::new("A", "B", 0.1)]);
		g.add_edge(Edge::new("B", "A", 0.7));
		assert_eq!(g.edge_count(), 1);
		assert_eq!(g.edges()[0].source, "A");
		assert_eq!(g.edges()[0].weight(), 0.7);
	}

	#[test]
	fn dense_graph_keeps_every_pair_once() {
		let n = 400;
		let labels: Vec<String> = (0..n).map(|i| format!("T{i}")).collect();
		let mut g = Graph::new();
		for i in 0..n {
			for j in 0..n {
				if i != j {
					g.add_edge(Edge::new(labels[i].as_str(), labels[j].as_str(), (i * j) as f64));
				}
			}
		}
		assert_eq!(g.node_count(), n);
		assert_eq!(g.edge_count(), n * (n - 1) / 2);
		assert!(g.contains_edge("T399", "T0"));
		assert!(!g.contains_edge("T1", "T1"));
		assert!(!g.contains_edge("T1", "missing"));
		assert_eq!(g.edges()[0].source, "T0");
	}

	#[test]
	fn counts_components() {
		let g = Graph::from_edges([
			Edge::new("A", "B", 0.1),
			Edge::new("C", "D", 0.2),
			Edge::new("B", "E", 0.3),
		]);
		assert_eq!(g.component_count(), 2);
		assert_eq!(Graph::new().component_count(), 0);
	}

	#[test]
	fn edge_key_ignores_orientation() {
		assert_eq!(Edge::new("X", "A", 0.0).key(), Edge::new("A", "X", 1.0).key());
	}
}
