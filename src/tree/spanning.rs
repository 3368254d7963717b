//! Minimum spanning forests over a [`Graph`].
//!
//! All three algorithms minimize the raw `weight` attribute. Ties between
//! equal weights are implementation-defined: Kruskal and Prim prefer the edge
//! that comes first in [`Graph::edges`], Borůvka breaks ties by the same edge
//! position so that it never closes a cycle.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use log::{debug, info};

use super::builder::{CorrelationGraphBuilder, EdgeOptions};
use super::config::TreeConfig;
use super::graph::{Edge, Graph};
use super::layout::{Layout, compute_layout};
use super::matrix::CorrelationMatrix;
use crate::error::{Result, TreeError};

/// Classical MST algorithm to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
	#[default]
	Kruskal,
	Prim,
	Boruvka,
}

impl Algorithm {
	pub const ALL: [Algorithm; 3] = [Algorithm::Kruskal, Algorithm::Prim, Algorithm::Boruvka];

	pub fn name(self) -> &'static str {
		match self {
			Algorithm::Kruskal => "kruskal",
			Algorithm::Prim => "prim",
			Algorithm::Boruvka => "boruvka",
		}
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Algorithm {
	type Err = TreeError;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"kruskal" => Ok(Algorithm::Kruskal),
			"prim" => Ok(Algorithm::Prim),
			"boruvka" | "borůvka" => Ok(Algorithm::Boruvka),
			other => Err(TreeError::InvalidArgument {
				arg: "algorithm",
				reason: format!("`{other}` is not one of kruskal, prim, boruvka"),
			}),
		}
	}
}

/// Disjoint sets with path compression and union by rank.
pub(crate) struct UnionFind {
	parent: Vec<usize>,
	rank: Vec<u8>,
}

impl UnionFind {
	pub(crate) fn new(n: usize) -> Self {
		Self {
			parent: (0..n).collect(),
			rank: vec![0; n],
		}
	}

	pub(crate) fn find(&mut self, x: usize) -> usize {
		let mut root = x;
		while self.parent[root] != root {
			root = self.parent[root];
		}
		let mut cur = x;
		while self.parent[cur] != root {
			let next = self.parent[cur];
			self.parent[cur] = root;
			cur = next;
		}
		root
	}

	/// Merges the sets of `x` and `y`; false if they were already one set.
	pub(crate) fn union(&mut self, x: usize, y: usize) -> bool {
		let (rx, ry) = (self.find(x), self.find(y));
		if rx == ry {
			return false;
		}
		match self.rank[rx].cmp(&self.rank[ry]) {
			Ordering::Less => self.parent[rx] = ry,
			Ordering::Greater => self.parent[ry] = rx,
			Ordering::Equal => {
				self.parent[ry] = rx;
				self.rank[rx] += 1;
			}
		}
		true
	}
}

/// Heap/comparison key: weight first, then edge position.
#[derive(Clone, Copy, Debug)]
struct EdgeKey {
	weight: f64,
	edge: usize,
}

impl PartialEq for EdgeKey {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for EdgeKey {}

impl PartialOrd for EdgeKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for EdgeKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.weight
			.total_cmp(&other.weight)
			.then(self.edge.cmp(&other.edge))
	}
}

type IndexedEdge = (usize, usize, f64);

fn kruskal(n: usize, edges: &[IndexedEdge]) -> Vec<usize> {
	let mut order: Vec<usize> = (0..edges.len()).collect();
	order.sort_by(|&a, &b| edges[a].2.total_cmp(&edges[b].2));

	let mut sets = UnionFind::new(n);
	let mut chosen = Vec::with_capacity(n.saturating_sub(1));
	for e in order {
		let (u, v, _) = edges[e];
		if sets.union(u, v) {
			chosen.push(e);
			if chosen.len() + 1 == n {
				break;
			}
		}
	}
	chosen
}

fn prim(n: usize, edges: &[IndexedEdge]) -> Vec<usize> {
	let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
	for (e, &(u, v, _)) in edges.iter().enumerate() {
		adjacency[u].push((v, e));
		adjacency[v].push((u, e));
	}

	let push_from = |node: usize,
	                 frontier: &mut BinaryHeap<Reverse<(EdgeKey, usize)>>,
	                 visited: &[bool]| {
		for &(next, e) in &adjacency[node] {
			if !visited[next] {
				let key = EdgeKey {
					weight: edges[e].2,
					edge: e,
				};
				frontier.push(Reverse((key, next)));
			}
		}
	};

	let mut visited = vec![false; n];
	let mut chosen = Vec::with_capacity(n.saturating_sub(1));
	let mut frontier = BinaryHeap::new();

	for start in 0..n {
		if visited[start] {
			continue;
		}
		visited[start] = true;
		push_from(start, &mut frontier, &visited);

		while let Some(Reverse((key, node))) = frontier.pop() {
			if visited[node] {
				continue;
			}
			visited[node] = true;
			chosen.push(key.edge);
			push_from(node, &mut frontier, &visited);
		}
	}
	chosen
}

fn boruvka(n: usize, edges: &[IndexedEdge]) -> Vec<usize> {
	let mut sets = UnionFind::new(n);
	let mut chosen = Vec::with_capacity(n.saturating_sub(1));

	loop {
		let mut cheapest: Vec<Option<EdgeKey>> = vec![None; n];
		for (e, &(u, v, weight)) in edges.iter().enumerate() {
			let (ru, rv) = (sets.find(u), sets.find(v));
			if ru == rv {
				continue;
			}
			let key = EdgeKey { weight, edge: e };
			for root in [ru, rv] {
				if cheapest[root].is_none_or(|best| key < best) {
					cheapest[root] = Some(key);
				}
			}
		}

		let mut merged = false;
		for key in cheapest.into_iter().flatten() {
			let (u, v, _) = edges[key.edge];
			if sets.union(u, v) {
				chosen.push(key.edge);
				merged = true;
			}
		}
		if !merged {
			break;
		}
	}
	chosen
}

/// Minimum spanning forest of `graph`: one tree per connected component.
///
/// An empty graph yields an empty graph.
pub fn minimum_spanning_tree(graph: &Graph, algorithm: Algorithm) -> Graph {
	let indexed = graph.indexed_edges();
	let n = graph.node_count();
	let chosen = match algorithm {
		Algorithm::Kruskal => kruskal(n, &indexed),
		Algorithm::Prim => prim(n, &indexed),
		Algorithm::Boruvka => boruvka(n, &indexed),
	};
	Graph::from_edges(chosen.into_iter().map(|e| graph.edges()[e].clone()))
}

/// Computes spanning trees and layouts, keeping the last run's results.
#[derive(Clone, Debug, Default)]
pub struct SpanningTreeComputer {
	config: TreeConfig,
	builder: CorrelationGraphBuilder,
	layout: Layout,
	path: Vec<Edge>,
}

impl SpanningTreeComputer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: TreeConfig) -> Result<Self> {
		let builder = CorrelationGraphBuilder::with_options(
			config.threshold,
			EdgeOptions {
				filtered: config.filtered,
				sorted: config.sorted,
			},
		)?;
		Ok(Self {
			config,
			builder,
			..Self::default()
		})
	}

	/// The graph builder, holding the links and edges of the last [`build`](Self::build).
	pub fn builder(&self) -> &CorrelationGraphBuilder {
		&self.builder
	}

	/// Node positions from the last [`compute_layout`](Self::compute_layout).
	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	/// Spanning edges chosen by the last [`minimum_spanning_tree`](Self::minimum_spanning_tree).
	pub fn path(&self) -> &[Edge] {
		&self.path
	}

	pub fn compute_layout(&mut self, graph: &Graph) -> &Layout {
		self.layout = compute_layout(graph, &self.config.layout);
		&self.layout
	}

	pub fn minimum_spanning_tree(&mut self, graph: &Graph, algorithm: Algorithm) -> Graph {
		let tree = minimum_spanning_tree(graph, algorithm);
		info!(
			"{} spanning forest: {} nodes, {} edges, total weight {:.4}",
			algorithm,
			tree.node_count(),
			tree.edge_count(),
			tree.total_weight()
		);
		for edge in tree.edges() {
			debug!("  {} -- {} ({:.4})", edge.source, edge.target, edge.weight());
		}
		self.path = tree.edges().to_vec();
		tree
	}

	/// Matrix to graph to spanning forest. The layout is computed for the
	/// returned forest, which covers every node of the graph.
	pub fn build(&mut self, matrix: &CorrelationMatrix) -> Graph {
		let graph = self.builder.build_graph(matrix);
		let tree = self.minimum_spanning_tree(&graph, self.config.algorithm);
		self.compute_layout(&tree);
		tree
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::LayoutParams;

	fn abc() -> Graph {
		Graph::from_edges([
			Edge::new("A", "C", 0.1),
			Edge::new("B", "C", 0.2),
			Edge::new("A", "B", 0.9),
		])
	}

	#[test]
	fn parses_algorithm_names() {
		assert_eq!("kruskal".parse::<Algorithm>().unwrap(), Algorithm::Kruskal);
		assert_eq!(" Prim ".parse::<Algorithm>().unwrap(), Algorithm::Prim);
		assert_eq!("boruvka".parse::<Algorithm>().unwrap(), Algorithm::Boruvka);
		let err = "dijkstra".parse::<Algorithm>().unwrap_err();
		assert!(matches!(err, TreeError::InvalidArgument { arg: "algorithm", .. }));
	}

	#[test]
	fn every_algorithm_drops_heaviest_triangle_edge() {
		for algorithm in Algorithm::ALL {
			let tree = minimum_spanning_tree(&abc(), algorithm);
			assert_eq!(tree.edge_count(), 2, "{algorithm}");
			assert!(!tree.contains_edge("A", "B"), "{algorithm}");
			assert!((tree.total_weight() - 0.3).abs() < 1e-12);
		}
	}

	#[test]
	fn empty_graph_gives_empty_tree() {
		for algorithm in Algorithm::ALL {
			let tree = minimum_spanning_tree(&Graph::new(), algorithm);
			assert!(tree.is_empty());
			assert_eq!(tree.edge_count(), 0);
		}
	}

	#[test]
	fn disconnected_graph_gives_forest() {
		let graph = Graph::from_edges([
			Edge::new("A", "B", 0.3),
			Edge::new("B", "C", 0.1),
			Edge::new("A", "C", 0.2),
			Edge::new("X", "Y", 0.5),
		]);
		for algorithm in Algorithm::ALL {
			let tree = minimum_spanning_tree(&graph, algorithm);
			assert_eq!(tree.node_count(), 5);
			assert_eq!(tree.edge_count(), 3);
			assert_eq!(tree.component_count(), 2);
			assert!(tree.contains_edge("X", "Y"));
		}
	}

	#[test]
	fn boruvka_handles_equal_weights() {
		let graph = Graph::from_edges([
			Edge::new("A", "B", 0.5),
			Edge::new("B", "C", 0.5),
			Edge::new("C", "A", 0.5),
			Edge::new("C", "D", 0.5),
		]);
		let tree = minimum_spanning_tree(&graph, Algorithm::Boruvka);
		assert_eq!(tree.edge_count(), 3);
		assert_eq!(tree.component_count(), 1);
	}

	#[test]
	fn computer_keeps_last_path() {
		let mut computer = SpanningTreeComputer::new();
		computer.minimum_spanning_tree(&abc(), Algorithm::Prim);
		assert_eq!(computer.path().len(), 2);
		computer.minimum_spanning_tree(&Graph::new(), Algorithm::Prim);
		assert!(computer.path().is_empty());
	}

	#[test]
	fn build_lays_out_the_returned_tree() {
		let matrix = CorrelationMatrix::from_rows(
			vec!["A", "B", "C"],
			vec![
				vec![1.0, 0.9, 0.1],
				vec![0.9, 1.0, 0.2],
				vec![0.1, 0.2, 1.0],
			],
		)
		.unwrap();
		let mut computer = SpanningTreeComputer::new();
		let tree = computer.build(&matrix);
		assert_eq!(
			computer.layout(),
			&compute_layout(&tree, &LayoutParams::default())
		);
	}

	#[test]
	fn union_find_merges_once() {
		let mut sets = UnionFind::new(3);
		assert!(sets.union(0, 1));
		assert!(!sets.union(1, 0));
		assert_eq!(sets.find(0), sets.find(1));
		assert_ne!(sets.find(2), sets.find(0));
	}
}
