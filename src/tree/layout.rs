//! Force-directed node placement.

use std::collections::HashMap;
use std::f32::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::graph::Graph;

/// A node position in layout space, centred on the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// One position per graph node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	positions: HashMap<String, Point>,
}

impl Layout {
	pub fn get(&self, label: &str) -> Option<Point> {
		self.positions.get(label).copied()
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}
}

/// Simulation settings for [`compute_layout`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub node_mass: f32,
	/// Radius of the circle nodes start on.
	pub radius: f32,
	/// Simulation steps to run.
	pub iterations: usize,
	/// Seconds advanced per step.
	pub time_step: f32,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
			radius: 100.0,
			iterations: 300,
			time_step: 0.016,
		}
	}
}

impl LayoutParams {
	pub fn simulation(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Start position of node `i` of `n`: evenly spaced on a circle.
pub fn seed_position(i: usize, n: usize, radius: f32) -> (f32, f32) {
	let angle = (i as f32) * 2.0 * PI / n.max(1) as f32;
	(radius * angle.cos(), radius * angle.sin())
}

/// Runs the spring/charge simulation from a circular start and returns the
/// settled positions. Deterministic for a given graph and params.
pub fn compute_layout(graph: &Graph, params: &LayoutParams) -> Layout {
	let n = graph.node_count();
	let mut sim: ForceGraph<usize, ()> = ForceGraph::new(params.simulation());

	let idx: Vec<_> = (0..n)
		.map(|i| {
			let (x, y) = seed_position(i, n, params.radius);
			sim.add_node(NodeData {
				x,
				y,
				mass: params.node_mass,
				is_anchor: false,
				user_data: i,
			})
		})
		.collect();
	for (u, v, _) in graph.indexed_edges() {
		sim.add_edge(idx[u], idx[v], EdgeData::default());
	}

	for _ in 0..params.iterations {
		sim.update(params.time_step);
	}
	debug!("layout settled after {} steps for {} nodes", params.iterations, n);

	let mut positions = HashMap::with_capacity(n);
	sim.visit_nodes(|node| {
		positions.insert(
			graph.nodes()[node.data.user_data].clone(),
			Point {
				x: node.x() as f64,
				y: node.y() as f64,
			},
		);
	});
	Layout { positions }
}
