use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::types::{NodeSelection, TreeData};
use crate::tree::LayoutParams;

/// Fill colours by degree: leaves first, hubs last.
const DEGREE_COLORS: &[&str] = &["#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c"];

pub const NODE_RADIUS: f64 = 6.0;
pub const HIT_RADIUS: f64 = 12.0;
pub const MIN_EDGE_WIDTH: f64 = 1.0;
pub const MAX_EDGE_WIDTH: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub degree: usize,
	pub color: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// A weighted tree edge between two simulation nodes.
#[derive(Clone, Copy, Debug)]
pub struct TreeEdge {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub weight: f64,
}

pub struct TreeGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub data: TreeData,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	edges: Vec<TreeEdge>,
	weight_range: (f64, f64),
}

pub fn degree_color(degree: usize) -> &'static str {
	DEGREE_COLORS[degree.saturating_sub(1).min(DEGREE_COLORS.len() - 1)]
}

impl TreeGraphState {
	/// Seeds the live simulation with the precomputed layout, so the tree
	/// starts settled and keeps relaxing as nodes are dragged.
	pub fn new(data: &TreeData, width: f64, height: f64) -> Self {
		let params = LayoutParams::default();
		let mut graph = ForceGraph::new(params.simulation());
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		for node in &data.nodes {
			let idx = graph.add_node(NodeData {
				x: node.x as f32,
				y: node.y as f32,
				mass: params.node_mass,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					degree: node.degree,
					color: degree_color(node.degree).into(),
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		for link in &data.links {
			if let (Some(&source), Some(&target)) =
				(id_to_idx.get(link.source.as_str()), id_to_idx.get(link.target.as_str()))
			{
				graph.add_edge(source, target, EdgeData::default());
				edges.push(TreeEdge {
					source,
					target,
					weight: link.weight,
				});
			}
		}

		Self {
			graph,
			data: data.clone(),
			edges,
			weight_range: data.weight_range().unwrap_or((0.0, 0.0)),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			animation_running: true,
		}
	}

	pub fn edges(&self) -> &[TreeEdge] {
		&self.edges
	}

	/// Line width for an edge: heavier correlations draw thicker.
	pub fn edge_width(&self, weight: f64) -> f64 {
		let (lo, hi) = self.weight_range;
		if hi - lo <= f64::EPSILON {
			return (MIN_EDGE_WIDTH + MAX_EDGE_WIDTH) / 2.0;
		}
		MIN_EDGE_WIDTH + (weight - lo) / (hi - lo) * (MAX_EDGE_WIDTH - MIN_EDGE_WIDTH)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	/// Marks `node` selected and returns what the selection panel shows.
	pub fn select(&mut self, node: Option<DefaultNodeIdx>) -> Option<NodeSelection> {
		self.selected = node;
		let id = self.node_id(node?)?;
		Some(self.data.selection(&id))
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old highlight around so it can fade out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::{Edge, Graph, Layout};

	fn state() -> TreeGraphState {
		let tree = Graph::from_edges([Edge::new("A", "C", 0.1), Edge::new("B", "C", 0.5)]);
		let data = TreeData::from_tree(&tree, &Layout::default());
		TreeGraphState::new(&data, 800.0, 600.0)
	}

	#[test]
	fn hover_collects_tree_neighbours() {
		let mut s = state();
		let c = s.edges()[0].target;
		s.set_hover(Some(c));
		assert_eq!(s.hover.neighbors.len(), 2);
		assert!(s.is_hovered(c));
		s.set_hover(None);
		assert_eq!(s.hover.prev_node, Some(c));
	}

	#[test]
	fn select_reports_incident_links() {
		let mut s = state();
		let c = s.edges()[0].target;
		let selection = s.select(Some(c)).unwrap();
		assert_eq!(selection.id, "C");
		assert_eq!(selection.links.len(), 2);
		assert!(s.select(None).is_none());
		assert_eq!(s.selected, None);
	}

	#[test]
	fn edge_width_scales_with_weight() {
		let s = state();
		assert_eq!(s.edge_width(0.1), MIN_EDGE_WIDTH);
		assert_eq!(s.edge_width(0.5), MAX_EDGE_WIDTH);
	}

	#[test]
	fn leaves_and_hubs_get_different_colours() {
		assert_ne!(degree_color(1), degree_color(2));
		assert_eq!(degree_color(0), degree_color(1));
		assert_eq!(degree_color(40), *DEGREE_COLORS.last().unwrap());
	}
}
