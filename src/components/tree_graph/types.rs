use crate::tree::{Graph, Layout, seed_position};

/// Layout radius used when a node has no computed position.
const FALLBACK_RADIUS: f32 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
	pub id: String,
	pub degree: usize,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeLink {
	pub source: String,
	pub target: String,
	pub weight: f64,
}

/// Everything the canvas needs to draw a spanning tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeData {
	pub nodes: Vec<TreeNode>,
	pub links: Vec<TreeLink>,
	pub total_weight: f64,
}

/// A tapped node and the tree edges touching it.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSelection {
	pub id: String,
	pub links: Vec<TreeLink>,
}

impl TreeData {
	pub fn from_tree(tree: &Graph, layout: &Layout) -> Self {
		let n = tree.node_count();
		let nodes = tree
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, id)| {
				let (x, y) = layout.get(id).map(|p| (p.x, p.y)).unwrap_or_else(|| {
					let (x, y) = seed_position(i, n, FALLBACK_RADIUS);
					(x as f64, y as f64)
				});
				TreeNode {
					id: id.clone(),
					degree: tree.degree(id),
					x,
					y,
				}
			})
			.collect();
		let links = tree
			.edges()
			.iter()
			.map(|e| TreeLink {
				source: e.source.clone(),
				target: e.target.clone(),
				weight: e.weight(),
			})
			.collect();
		Self {
			nodes,
			links,
			total_weight: tree.total_weight(),
		}
	}

	pub fn selection(&self, id: &str) -> NodeSelection {
		NodeSelection {
			id: id.to_owned(),
			links: self
				.links
				.iter()
				.filter(|l| l.source == id || l.target == id)
				.cloned()
				.collect(),
		}
	}

	/// Smallest and largest link weight, or `None` without links.
	pub fn weight_range(&self) -> Option<(f64, f64)> {
		self.links.iter().map(|l| l.weight).fold(None, |acc, w| match acc {
			None => Some((w, w)),
			Some((lo, hi)) => Some((lo.min(w), hi.max(w))),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::{Edge, LayoutParams, compute_layout};

	fn tree() -> Graph {
		Graph::from_edges([Edge::new("A", "C", 0.1), Edge::new("B", "C", 0.2)])
	}

	#[test]
	fn carries_positions_and_degrees() {
		let tree = tree();
		let layout = compute_layout(&tree, &LayoutParams::default());
		let data = TreeData::from_tree(&tree, &layout);

		assert_eq!(data.nodes.len(), 3);
		let c = data.nodes.iter().find(|n| n.id == "C").unwrap();
		assert_eq!(c.degree, 2);
		let p = layout.get("C").unwrap();
		assert_eq!((c.x, c.y), (p.x, p.y));
		assert!((data.total_weight - 0.3).abs() < 1e-12);
	}

	#[test]
	fn missing_layout_falls_back_to_circle() {
		let data = TreeData::from_tree(&tree(), &Layout::default());
		assert!(data.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
		assert_ne!((data.nodes[0].x, data.nodes[0].y), (data.nodes[1].x, data.nodes[1].y));
	}

	#[test]
	fn selection_lists_incident_links() {
		let data = TreeData::from_tree(&tree(), &Layout::default());
		assert_eq!(data.selection("C").links.len(), 2);
		assert_eq!(data.selection("A").links[0].weight, 0.1);
		assert_eq!(data.weight_range(), Some((0.1, 0.2)));
		assert_eq!(TreeData::default().weight_range(), None);
	}
}
