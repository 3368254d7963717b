//! Correlation matrix to minimum spanning tree.

mod builder;
mod config;
mod graph;
mod layout;
mod matrix;
mod spanning;

pub use builder::{CorrelationGraphBuilder, EdgeOptions, LinkSet};
pub use config::TreeConfig;
pub use graph::{Attributes, Edge, Graph, Link};
pub use layout::{Layout, LayoutParams, Point, compute_layout, seed_position};
pub use matrix::CorrelationMatrix;
pub use spanning::{Algorithm, SpanningTreeComputer, minimum_spanning_tree};
