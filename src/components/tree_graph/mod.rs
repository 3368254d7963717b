mod component;
mod render;
mod state;
mod types;

pub use component::TreeGraphCanvas;
pub use types::{NodeSelection, TreeData, TreeLink, TreeNode};
