use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::info;

use crate::components::tree_graph::{NodeSelection, TreeData, TreeGraphCanvas};
use crate::error::{Result, TreeError};
use crate::prices::PriceTable;
use crate::tree::{Algorithm, SpanningTreeComputer, TreeConfig};

/// Daily closes bundled with the app.
const SAMPLE_PRICES: &str = include_str!("../../assets/stock_prices.csv");

/// Reads `?algorithm=` and `?threshold=`; absent parameters keep their defaults.
pub fn tree_config(algorithm: Option<&str>, threshold: Option<&str>) -> Result<TreeConfig> {
	let mut config = TreeConfig::default();
	if let Some(name) = algorithm {
		config.algorithm = name.parse()?;
	}
	if let Some(raw) = threshold {
		config.threshold = raw.trim().parse().map_err(|_| TreeError::InvalidArgument {
			arg: "threshold",
			reason: format!("`{raw}` is not a number"),
		})?;
	}
	Ok(config)
}

/// Correlation MST of the bundled prices, laid out for the canvas.
pub fn build_tree(prices: &str, config: TreeConfig) -> Result<TreeData> {
	let matrix = PriceTable::from_csv(prices)?.correlation()?;
	let mut computer = SpanningTreeComputer::with_config(config)?;
	let tree = computer.build(&matrix);
	info!("rendering tree of {} tickers", tree.node_count());
	Ok(TreeData::from_tree(&tree, computer.layout()))
}

#[component]
fn TreeView(
	data: TreeData,
	algorithm: Algorithm,
	selected: RwSignal<Option<NodeSelection>>,
) -> impl IntoView {
	let (nodes, edges, total) = (data.nodes.len(), data.links.len(), data.total_weight);
	let graph_data = Signal::derive(move || data.clone());

	view! {
		<div class="fullscreen-graph">
			<TreeGraphCanvas
				data=graph_data
				fullscreen=true
				on_select={move |sel: Option<NodeSelection>| selected.set(sel)}
			/>
			<div class="graph-overlay">
				<h1>{format!("Minimum Spanning Tree of {nodes} nodes")}</h1>
				<p class="subtitle">
					"Drag nodes to reposition. Scroll to zoom. Click a node to list its edges."
				</p>
				<div class="panel">
					<h2>"Overall Data"</h2>
					<p>{format!("Num of nodes: {nodes}")}</p>
					<p>{format!("Num of edges: {edges}")}</p>
					<p>{format!("Total weight: {total:.4}")}</p>
					<p>{format!("Algorithm: {algorithm}")}</p>
				</div>
				<div class="panel">
					<h2>"Selected Data"</h2>
					{move || match selected.get() {
						None => view! { <p>"No node selected"</p> }.into_any(),
						Some(sel) => {
							view! {
								<h3>{sel.id}</h3>
								<ul>
									{sel
										.links
										.into_iter()
										.map(|l| {
											view! {
												<li>
													{format!("{} - {}: {:.4}", l.source, l.target, l.weight)}
												</li>
											}
										})
										.collect_view()}
								</ul>
							}
								.into_any()
						}
					}}
				</div>
			</div>
		</div>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let selected = RwSignal::new(None::<NodeSelection>);

	let tree_view = move || {
		let config = query.with(|q| {
			tree_config(q.get("algorithm").as_deref(), q.get("threshold").as_deref())
		})?;
		let algorithm = config.algorithm;
		let data = build_tree(SAMPLE_PRICES, config)?;
		Ok::<_, TreeError>(view! { <TreeView data algorithm selected /> })
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>{tree_view}</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_defaults() {
		let config = tree_config(None, None).unwrap();
		assert_eq!(config, TreeConfig::default());
	}

	#[test]
	fn query_overrides() {
		let config = tree_config(Some("prim"), Some("0.25")).unwrap();
		assert_eq!(config.algorithm, Algorithm::Prim);
		assert_eq!(config.threshold, 0.25);
	}

	#[test]
	fn bad_query_is_an_argument_error() {
		assert!(matches!(
			tree_config(Some("bogus"), None),
			Err(TreeError::InvalidArgument { arg: "algorithm", .. })
		));
		assert!(matches!(
			tree_config(None, Some("high")),
			Err(TreeError::InvalidArgument { arg: "threshold", .. })
		));
	}

	#[test]
	fn sample_prices_build_a_spanning_tree() {
		let data = build_tree(SAMPLE_PRICES, TreeConfig::default()).unwrap();
		assert_eq!(data.nodes.len(), 16);
		assert_eq!(data.links.len(), data.nodes.len() - 1);
		assert!(data.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
	}
}
