//! Minimum spanning trees of stock-correlation networks, with a Leptos
//! client-side page that draws them.
//!
//! The pipeline lives in [`tree`]: a [`tree::CorrelationMatrix`] is split into
//! links, deduplicated into edges, turned into a [`tree::Graph`] and reduced to
//! its minimum spanning forest by [`tree::SpanningTreeComputer`].

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
pub mod error;
mod pages;
pub mod prices;
pub mod tree;

pub use components::tree_graph::{NodeSelection, TreeData, TreeLink, TreeNode};
pub use error::{Result, TreeError};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the tree page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Correlation Tree" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
