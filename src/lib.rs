//! flow-canvas: an interactive node-and-edge editor rendered with Leptos.
//!
//! Nodes can be added, deleted, dragged and connected; the collections live in
//! a reactive [`FlowStore`](components::flow::FlowStore) and the canvas reports
//! every edit back as change batches.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
mod pages;

use crate::components::flow::FlowData;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Id of the optional `<script type="application/json">` element seeding the flow.
pub const FLOW_DATA_ELEMENT: &str = "flow-data";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("flow: logging initialized");
}

/// Parse seed data for the store. Expected format: `{ nodes: [...], edges: [...] }`.
pub fn parse_flow_data(json: &str) -> Result<FlowData, serde_json::Error> {
	serde_json::from_str(json)
}

/// Load seed data from the element with id [`FLOW_DATA_ELEMENT`], if present
/// and well formed.
pub fn load_flow_data() -> Option<FlowData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(FLOW_DATA_ELEMENT)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match parse_flow_data(&json_text) {
		Ok(data) => {
			info!(
				"flow: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("flow: failed to parse flow data: {}", e);
			None
		}
	}
}

/// An app router which renders the flow editor and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Flow Canvas" />

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
