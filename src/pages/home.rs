use leptos::prelude::*;
use log::info;

use crate::components::flow::{Connection, EdgeChange, FlowCanvas, FlowStore, NodeChange};
use crate::components::panel::FlowPanel;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let initial = crate::load_flow_data().map(FlowStore::from).unwrap_or_else(FlowStore::demo);
	info!(
		"flow: starting with {} nodes, {} edges",
		initial.nodes().len(),
		initial.edges().len()
	);
	let store = RwSignal::new(initial);

	let nodes = Memo::new(move |_| store.with(|s| s.nodes().to_vec()));
	let edges = Memo::new(move |_| store.with(|s| s.edges().to_vec()));

	let on_nodes_change = move |changes: Vec<NodeChange>| store.update(|s| s.apply_node_changes(changes));
	let on_edges_change = move |changes: Vec<EdgeChange>| store.update(|s| s.apply_edge_changes(changes));
	let on_connect = move |connection: Connection| {
		store.update(|s| {
			s.connect(connection);
		})
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
		}>

			<div class="fullscreen-flow">
				<FlowCanvas
					nodes=nodes
					edges=edges
					on_nodes_change=on_nodes_change
					on_edges_change=on_edges_change
					on_connect=on_connect
					fullscreen=true
				/>
				<FlowPanel store=store />
			</div>
		</ErrorBoundary>
	}
}
