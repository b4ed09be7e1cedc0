//! Side panel listing the flow's nodes and edges with delete buttons.

use leptos::prelude::*;
use web_sys::MouseEvent;

use crate::components::flow::FlowStore;

/// "Flow Controls" overlay: add / delete-last buttons plus node and edge lists.
///
/// Edits go straight to `store`; the canvas picks them up on its next frame.
#[component]
pub fn FlowPanel(
	/// Store the buttons edit.
	store: RwSignal<FlowStore>,
) -> impl IntoView {
	let add_node = move |_: MouseEvent| {
		store.update(|s| {
			s.add_node(js_sys::Math::random);
		})
	};
	let delete_last = move |_: MouseEvent| store.update(FlowStore::delete_last);

	let node_rows = move || {
		store.with(|s| {
			s.nodes()
				.iter()
				.map(|n| (n.id.clone(), n.label.clone()))
				.collect::<Vec<_>>()
		})
	};
	let edge_rows = move || {
		store.with(|s| {
			s.edges()
				.iter()
				.map(|e| (e.id.clone(), e.source.clone(), e.target.clone()))
				.collect::<Vec<_>>()
		})
	};
	let has_edges = move || store.with(|s| !s.edges().is_empty());

	view! {
		<div class="flow-panel">
			<div class="flow-panel__section">
				<h3 class="flow-panel__title">"Flow Controls"</h3>
				<div class="flow-panel__actions">
					<button class="flow-panel__button flow-panel__button--add" on:click=add_node>
						"Add Node"
					</button>
					<button class="flow-panel__button flow-panel__button--delete" on:click=delete_last>
						"Delete Last"
					</button>
				</div>
			</div>

			<div class="flow-panel__section">
				<h4 class="flow-panel__heading">"Nodes"</h4>
				<div class="flow-panel__list">
					<For
						each=node_rows
						key=|row| row.clone()
						children=move |(id, label)| {
							view! {
								<div class="flow-panel__item">
									<span>{label}</span>
									<button
										class="flow-panel__button flow-panel__button--delete"
										on:click=move |_: MouseEvent| store.update(|s| s.delete_node(&id))
									>
										"Delete"
									</button>
								</div>
							}
						}
					/>
				</div>
			</div>

			<Show when=has_edges>
				<div class="flow-panel__section">
					<h4 class="flow-panel__heading">"Edges"</h4>
					<div class="flow-panel__list">
						<For
							each=edge_rows
							key=|row| row.0.clone()
							children=move |(id, source, target)| {
								view! {
									<div class="flow-panel__item">
										<span>{source} " → " {target}</span>
										<button
											class="flow-panel__button flow-panel__button--delete"
											on:click=move |_: MouseEvent| store.update(|s| s.delete_edge(&id))
										>
											"Delete"
										</button>
									</div>
								}
							}
						/>
					</div>
				</div>
			</Show>
		</div>
	}
}
