//! Leptos component wrapping the flow canvas.
//!
//! The component owns only view state (viewport, gestures, hover). Node and
//! edge collections are read from the `nodes`/`edges` signals each frame and
//! every edit is reported through the callbacks, so the owner decides what
//! actually changes.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, WheelEvent,
	Window,
};

use super::changes::{EdgeChange, NodeChange};
use super::config::FlowConfig;
use super::error::CanvasError;
use super::render;
use super::state::{FlowCanvasState, FlowEvent};
use super::types::{Connection, Edge, Node};

type SharedState = Rc<RefCell<Option<FlowCanvasState>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// The owner's callbacks.
#[derive(Clone, Copy)]
struct Handlers {
	on_nodes_change: Option<Callback<Vec<NodeChange>>>,
	on_edges_change: Option<Callback<Vec<EdgeChange>>>,
	on_connect: Option<Callback<Connection>>,
}

impl Handlers {
	fn dispatch(&self, events: Vec<FlowEvent>) {
		for event in events {
			match event {
				FlowEvent::Nodes(changes) => {
					if let Some(cb) = self.on_nodes_change {
						cb.run(changes);
					}
				}
				FlowEvent::Edges(changes) => {
					if let Some(cb) = self.on_edges_change {
						cb.run(changes);
					}
				}
				FlowEvent::Connect(connection) => {
					info!("flow: connect {} -> {}", connection.source, connection.target);
					if let Some(cb) = self.on_connect {
						cb.run(connection);
					}
				}
			}
		}
	}
}

/// Collections the canvas reads, untracked.
#[derive(Clone, Copy)]
struct Flow {
	nodes: Signal<Vec<Node>>,
	edges: Signal<Vec<Edge>>,
}

impl Flow {
	/// `None` once the signals have been disposed.
	fn with<R>(&self, f: impl FnOnce(&[Node], &[Edge]) -> R) -> Option<R> {
		self.nodes
			.try_with_untracked(|nodes| {
				self.edges
					.try_with_untracked(|edges| f(nodes.as_slice(), edges.as_slice()))
			})?
	}
}

fn window_size(window: &Window) -> Result<(f64, f64), CanvasError> {
	let width = window.inner_width().ok().and_then(|v| v.as_f64());
	let height = window.inner_height().ok().and_then(|v| v.as_f64());
	width.zip(height).ok_or(CanvasError::WindowSize)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CanvasError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
		.ok_or(CanvasError::NoContext)
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top())
}

fn set_cursor(canvas: &HtmlCanvasElement, state: &FlowCanvasState) {
	// `ElementExt::style` from the prelude shadows the DOM getter.
	let _ = HtmlElement::style(canvas).set_property("cursor", state.cursor());
}

fn request_frame(callback: &SharedClosure) -> bool {
	let Some(window) = web_sys::window() else {
		return false;
	};
	match *callback.borrow() {
		Some(ref cb) => window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.is_ok(),
		None => false,
	}
}

/// Canvas state and the JS closures that must outlive the effect.
#[derive(Clone)]
struct Shared {
	state: SharedState,
	animate: SharedClosure,
	resize_cb: SharedClosure,
}

struct Sizing {
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
}

fn init_canvas(
	canvas: HtmlCanvasElement,
	sizing: &Sizing,
	config: FlowConfig,
	flow: Flow,
	handlers: Handlers,
	shared: &Shared,
) -> Result<(), CanvasError> {
	let Shared {
		state,
		animate,
		resize_cb,
	} = shared;
	let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
	let (w, h) = if sizing.fullscreen {
		window_size(&window)?
	} else {
		(
			sizing.width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			sizing.height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	};
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	let ctx = context_2d(&canvas)?;
	*state.borrow_mut() = Some(FlowCanvasState::new(config, w, h));
	info!("flow: canvas ready ({}x{})", w, h);

	if sizing.fullscreen {
		let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(Ok((nw, nh))) = web_sys::window().map(|win| window_size(&win)) else {
				return;
			};
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	}

	let (state_anim, animate_inner) = (state.clone(), animate.clone());
	*animate.borrow_mut() = Some(Closure::new(move || {
		let frame = flow.with(|nodes, edges| {
			let mut guard = state_anim.borrow_mut();
			let s = guard.as_mut()?;
			let measured = render::measure_nodes(&ctx, nodes);
			s.ensure_fitted(nodes);
			render::render(s, nodes, edges, &ctx);
			Some(measured)
		});
		let Some(measured) = frame else {
			info!("flow: signals disposed, stopping render loop");
			return;
		};
		if let Some(changes) = measured.filter(|c| !c.is_empty()) {
			handlers.dispatch(vec![FlowEvent::Nodes(changes)]);
		}
		request_frame(&animate_inner);
	}));
	if !request_frame(animate) {
		error!("flow: requestAnimationFrame unavailable");
	}
	Ok(())
}

/// Renders an interactive node-and-edge editor on a canvas element.
///
/// `nodes` and `edges` are read every frame. Drags, selection, deletion and
/// measured sizes come back as change batches through `on_nodes_change` /
/// `on_edges_change`; a finished connect gesture calls `on_connect`. The
/// component sizes itself to its parent unless `fullscreen` is set or explicit
/// `width`/`height` are given.
#[component]
pub fn FlowCanvas(
	/// Nodes to draw, in display order.
	#[prop(into)]
	nodes: Signal<Vec<Node>>,
	/// Edges to draw, in display order.
	#[prop(into)]
	edges: Signal<Vec<Edge>>,
	/// Receives node change batches.
	#[prop(optional, into)]
	on_nodes_change: Option<Callback<Vec<NodeChange>>>,
	/// Receives edge change batches.
	#[prop(optional, into)]
	on_edges_change: Option<Callback<Vec<EdgeChange>>>,
	/// Called once per finished connect gesture.
	#[prop(optional, into)]
	on_connect: Option<Callback<Connection>>,
	/// Behaviour options.
	#[prop(optional)]
	config: FlowConfig,
	/// Track the window size instead of the parent's.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let shared = Shared {
		state: Rc::new(RefCell::new(None)),
		animate: Rc::new(RefCell::new(None)),
		resize_cb: Rc::new(RefCell::new(None)),
	};
	let state = shared.state.clone();
	let flow = Flow { nodes, edges };
	let handlers = Handlers {
		on_nodes_change,
		on_edges_change,
		on_connect,
	};
	let show_controls = config.show_controls;
	let sizing = Sizing {
		fullscreen,
		width,
		height,
	};

	let resize_cb = SendWrapper::new(shared.resize_cb.clone());
	on_cleanup(move || {
		let resize_cb = resize_cb.take();
		let Some(cb) = resize_cb.borrow_mut().take() else {
			return;
		};
		if let Some(window) = web_sys::window() {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if let Err(err) = init_canvas(canvas, &sizing, config.clone(), flow, handlers, &shared) {
			error!("flow: canvas setup failed: {}", err);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let _ = HtmlElement::focus(&canvas);
		let (x, y) = local_point(&canvas, &ev);
		let multi = ev.ctrl_key() || ev.meta_key() || ev.shift_key();
		let events = flow.with(|nodes, edges| {
			let mut guard = state_md.borrow_mut();
			let s = guard.as_mut()?;
			let events = s.pointer_down(x, y, multi, nodes, edges);
			set_cursor(&canvas, s);
			Some(events)
		});
		handlers.dispatch(events.flatten().unwrap_or_default());
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let events = flow.with(|nodes, edges| {
			let mut guard = state_mm.borrow_mut();
			let s = guard.as_mut()?;
			let events = s.pointer_move(x, y, nodes, edges);
			set_cursor(&canvas, s);
			Some(events)
		});
		handlers.dispatch(events.flatten().unwrap_or_default());
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let events = flow.with(|nodes, _| {
			let mut guard = state_mu.borrow_mut();
			let s = guard.as_mut()?;
			let events = s.pointer_up(x, y, nodes);
			set_cursor(&canvas, s);
			Some(events)
		});
		handlers.dispatch(events.flatten().unwrap_or_default());
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let events = state_ml.borrow_mut().as_mut().map(|s| s.pointer_leave());
		handlers.dispatch(events.unwrap_or_default());
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let key = ev.key();
		let events = flow.with(|nodes, edges| {
			state_kd
				.borrow_mut()
				.as_mut()
				.map(|s| s.key_down(&key, nodes, edges))
		});
		let events = events.flatten().unwrap_or_default();
		if !events.is_empty() {
			ev.prevent_default();
		}
		handlers.dispatch(events);
	};

	let controls = show_controls.then(|| {
		let (state_zi, state_zo, state_fit) = (state.clone(), state.clone(), state.clone());
		view! {
			<div class="flow-controls">
				<button
					class="flow-controls__button"
					title="zoom in"
					on:click=move |_: MouseEvent| {
						if let Some(ref mut s) = *state_zi.borrow_mut() {
							s.zoom_in();
						}
					}
				>
					"+"
				</button>
				<button
					class="flow-controls__button"
					title="zoom out"
					on:click=move |_: MouseEvent| {
						if let Some(ref mut s) = *state_zo.borrow_mut() {
							s.zoom_out();
						}
					}
				>
					"−"
				</button>
				<button
					class="flow-controls__button"
					title="fit view"
					on:click=move |_: MouseEvent| {
						let _ = flow.with(|nodes, _| {
							if let Some(ref mut s) = *state_fit.borrow_mut() {
								s.fit_view(nodes);
							}
						});
					}
				>
					"⤢"
				</button>
			</div>
		}
	});

	view! {
		<div class="flow-canvas" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="flow-canvas__surface"
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:keydown=on_keydown
				style="display: block; cursor: grab; outline: none;"
			/>
			{controls}
		</div>
	}
}
