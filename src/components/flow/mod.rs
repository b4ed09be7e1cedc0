//! Node-and-edge flow editor.
//!
//! The collections live with the caller, usually in a [`FlowStore`] behind a
//! signal. [`FlowCanvas`] draws them on an HTML canvas and reports edits back:
//! - dragging, selecting, deleting and measuring nodes as [`NodeChange`] batches
//! - selecting and deleting edges as [`EdgeChange`] batches
//! - finished connect gestures as a [`Connection`]
//!
//! # Example
//!
//! ```ignore
//! let store = RwSignal::new(FlowStore::demo());
//! let nodes = Memo::new(move |_| store.with(|s| s.nodes().to_vec()));
//! let edges = Memo::new(move |_| store.with(|s| s.edges().to_vec()));
//!
//! view! {
//!     <FlowCanvas
//!         nodes=nodes
//!         edges=edges
//!         on_nodes_change=move |c| store.update(|s| s.apply_node_changes(c))
//!         on_edges_change=move |c| store.update(|s| s.apply_edge_changes(c))
//!         on_connect=move |c| { store.update(|s| { s.connect(c); }); }
//!         fullscreen=true
//!     />
//! }
//! ```

mod changes;
mod component;
mod config;
mod error;
mod geometry;
mod render;
mod state;
mod store;
pub mod theme;
mod types;
mod viewport;

pub use changes::{EdgeChange, NodeChange, add_edge, apply_edge_changes, apply_node_changes, edge_id};
pub use component::FlowCanvas;
pub use config::FlowConfig;
pub use error::CanvasError;
pub use store::{FlowStore, SPAWN_EXTENT};
pub use theme::{ColorMode, Theme};
pub use types::{
	Connection, Dimensions, Edge, EdgeStyle, FlowData, LabelBgStyle, LabelStyle, Node, NodeKind,
	XYPosition,
};
