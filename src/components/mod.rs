//! Leptos components: the flow canvas and its side panel.

pub mod flow;
pub mod panel;
