//! Node-kind-aware views over the recorded graph.

pub mod action_graph;
pub mod node_panel;
