use std::collections::HashSet;

use super::types::{GraphLayout, StyledEdge};

/// Emphasis of everything outside the selected neighbourhood.
pub const DIM_OPACITY: f64 = 0.15;

/// Clicking the focused node again clears the focus.
pub fn toggle_focus(current: Option<&str>, clicked: &str) -> Option<String> {
	if current == Some(clicked) {
		None
	} else {
		Some(clicked.to_string())
	}
}

/// The node whose neighbourhood is lit: the focus if any, else the hover.
pub fn active_selection<'a>(focus: Option<&'a str>, hover: Option<&'a str>) -> Option<&'a str> {
	focus.or(hover)
}

/// Safe ids of `selected` and every node sharing a ranked edge with it.
pub fn neighbourhood(selected: &str, edges: &[StyledEdge]) -> HashSet<String> {
	let mut lit = HashSet::from([selected.to_string()]);
	for edge in edges {
		if edge.source == selected {
			lit.insert(edge.target.clone());
		} else if edge.target == selected {
			lit.insert(edge.source.clone());
		}
	}
	lit
}

/// Writes node and edge emphasis for the selection, given by raw id. A
/// selection that is not in the layout leaves everything at full strength.
pub fn apply_focus(layout: &mut GraphLayout, selected_raw: Option<&str>) {
	let selected = selected_raw
		.and_then(|raw| layout.node_by_raw(raw))
		.map(|n| n.safe_id.clone());

	let Some(selected) = selected else {
		layout.nodes.iter_mut().for_each(|n| n.emphasis = 1.0);
		layout.edges.iter_mut().for_each(|e| e.emphasis = 1.0);
		return;
	};

	let lit = neighbourhood(&selected, &layout.edges);
	for node in &mut layout.nodes {
		node.emphasis = if lit.contains(&node.safe_id) { 1.0 } else { DIM_OPACITY };
	}
	for edge in &mut layout.edges {
		let incident = edge.source == selected || edge.target == selected;
		edge.emphasis = if incident { 1.0 } else { DIM_OPACITY };
	}
}
