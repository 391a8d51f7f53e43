use std::collections::HashSet;

use super::types::{NodeKind, NodeRecord};
use crate::config::ViewSettings;

/// Hint the recorder writes into a click label when the element had no
/// aria-label, test id or DOM id.
pub const UNLABELED_MARKER: &str = "(unknown element)";

/// Nodes surviving the hide rules.
///
/// `hard` is the universe used for edge bookkeeping; `render` is the subset
/// actually drawn. Nodes in `hard` but not in `render` are collapsed context
/// nodes whose traffic gets fused through.
#[derive(Debug, Default)]
pub struct FilteredNodes<'a> {
	pub hard: Vec<&'a NodeRecord>,
	pub render: Vec<&'a NodeRecord>,
	hard_ids: HashSet<&'a str>,
	render_ids: HashSet<&'a str>,
}

impl<'a> FilteredNodes<'a> {
	pub fn is_hard(&self, id: &str) -> bool {
		self.hard_ids.contains(id)
	}

	pub fn is_rendered(&self, id: &str) -> bool {
		self.render_ids.contains(id)
	}

	pub fn is_collapsed(&self, id: &str) -> bool {
		self.is_hard(id) && !self.is_rendered(id)
	}

	pub fn collapsed(&self) -> impl Iterator<Item = &'a NodeRecord> + '_ {
		self.hard.iter().copied().filter(|n| !self.render_ids.contains(n.id.as_str()))
	}
}

pub fn is_unlabeled_click(node: &NodeRecord) -> bool {
	node.kind == NodeKind::Click && node.label.contains(UNLABELED_MARKER)
}

fn hidden_by_toggle(kind: NodeKind, settings: &ViewSettings) -> bool {
	match kind {
		NodeKind::Dom => settings.hide_dom,
		NodeKind::Mouse => settings.hide_mouse,
		NodeKind::Keyboard => settings.hide_keyboard,
		_ => false,
	}
}

/// Splits the snapshot's nodes into the hard and render sets. Duplicate ids
/// keep their first occurrence.
pub fn filter_nodes<'a>(nodes: &'a [NodeRecord], settings: &ViewSettings) -> FilteredNodes<'a> {
	let mut out = FilteredNodes::default();
	for node in nodes {
		if out.hard_ids.contains(node.id.as_str())
			|| hidden_by_toggle(node.kind, settings)
			|| is_unlabeled_click(node)
		{
			continue;
		}
		out.hard.push(node);
		out.hard_ids.insert(&node.id);

		if settings.collapse_tabs && node.kind.is_collapsible() {
			continue;
		}
		out.render.push(node);
		out.render_ids.insert(&node.id);
	}
	out
}
