use super::types::GraphLayout;
use crate::config::LayoutConfig;

/// Pointer travel (screen px) below which a press-release counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Canvas-side state: the latest layout plus view transform and pointer
/// bookkeeping. The layout itself is never mutated here.
pub struct ActionGraphState {
	pub layout: GraphLayout,
	pub config: LayoutConfig,
	pub transform: ViewTransform,
	pub pan: PanState,
	/// Raw id of the node under the pointer.
	pub hovered: Option<String>,
	pub width: f64,
	pub height: f64,
}

impl ActionGraphState {
	pub fn new(layout: GraphLayout, config: LayoutConfig, width: f64, height: f64) -> Self {
		Self {
			layout,
			config,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hovered: None,
			width,
			height,
		}
	}

	pub fn set_layout(&mut self, layout: GraphLayout) {
		self.layout = layout;
	}

	/// Records the hovered node; returns true when it changed.
	pub fn set_hovered(&mut self, raw_id: Option<String>) -> bool {
		if self.hovered == raw_id {
			return false;
		}
		self.hovered = raw_id;
		true
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Index into `layout.nodes` of the node box under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let (w, h) = (self.config.node_width, self.config.node_height);
		self.layout
			.nodes
			.iter()
			.position(|n| gx >= n.x && gx <= n.x + w && gy >= n.y && gy <= n.y + h)
	}

	pub fn raw_id_at(&self, index: usize) -> Option<String> {
		self.layout.nodes.get(index).map(|n| n.raw_id.clone())
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn drag_pan(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if !self.pan.moved {
			if dx.abs() <= CLICK_SLOP && dy.abs() <= CLICK_SLOP {
				return;
			}
			self.pan.moved = true;
		}
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
	}

	/// Ends a pan; true when the pointer never left the click slop.
	pub fn end_pan(&mut self) -> bool {
		let was_click = self.pan.active && !self.pan.moved;
		self.pan.active = false;
		was_click
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::action_graph::layout::{Selection, compute_layout};
	use crate::components::action_graph::types::{GraphSnapshot, NodeKind, NodeRecord};
	use crate::config::ViewSettings;

	fn state() -> ActionGraphState {
		let snapshot = GraphSnapshot {
			nodes: vec![NodeRecord {
				id: "NAV:a".into(),
				label: "Navigate\na".into(),
				kind: NodeKind::Navigation,
				count: 1,
			}],
			..GraphSnapshot::default()
		};
		let config = LayoutConfig::default();
		let layout = compute_layout(&snapshot, &ViewSettings::default(), &config, &Selection::default());
		ActionGraphState::new(layout, config, 800.0, 600.0)
	}

	#[test]
	fn hit_test_respects_transform() {
		let mut s = state();
		let (x, y) = (s.layout.nodes[0].x, s.layout.nodes[0].y);
		assert_eq!(s.node_at_position(x + 5.0, y + 5.0), Some(0));
		assert_eq!(s.node_at_position(x - 5.0, y), None);

		s.transform = ViewTransform { x: 100.0, y: 50.0, k: 2.0 };
		assert_eq!(s.node_at_position(100.0 + 2.0 * (x + 5.0), 50.0 + 2.0 * (y + 5.0)), Some(0));
		assert_eq!(s.raw_id_at(0).as_deref(), Some("NAV:a"));
	}

	#[test]
	fn hover_changes_are_reported_once() {
		let mut s = state();
		assert!(s.set_hovered(Some("NAV:a".into())));
		assert!(!s.set_hovered(Some("NAV:a".into())));
		assert!(s.set_hovered(None));
		assert!(!s.set_hovered(None));
	}

	#[test]
	fn short_press_is_a_click_and_long_drag_pans() {
		let mut s = state();
		s.begin_pan(10.0, 10.0);
		s.drag_pan(12.0, 11.0);
		assert!(s.end_pan());

		s.begin_pan(10.0, 10.0);
		s.drag_pan(60.0, 30.0);
		assert!(!s.end_pan());
		assert_eq!(s.transform.x, 50.0);
		assert_eq!(s.transform.y, 20.0);
	}

	#[test]
	fn jitter_inside_the_slop_leaves_the_view_alone() {
		let mut s = state();
		s.begin_pan(10.0, 10.0);
		s.drag_pan(13.0, 8.0);
		assert_eq!(s.transform, ViewTransform::default());
		assert!(s.end_pan());

		// The next pan starts from the untouched view.
		s.begin_pan(0.0, 0.0);
		s.drag_pan(20.0, 0.0);
		s.drag_pan(2.0, 1.0);
		assert_eq!((s.transform.x, s.transform.y), (2.0, 1.0));
		assert!(!s.end_pan());
	}

	#[test]
	fn zoom_keeps_the_pointer_fixed() {
		let mut s = state();
		let before = s.screen_to_graph(200.0, 150.0);
		s.zoom_at(200.0, 150.0, true);
		let after = s.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}
}
