//! Application state container.
//!
//! One `GraphStore` is owned by the page and shared through a Leptos
//! `RwSignal`: writers go through `update`, readers subscribe with `with` or
//! a memo over [`GraphStore::layout`]. The layout pass itself stays pure.

use log::debug;

use crate::api::RecorderState;
use crate::components::action_graph::{
	GraphLayout, GraphSnapshot, Selection, compute_layout, toggle_focus,
};
use crate::config::{ACTION_LOG_LIMIT, LayoutConfig, ViewSettings};
use crate::events::{ActionLog, StreamMessage};

#[derive(Clone, Debug, PartialEq)]
pub struct GraphStore {
	pub snapshot: Option<GraphSnapshot>,
	pub settings: ViewSettings,
	pub focus: Option<String>,
	pub hover: Option<String>,
	pub recording: bool,
	pub session_id: Option<String>,
	/// Hosts the recorder is allowed to follow, from `/api/state`.
	pub allowed_hosts: Vec<String>,
	pub actions: ActionLog,
	next_seq: u64,
	applied_seq: Option<u64>,
}

impl Default for GraphStore {
	fn default() -> Self {
		Self {
			snapshot: None,
			settings: ViewSettings::default(),
			focus: None,
			hover: None,
			recording: false,
			session_id: None,
			allowed_hosts: Vec::new(),
			actions: ActionLog::new(ACTION_LOG_LIMIT),
			next_seq: 0,
			applied_seq: None,
		}
	}
}

impl GraphStore {
	/// Sequence number for a fetch about to be issued.
	pub fn begin_fetch(&mut self) -> u64 {
		let seq = self.next_seq;
		self.next_seq += 1;
		seq
	}

	/// Applies a fetched snapshot unless a newer fetch has already landed.
	pub fn apply_snapshot(&mut self, seq: u64, snapshot: GraphSnapshot) -> bool {
		if self.applied_seq.is_some_and(|applied| seq <= applied) {
			debug!("dropping stale snapshot #{seq}");
			return false;
		}
		debug!(
			"applying snapshot #{seq} (schema v{}, {} nodes)",
			snapshot.v,
			snapshot.nodes.len()
		);
		self.applied_seq = Some(seq);
		self.snapshot = Some(snapshot);
		true
	}

	pub fn toggle_focus(&mut self, raw_id: &str) {
		self.focus = toggle_focus(self.focus.as_deref(), raw_id);
	}

	pub fn clear_focus(&mut self) {
		self.focus = None;
	}

	pub fn set_hover(&mut self, raw_id: Option<String>) {
		self.hover = raw_id;
	}

	pub fn apply_recorder_state(&mut self, state: RecorderState) {
		self.recording = state.recording;
		self.session_id = state.session_id;
		self.allowed_hosts = state.allowed_hosts;
	}

	pub fn apply_stream(&mut self, message: StreamMessage) {
		match message {
			StreamMessage::Hello {
				recording,
				session_id,
			} => {
				if session_id != self.session_id {
					self.actions.clear();
				}
				self.recording = recording;
				self.session_id = session_id;
			}
			StreamMessage::Action { action } => self.actions.push(action),
			StreamMessage::Event { .. } | StreamMessage::Unknown => {}
		}
	}

	pub fn selection(&self) -> Selection {
		Selection {
			focus: self.focus.clone(),
			hover: self.hover.clone(),
			current_state: self.actions.current_state_node().map(str::to_string),
		}
	}

	pub fn layout(&self, config: &LayoutConfig) -> GraphLayout {
		match &self.snapshot {
			Some(snapshot) => compute_layout(snapshot, &self.settings, config, &self.selection()),
			None => GraphLayout::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::action_graph::NodeKind;
	use crate::components::action_graph::types::NodeRecord;
	use crate::events::ActionRecord;

	fn snapshot(generated_at: u64) -> GraphSnapshot {
		GraphSnapshot {
			v: 1,
			generated_at,
			nodes: vec![NodeRecord {
				id: "NAV:a".into(),
				label: "Navigate\na".into(),
				kind: NodeKind::Navigation,
				count: 1,
			}],
			edges: Vec::new(),
		}
	}

	#[test]
	fn stale_responses_are_discarded() {
		let mut store = GraphStore::default();
		let slow = store.begin_fetch();
		let fast = store.begin_fetch();
		assert!(store.apply_snapshot(fast, snapshot(2)));
		assert!(!store.apply_snapshot(slow, snapshot(1)));
		assert_eq!(store.snapshot.as_ref().map(|s| s.generated_at), Some(2));
	}

	#[test]
	fn recorder_state_is_copied_in() {
		let mut store = GraphStore::default();
		store.apply_recorder_state(RecorderState {
			recording: true,
			session_id: Some("s1".into()),
			allowed_hosts: vec!["localhost:3000".into()],
		});
		assert!(store.recording);
		assert_eq!(store.session_id.as_deref(), Some("s1"));
		assert_eq!(store.allowed_hosts, ["localhost:3000"]);
	}

	#[test]
	fn no_snapshot_means_empty_layout() {
		let store = GraphStore::default();
		assert!(store.layout(&LayoutConfig::default()).is_empty());
	}

	#[test]
	fn focus_toggles_and_reaches_the_layout() {
		let mut store = GraphStore::default();
		let seq = store.begin_fetch();
		store.apply_snapshot(seq, snapshot(1));
		store.toggle_focus("NAV:a");
		assert_eq!(store.selection().focus.as_deref(), Some("NAV:a"));
		store.toggle_focus("NAV:a");
		assert_eq!(store.focus, None);
		assert_eq!(store.layout(&LayoutConfig::default()).nodes.len(), 1);
	}

	#[test]
	fn stream_actions_drive_current_state() {
		let mut store = GraphStore::default();
		store.apply_stream(StreamMessage::Action {
			action: ActionRecord {
				id: "NAV:a".into(),
				kind: NodeKind::State,
				label: "State".into(),
			},
		});
		let seq = store.begin_fetch();
		store.apply_snapshot(seq, snapshot(1));
		assert!(store.layout(&LayoutConfig::default()).nodes[0].is_current);

		store.apply_stream(StreamMessage::Hello {
			recording: true,
			session_id: Some("next".into()),
		});
		assert!(store.recording);
		assert!(store.actions.latest().is_none());
	}
}
