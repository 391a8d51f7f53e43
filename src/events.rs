//! Backend push channel (`/ws`).
//!
//! Only `action` messages matter to the graph: the latest STATE action marks
//! the node the recorded page is currently showing.

use std::collections::VecDeque;

use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, WebSocket};

use crate::components::action_graph::NodeKind;
use crate::config::{api_base, ws_base};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ActionRecord {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub kind: NodeKind,
	#[serde(default)]
	pub label: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamMessage {
	Hello {
		#[serde(default)]
		recording: bool,
		#[serde(default)]
		session_id: Option<String>,
	},
	Event {
		#[serde(default)]
		event: serde_json::Value,
	},
	Action {
		action: ActionRecord,
	},
	#[serde(other)]
	Unknown,
}

pub fn parse_message(text: &str) -> Option<StreamMessage> {
	match serde_json::from_str(text) {
		Ok(message) => Some(message),
		Err(e) => {
			log::debug!("ignoring stream frame: {e}");
			None
		}
	}
}

/// Most recent actions, oldest first, capped at `limit`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionLog {
	entries: VecDeque<ActionRecord>,
	limit: usize,
}

impl ActionLog {
	pub fn new(limit: usize) -> Self {
		Self {
			entries: VecDeque::with_capacity(limit.min(256)),
			limit: limit.max(1),
		}
	}

	pub fn push(&mut self, action: ActionRecord) {
		if self.entries.len() == self.limit {
			self.entries.pop_front();
		}
		self.entries.push_back(action);
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn latest(&self) -> Option<&ActionRecord> {
		self.entries.back()
	}

	/// Node id of the newest STATE action.
	pub fn current_state_node(&self) -> Option<&str> {
		self.entries
			.iter()
			.rev()
			.find(|a| a.kind == NodeKind::State)
			.map(|a| a.id.as_str())
	}
}

/// Opens the push channel and forwards every parsed message. Connection
/// failures are logged and otherwise ignored; the graph keeps polling.
pub fn connect_event_stream<F>(on_message: F) -> Option<WebSocket>
where
	F: FnMut(StreamMessage) + 'static,
{
	let ws_url = format!("{}/ws", ws_base(api_base()));
	log::info!("connecting to event stream {ws_url}");

	let ws = match WebSocket::new(&ws_url) {
		Ok(ws) => ws,
		Err(e) => {
			log::warn!("failed to open event stream: {e:?}");
			return None;
		}
	};

	let mut on_message = on_message;
	let onmessage_callback = Closure::wrap(Box::new(move |e: MessageEvent| {
		let Ok(text) = e.data().dyn_into::<js_sys::JsString>() else {
			return;
		};
		let text: String = text.into();
		if let Some(message) = parse_message(&text) {
			on_message(message);
		}
	}) as Box<dyn FnMut(MessageEvent)>);
	ws.set_onmessage(Some(onmessage_callback.as_ref().unchecked_ref()));
	onmessage_callback.forget();

	let onclose_callback = Closure::wrap(Box::new(move |_e: JsValue| {
		log::info!("event stream closed");
	}) as Box<dyn FnMut(JsValue)>);
	ws.set_onclose(Some(onclose_callback.as_ref().unchecked_ref()));
	onclose_callback.forget();

	let onerror_callback = Closure::wrap(Box::new(move |e: JsValue| {
		log::warn!("event stream error: {e:?}");
	}) as Box<dyn FnMut(JsValue)>);
	ws.set_onerror(Some(onerror_callback.as_ref().unchecked_ref()));
	onerror_callback.forget();

	Some(ws)
}
