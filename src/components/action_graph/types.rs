use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::safe_id::SafeIdCollision;

/// Category of an observed action class.
///
/// The backend sends these as upper-case strings. Anything it sends that is
/// not listed here (or no kind at all) becomes [`NodeKind::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Navigation,
	Tab,
	Click,
	Keyboard,
	Mouse,
	Dom,
	State,
	Shortcut,
	#[default]
	Other,
}

impl NodeKind {
	pub fn from_wire(raw: &str) -> Self {
		match raw.trim().to_ascii_uppercase().as_str() {
			"NAV" | "NAVIGATION" => Self::Navigation,
			"TAB" => Self::Tab,
			"CLICK" => Self::Click,
			"KEYBOARD" | "KEY" => Self::Keyboard,
			"MOUSE" => Self::Mouse,
			"DOM" => Self::Dom,
			"STATE" => Self::State,
			"SHORTCUT" => Self::Shortcut,
			_ => Self::Other,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Navigation => "NAV",
			Self::Tab => "TAB",
			Self::Click => "CLICK",
			Self::Keyboard => "KEYBOARD",
			Self::Mouse => "MOUSE",
			Self::Dom => "DOM",
			Self::State => "STATE",
			Self::Shortcut => "SHORTCUT",
			Self::Other => "OTHER",
		}
	}

	pub fn lane(self) -> Lane {
		match self {
			Self::Navigation | Self::Tab | Self::State => Lane::Flow,
			Self::Click | Self::Shortcut => Lane::Interaction,
			Self::Keyboard | Self::Mouse | Self::Dom | Self::Other => Lane::Context,
		}
	}

	/// Kinds that can be folded out of the rendered graph while keeping the
	/// paths through them.
	pub fn is_collapsible(self) -> bool {
		matches!(self, Self::Tab)
	}

	pub fn color(self) -> &'static str {
		match self {
			Self::Navigation => "#4e9af1",
			Self::Tab => "#8c7ae6",
			Self::Click => "#f5a623",
			Self::Keyboard => "#7ed6df",
			Self::Mouse => "#95a5a6",
			Self::Dom => "#6c7a89",
			Self::State => "#2ecc71",
			Self::Shortcut => "#e17055",
			Self::Other => DEFAULT_COLOR,
		}
	}
}

impl<'de> Deserialize<'de> for NodeKind {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(match Value::deserialize(deserializer)? {
			Value::String(raw) => Self::from_wire(&raw),
			_ => Self::Other,
		})
	}
}

pub const DEFAULT_COLOR: &str = "#b0b0c0";

/// Coarse vertical band a node is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
	Flow = 0,
	Interaction = 1,
	Context = 2,
}

impl Lane {
	pub const COUNT: usize = 3;

	pub fn index(self) -> usize {
		self as usize
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Flow => "flow",
			Self::Interaction => "interaction",
			Self::Context => "context",
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NodeRecord {
	#[serde(default, deserialize_with = "wire::string")]
	pub id: String,
	#[serde(default, deserialize_with = "wire::string")]
	pub label: String,
	#[serde(default)]
	pub kind: NodeKind,
	#[serde(default, deserialize_with = "wire::count")]
	pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EdgeRecord {
	#[serde(default, deserialize_with = "wire::string")]
	pub from: String,
	#[serde(default, deserialize_with = "wire::string")]
	pub to: String,
	#[serde(default, deserialize_with = "wire::count")]
	pub count: u64,
	#[serde(default, deserialize_with = "wire::millis")]
	pub avg_ms: f64,
	#[serde(default, deserialize_with = "wire::millis")]
	pub median_ms: f64,
}

/// Body of `GET /api/graph`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphSnapshot {
	#[serde(default, deserialize_with = "wire::count")]
	pub v: u64,
	#[serde(default, deserialize_with = "wire::count")]
	pub generated_at: u64,
	#[serde(default)]
	pub nodes: Vec<NodeRecord>,
	#[serde(default)]
	pub edges: Vec<EdgeRecord>,
}

/// Lenient field decoders: `null`, wrong types and negative numbers decode to
/// the zero value instead of failing the whole snapshot.
mod wire {
	use super::*;

	pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
		Ok(match Value::deserialize(deserializer)? {
			Value::String(s) => s,
			Value::Number(n) => n.to_string(),
			_ => String::new(),
		})
	}

	pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
		Ok(match Value::deserialize(deserializer)? {
			Value::Number(n) => n
				.as_u64()
				.or_else(|| n.as_f64().filter(|v| v.is_finite() && *v > 0.0).map(|v| v as u64))
				.unwrap_or(0),
			_ => 0,
		})
	}

	pub fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
		Ok(match Value::deserialize(deserializer)? {
			Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0),
			_ => 0.0,
		})
	}
}

/// A node after leveling, lane assignment and placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	pub safe_id: String,
	pub raw_id: String,
	pub label: String,
	pub kind: NodeKind,
	pub count: u64,
	pub lane: Lane,
	pub level: usize,
	/// Position among the nodes sharing this node's lane and level.
	pub rank: usize,
	pub x: f64,
	pub y: f64,
	pub color: &'static str,
	/// Most recent STATE action reported by the event stream.
	pub is_current: bool,
	/// Focus multiplier, 1.0 or [`super::focus::DIM_OPACITY`].
	pub emphasis: f64,
}

impl PositionedNode {
	pub fn title(&self) -> &str {
		self.label.lines().next().unwrap_or(&self.raw_id)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyledEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub count: u64,
	pub avg_ms: f64,
	pub median_ms: f64,
	pub color: &'static str,
	pub width: f64,
	pub opacity: f64,
	/// Lateral displacement along the edge's own left-hand normal.
	pub offset: f64,
	pub label: String,
	pub emphasis: f64,
}

/// A context node folded out of the rendered graph.
#[derive(Clone, Debug, PartialEq)]
pub struct CollapsedContext {
	pub raw_id: String,
	pub label: String,
	pub volume: u64,
}

/// Everything the canvas needs to draw one frame of the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphLayout {
	pub nodes: Vec<PositionedNode>,
	pub edges: Vec<StyledEdge>,
	/// Number of dense level columns.
	pub levels: usize,
	pub collapsed: Vec<CollapsedContext>,
	pub anomalies: Vec<SafeIdCollision>,
}

impl GraphLayout {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, safe_id: &str) -> Option<&PositionedNode> {
		self.nodes.iter().find(|n| n.safe_id == safe_id)
	}

	pub fn node_by_raw(&self, raw_id: &str) -> Option<&PositionedNode> {
		self.nodes.iter().find(|n| n.raw_id == raw_id)
	}
}
