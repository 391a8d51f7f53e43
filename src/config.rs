//! User controls, presentation constants and backend endpoints.

use std::sync::OnceLock;

/// How often the graph snapshot is polled.
pub const POLL_INTERVAL_MS: u32 = 800;

/// Number of stream actions kept for current-state tracking.
pub const ACTION_LOG_LIMIT: usize = 200;

pub const TOP_K_MIN: usize = 10;
pub const TOP_K_MAX: usize = 160;
pub const TOP_K_DEFAULT: usize = 60;

/// Toggles and sliders exposed in the controls bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSettings {
	pub hide_dom: bool,
	pub hide_mouse: bool,
	pub hide_keyboard: bool,
	/// Fold tab nodes into direct edges between their neighbours.
	pub collapse_tabs: bool,
	pub top_k: usize,
}

impl Default for ViewSettings {
	fn default() -> Self {
		Self {
			hide_dom: true,
			hide_mouse: true,
			hide_keyboard: false,
			collapse_tabs: true,
			top_k: TOP_K_DEFAULT,
		}
	}
}

impl ViewSettings {
	pub fn set_top_k(&mut self, k: usize) {
		self.top_k = k.clamp(TOP_K_MIN, TOP_K_MAX);
	}
}

/// Geometry and stroke constants for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub origin_x: f64,
	pub origin_y: f64,
	pub column_gap: f64,
	pub row_gap: f64,
	pub lane_gap: f64,
	pub node_width: f64,
	pub node_height: f64,

	pub base_width: f64,
	pub width_scale: f64,
	pub min_width: f64,
	pub max_width: f64,

	pub base_opacity: f64,
	pub floor_opacity: f64,
	pub latency_spread: f64,
	pub latency_ceiling_ms: f64,

	pub parallel_gap: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			origin_x: 40.0,
			origin_y: 40.0,
			column_gap: 240.0,
			row_gap: 64.0,
			lane_gap: 48.0,
			node_width: 180.0,
			node_height: 40.0,

			base_width: 1.0,
			width_scale: 0.9,
			min_width: 1.0,
			max_width: 7.0,

			base_opacity: 0.9,
			floor_opacity: 0.25,
			latency_spread: 0.55,
			latency_ceiling_ms: 2500.0,

			parallel_gap: 14.0,
		}
	}
}

/// Backend base URL.
///
/// A page served from localhost talks to the dev backend on port 8000;
/// anywhere else the backend is same-origin.
fn get_api_base() -> String {
	let hostname = web_sys::window()
		.and_then(|w| w.location().hostname().ok())
		.unwrap_or_default();

	if hostname == "localhost" || hostname == "127.0.0.1" {
		"http://localhost:8000".to_string()
	} else {
		String::new()
	}
}

static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

pub fn api_base() -> &'static str {
	API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

/// WebSocket base for a given HTTP base. An empty base means same-origin and
/// is resolved against the page location.
pub fn ws_base(api_base: &str) -> String {
	if let Some(rest) = api_base.strip_prefix("https://") {
		return format!("wss://{rest}");
	}
	if let Some(rest) = api_base.strip_prefix("http://") {
		return format!("ws://{rest}");
	}
	let location = web_sys::window().map(|w| w.location());
	let (protocol, host) = location
		.map(|l| (l.protocol().unwrap_or_default(), l.host().unwrap_or_default()))
		.unwrap_or_default();
	let scheme = if protocol == "https:" { "wss" } else { "ws" };
	format!("{scheme}://{host}")
}
