//! Snapshot → drawable layout.
//!
//! Runs filter, collapse, rank, level, lane placement, styling and focus in
//! one synchronous pass. Nothing is carried between passes; the same inputs
//! always give the same layout.

use log::{debug, warn};

use super::collapse::collapse_edges;
use super::filter::filter_nodes;
use super::focus::{active_selection, apply_focus};
use super::lanes::place_nodes;
use super::level::assign_levels;
use super::rank::rank_edges;
use super::safe_id::SafeIdTable;
use super::style::{EdgeEnds, edge_label, latency_opacity, parallel_offsets, stroke_width};
use super::types::{
	CollapsedContext, DEFAULT_COLOR, GraphLayout, GraphSnapshot, PositionedNode, StyledEdge,
};
use crate::config::{LayoutConfig, ViewSettings};

/// Pointer-driven inputs to a pass, all as raw node ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	pub focus: Option<String>,
	pub hover: Option<String>,
	/// Node of the latest STATE action from the event stream.
	pub current_state: Option<String>,
}

pub fn compute_layout(
	snapshot: &GraphSnapshot,
	settings: &ViewSettings,
	config: &LayoutConfig,
	selection: &Selection,
) -> GraphLayout {
	let filtered = filter_nodes(&snapshot.nodes, settings);
	let collapsed = collapse_edges(&snapshot.edges, &filtered);
	let ranked = rank_edges(collapsed.edges, &filtered, settings.top_k);

	let nodes = &filtered.render;
	let levels = assign_levels(nodes, &ranked);
	let placements = place_nodes(nodes, &levels, config);

	let mut ids = SafeIdTable::new();
	let positioned: Vec<PositionedNode> = nodes
		.iter()
		.zip(placements)
		.map(|(node, place)| PositionedNode {
			safe_id: ids.intern(&node.id),
			raw_id: node.id.clone(),
			label: node.label.clone(),
			kind: node.kind,
			count: node.count,
			lane: place.lane,
			level: place.level,
			rank: place.rank,
			x: place.x,
			y: place.y,
			color: node.kind.color(),
			is_current: selection.current_state.as_deref() == Some(node.id.as_str()),
			emphasis: 1.0,
		})
		.collect();

	let kind_of = |raw: &str| filtered.render.iter().find(|n| n.id == raw).map(|n| n.kind);
	let mut edges: Vec<StyledEdge> = ranked
		.iter()
		.filter_map(|edge| {
			let source = ids.get(&edge.from)?.to_string();
			let target = ids.get(&edge.to)?.to_string();
			Some(StyledEdge {
				id: format!("{source}->{target}"),
				source,
				target,
				count: edge.count,
				avg_ms: edge.avg_ms,
				median_ms: edge.median_ms,
				color: kind_of(&edge.from).map_or(DEFAULT_COLOR, |k| k.color()),
				width: stroke_width(edge.count, config),
				opacity: latency_opacity(edge.median_ms, config),
				offset: 0.0,
				label: edge_label(edge.count, edge.median_ms),
				emphasis: 1.0,
			})
		})
		.collect();

	let ends: Vec<EdgeEnds<'_>> = edges
		.iter()
		.map(|e| EdgeEnds {
			source: &e.source,
			target: &e.target,
			count: e.count,
		})
		.collect();
	let offsets = parallel_offsets(&ends, config.parallel_gap);
	for (edge, offset) in edges.iter_mut().zip(offsets) {
		edge.offset = offset;
	}

	let collapsed_contexts = collapsed
		.context_volume
		.into_iter()
		.map(|(raw_id, volume)| CollapsedContext {
			label: filtered
				.collapsed()
				.find(|n| n.id == raw_id)
				.map(|n| n.label.clone())
				.unwrap_or_default(),
			raw_id,
			volume,
		})
		.collect();

	let anomalies = ids.into_collisions();
	for collision in &anomalies {
		warn!(
			"safe id {} shared by {:?} and {:?}",
			collision.safe_id, collision.first, collision.second
		);
	}

	let mut layout = GraphLayout {
		levels: levels.iter().max().map_or(0, |m| m + 1),
		nodes: positioned,
		edges,
		collapsed: collapsed_contexts,
		anomalies,
	};
	apply_focus(
		&mut layout,
		active_selection(selection.focus.as_deref(), selection.hover.as_deref()),
	);

	debug!(
		"layout: {} nodes, {} edges, {} levels (snapshot {} nodes, {} edges)",
		layout.nodes.len(),
		layout.edges.len(),
		layout.levels,
		snapshot.nodes.len(),
		snapshot.edges.len()
	);
	layout
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::action_graph::focus::DIM_OPACITY;
	use crate::components::action_graph::safe_id::safe_id;
	use crate::components::action_graph::types::{EdgeRecord, Lane, NodeKind, NodeRecord};

	fn node(id: &str, kind: NodeKind, label: &str, count: u64) -> NodeRecord {
		NodeRecord {
			id: id.into(),
			label: label.into(),
			kind,
			count,
		}
	}

	fn edge(from: &str, to: &str, count: u64, median_ms: f64) -> EdgeRecord {
		EdgeRecord {
			from: from.into(),
			to: to.into(),
			count,
			avg_ms: median_ms,
			median_ms,
		}
	}

	fn snapshot() -> GraphSnapshot {
		GraphSnapshot {
			v: 1,
			generated_at: 1_700_000_000_000,
			nodes: vec![
				node("NAV:shop/", NodeKind::Navigation, "Navigate\nshop/", 5),
				node("TAB:shop/", NodeKind::Tab, "Tab\nshop/", 2),
				node("CLICK:shop/:buy", NodeKind::Click, "Click [button] Buy\nshop/", 4),
				node("CLICK:shop/:cart", NodeKind::Click, "Click [a] Cart\nshop/", 3),
				node("CLICK:shop/:x", NodeKind::Click, "Click [div] (unknown element)\nshop/", 9),
				node("DOM:shop/", NodeKind::Dom, "DOM change\nshop/", 30),
				node("STATE:shop/:1", NodeKind::State, "State\nbuy, cart\nshop/", 6),
			],
			edges: vec![
				edge("NAV:shop/", "TAB:shop/", 2, 100.0),
				edge("TAB:shop/", "CLICK:shop/:buy", 2, 200.0),
				edge("NAV:shop/", "CLICK:shop/:cart", 3, 900.0),
				edge("CLICK:shop/:cart", "CLICK:shop/:buy", 1, 50.0),
				edge("CLICK:shop/:buy", "STATE:shop/:1", 4, 300.0),
				edge("STATE:shop/:1", "CLICK:shop/:cart", 2, 300.0),
				edge("CLICK:shop/:buy", "CLICK:shop/:cart", 1, 60.0),
				edge("NAV:shop/", "CLICK:shop/:x", 9, 10.0),
				edge("DOM:shop/", "CLICK:shop/:buy", 30, 10.0),
				edge("NAV:shop/", "NAV:shop/", 1, 10.0),
			],
		}
	}

	fn run(selection: &Selection) -> GraphLayout {
		compute_layout(&snapshot(), &ViewSettings::default(), &LayoutConfig::default(), selection)
	}

	#[test]
	fn identical_inputs_give_identical_layouts() {
		let selection = Selection {
			focus: Some("CLICK:shop/:buy".into()),
			..Selection::default()
		};
		assert_eq!(run(&selection), run(&selection));
	}

	#[test]
	fn renders_filtered_nodes_with_safe_ids() {
		let layout = run(&Selection::default());
		let raw: Vec<_> = layout.nodes.iter().map(|n| n.raw_id.as_str()).collect();
		assert_eq!(raw, ["NAV:shop/", "CLICK:shop/:buy", "CLICK:shop/:cart", "STATE:shop/:1"]);
		for n in &layout.nodes {
			assert_eq!(n.safe_id, safe_id(&n.raw_id));
		}
		assert!(layout.anomalies.is_empty());
	}

	#[test]
	fn tab_is_folded_into_a_direct_edge() {
		let layout = run(&Selection::default());
		let nav = safe_id("NAV:shop/");
		let buy = safe_id("CLICK:shop/:buy");
		let fused = layout.edges.iter().find(|e| e.source == nav && e.target == buy).unwrap();
		assert_eq!(fused.count, 2);
		assert_eq!(fused.median_ms, 300.0);
		assert_eq!(layout.collapsed.len(), 1);
		assert_eq!(layout.collapsed[0].volume, 2);
		assert_eq!(layout.collapsed[0].label, "Tab\nshop/");
	}

	#[test]
	fn levels_and_lanes_follow_the_flow() {
		let layout = run(&Selection::default());
		let by_raw = |raw: &str| layout.node_by_raw(raw).unwrap();
		assert_eq!(by_raw("NAV:shop/").level, 0);
		assert_eq!(by_raw("CLICK:shop/:buy").level, 1);
		assert_eq!(by_raw("CLICK:shop/:cart").level, 1);
		assert_eq!(by_raw("STATE:shop/:1").level, 2);
		assert_eq!(layout.levels, 3);

		assert_eq!(by_raw("NAV:shop/").lane, Lane::Flow);
		assert_eq!(by_raw("CLICK:shop/:buy").lane, Lane::Interaction);
		// Same lane and level: the busier click sits on top.
		assert_eq!(by_raw("CLICK:shop/:buy").rank, 0);
		assert_eq!(by_raw("CLICK:shop/:cart").rank, 1);
	}

	#[test]
	fn edges_are_ranked_and_styled() {
		let layout = run(&Selection::default());
		let counts: Vec<_> = layout.edges.iter().map(|e| e.count).collect();
		assert_eq!(counts, [4, 3, 2, 2, 1, 1, 1]);
		for e in &layout.edges {
			assert!(e.width >= 1.0 && e.width <= 7.0);
			assert!(e.opacity >= 0.25 && e.opacity <= 0.9);
		}
		let nav = safe_id("NAV:shop/");
		let cart = safe_id("CLICK:shop/:cart");
		let slow = layout.edges.iter().find(|e| e.source == nav && e.target == cart).unwrap();
		let fast = layout.edges.iter().find(|e| e.source == nav && e.target != cart && e.target != nav).unwrap();
		assert!(slow.opacity < fast.opacity);
		assert_eq!(slow.color, NodeKind::Navigation.color());
	}

	#[test]
	fn opposing_clicks_are_offset() {
		let layout = run(&Selection::default());
		let buy = safe_id("CLICK:shop/:buy");
		let cart = safe_id("CLICK:shop/:cart");
		let there = layout.edges.iter().find(|e| e.source == buy && e.target == cart).unwrap();
		let back = layout.edges.iter().find(|e| e.source == cart && e.target == buy).unwrap();
		assert_ne!(there.offset, 0.0);
		assert_eq!(there.offset, back.offset);
	}

	#[test]
	fn top_k_limits_edges() {
		let mut settings = ViewSettings::default();
		let mut snap = snapshot();
		for i in 0..40 {
			let id = format!("CLICK:shop/:extra{i}");
			snap.nodes.push(node(&id, NodeKind::Click, "Click [a] extra", 1));
			snap.edges.push(edge("NAV:shop/", &id, 1, 10.0));
		}
		settings.set_top_k(10);
		let layout = compute_layout(&snap, &settings, &LayoutConfig::default(), &Selection::default());
		assert_eq!(layout.edges.len(), 10);
		assert_eq!(layout.edges[0].count, 4);
	}

	#[test]
	fn focus_dims_the_rest() {
		let selection = Selection {
			focus: Some("STATE:shop/:1".into()),
			hover: Some("NAV:shop/".into()),
			current_state: Some("STATE:shop/:1".into()),
		};
		let layout = run(&selection);
		let by_raw = |raw: &str| layout.node_by_raw(raw).unwrap();
		assert_eq!(by_raw("STATE:shop/:1").emphasis, 1.0);
		assert_eq!(by_raw("CLICK:shop/:buy").emphasis, 1.0);
		assert_eq!(by_raw("CLICK:shop/:cart").emphasis, 1.0);
		assert_eq!(by_raw("NAV:shop/").emphasis, DIM_OPACITY);
		assert!(by_raw("STATE:shop/:1").is_current);
		assert!(!by_raw("NAV:shop/").is_current);
	}

	#[test]
	fn empty_snapshot_gives_empty_layout() {
		let layout = compute_layout(
			&GraphSnapshot::default(),
			&ViewSettings::default(),
			&LayoutConfig::default(),
			&Selection {
				focus: Some("anything".into()),
				..Selection::default()
			},
		);
		assert!(layout.is_empty());
		assert!(layout.edges.is_empty());
		assert_eq!(layout.levels, 0);
	}

	#[test]
	fn fully_filtered_graph_is_empty() {
		let snap = GraphSnapshot {
			nodes: vec![node("DOM:a", NodeKind::Dom, "DOM", 3)],
			edges: vec![edge("DOM:a", "DOM:a", 3, 1.0)],
			..GraphSnapshot::default()
		};
		let layout = compute_layout(&snap, &ViewSettings::default(), &LayoutConfig::default(), &Selection::default());
		assert!(layout.is_empty());
		assert!(layout.edges.is_empty());
	}
}
