//! Edge stroke, fade and parallel-edge offsets.

use std::collections::HashMap;

use crate::config::LayoutConfig;

/// Logarithmic so that busy edges cannot grow without bound.
pub fn stroke_width(count: u64, config: &LayoutConfig) -> f64 {
	(config.base_width + (count as f64 + 1.0).log2() * config.width_scale)
		.clamp(config.min_width, config.max_width)
}

/// Slower transitions fade toward `floor_opacity`.
pub fn latency_opacity(median_ms: f64, config: &LayoutConfig) -> f64 {
	let normalized = if config.latency_ceiling_ms > 0.0 {
		(median_ms / config.latency_ceiling_ms).clamp(0.0, 1.0)
	} else {
		0.0
	};
	(config.base_opacity - normalized * config.latency_spread)
		.clamp(config.floor_opacity, config.base_opacity)
}

pub fn edge_label(count: u64, median_ms: f64) -> String {
	format!("{count}× · {}ms", median_ms.round() as u64)
}

/// Endpoints and weight of one drawn edge, as seen by [`parallel_offsets`].
#[derive(Clone, Copy, Debug)]
pub struct EdgeEnds<'a> {
	pub source: &'a str,
	pub target: &'a str,
	pub count: u64,
}

/// Lateral offsets for edges that join the same pair of nodes, in either
/// direction.
///
/// A group of `m` edges gets the slots `(i - (m-1)/2) * gap`. The busiest
/// edge takes the slot nearest the centre line. Slots are laid out in the
/// frame of the pair's canonical direction (smaller id first) and flipped for
/// edges running the other way, since the renderer offsets along each edge's
/// own normal.
pub fn parallel_offsets(edges: &[EdgeEnds<'_>], gap: f64) -> Vec<f64> {
	let mut groups: Vec<Vec<usize>> = Vec::new();
	let mut by_pair: HashMap<(&str, &str), usize> = HashMap::new();
	for (i, edge) in edges.iter().enumerate() {
		let pair = if edge.source <= edge.target {
			(edge.source, edge.target)
		} else {
			(edge.target, edge.source)
		};
		let group = *by_pair.entry(pair).or_insert_with(|| {
			groups.push(Vec::new());
			groups.len() - 1
		});
		groups[group].push(i);
	}

	let mut offsets = vec![0.0; edges.len()];
	for mut members in groups {
		let m = members.len();
		if m < 2 {
			continue;
		}
		members.sort_by(|&a, &b| edges[b].count.cmp(&edges[a].count));

		let centre = (m - 1) as f64 / 2.0;
		let mut slots: Vec<f64> = (0..m).map(|i| (i as f64 - centre) * gap).collect();
		slots.sort_by(|a, b| a.abs().total_cmp(&b.abs()).then(a.total_cmp(b)));

		for (member, slot) in members.into_iter().zip(slots) {
			let edge = &edges[member];
			offsets[member] = if edge.source <= edge.target { slot } else { -slot };
		}
	}
	offsets
}
