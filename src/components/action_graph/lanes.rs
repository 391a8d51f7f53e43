use std::cmp::Reverse;

use super::types::{Lane, NodeRecord};
use crate::config::LayoutConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
	pub lane: Lane,
	pub level: usize,
	pub rank: usize,
	pub x: f64,
	pub y: f64,
}

/// Buckets nodes into lanes and stacks each (lane, level) cell by count.
///
/// Lane tops are derived from the tallest column of the lanes above, so cells
/// of different lanes never overlap within one pass. Empty lanes take no
/// space.
pub fn place_nodes(nodes: &[&NodeRecord], levels: &[usize], config: &LayoutConfig) -> Vec<Placement> {
	let lanes: Vec<Lane> = nodes.iter().map(|n| n.kind.lane()).collect();

	let mut order: Vec<usize> = (0..nodes.len()).collect();
	order.sort_by_key(|&i| (lanes[i], levels[i], Reverse(nodes[i].count), i));

	let mut ranks = vec![0usize; nodes.len()];
	let mut rows = [0usize; Lane::COUNT];
	let mut cell: Option<(Lane, usize)> = None;
	let mut next_rank = 0;
	for &i in &order {
		let key = (lanes[i], levels[i]);
		if cell != Some(key) {
			cell = Some(key);
			next_rank = 0;
		}
		ranks[i] = next_rank;
		next_rank += 1;
		let lane = lanes[i].index();
		rows[lane] = rows[lane].max(next_rank);
	}

	let mut lane_top = [config.origin_y; Lane::COUNT];
	let mut y = config.origin_y;
	for lane in 0..Lane::COUNT {
		lane_top[lane] = y;
		if rows[lane] > 0 {
			y += rows[lane] as f64 * config.row_gap + config.lane_gap;
		}
	}

	(0..nodes.len())
		.map(|i| Placement {
			lane: lanes[i],
			level: levels[i],
			rank: ranks[i],
			x: config.origin_x + levels[i] as f64 * config.column_gap,
			y: lane_top[lanes[i].index()] + ranks[i] as f64 * config.row_gap,
		})
		.collect()
}
