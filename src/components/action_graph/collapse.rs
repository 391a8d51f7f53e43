//! Edge aggregation and context-node fusion.

use std::collections::HashMap;

use super::filter::FilteredNodes;
use super::types::EdgeRecord;

/// All traffic observed between one ordered node pair.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedEdge {
	pub from: String,
	pub to: String,
	pub count: u64,
	pub avg_ms: f64,
	pub median_ms: f64,
}

#[derive(Debug)]
struct Accumulator {
	from: String,
	to: String,
	count: u64,
	weighted_avg: f64,
	weighted_median: f64,
	plain_avg: f64,
	plain_median: f64,
	parts: u32,
}

impl Accumulator {
	fn finish(self) -> AggregatedEdge {
		let (avg_ms, median_ms) = if self.count > 0 {
			let n = self.count as f64;
			(self.weighted_avg / n, self.weighted_median / n)
		} else {
			let n = f64::from(self.parts.max(1));
			(self.plain_avg / n, self.plain_median / n)
		};
		AggregatedEdge {
			from: self.from,
			to: self.to,
			count: self.count,
			avg_ms,
			median_ms,
		}
	}
}

/// Merges edges by `(from, to)`, keeping first-seen order. Counts add;
/// latencies become count-weighted means.
#[derive(Debug, Default)]
pub struct EdgeAggregator {
	index: HashMap<(String, String), usize>,
	slots: Vec<Accumulator>,
}

impl EdgeAggregator {
	pub fn add(&mut self, from: &str, to: &str, count: u64, avg_ms: f64, median_ms: f64) {
		let key = (from.to_string(), to.to_string());
		let slot = match self.index.get(&key) {
			Some(&i) => i,
			None => {
				self.slots.push(Accumulator {
					from: key.0.clone(),
					to: key.1.clone(),
					count: 0,
					weighted_avg: 0.0,
					weighted_median: 0.0,
					plain_avg: 0.0,
					plain_median: 0.0,
					parts: 0,
				});
				self.index.insert(key, self.slots.len() - 1);
				self.slots.len() - 1
			}
		};
		let acc = &mut self.slots[slot];
		let weight = count as f64;
		acc.count = acc.count.saturating_add(count);
		acc.weighted_avg += avg_ms * weight;
		acc.weighted_median += median_ms * weight;
		acc.plain_avg += avg_ms;
		acc.plain_median += median_ms;
		acc.parts += 1;
	}

	pub fn finish(self) -> Vec<AggregatedEdge> {
		self.slots.into_iter().map(Accumulator::finish).collect()
	}
}

#[derive(Debug, Default, PartialEq)]
pub struct Collapsed {
	pub edges: Vec<AggregatedEdge>,
	/// Inbound traffic into each collapsed node, in first-seen order.
	pub context_volume: Vec<(String, u64)>,
}

#[derive(Default)]
struct Through<'e> {
	inbound: Vec<&'e EdgeRecord>,
	outbound: Vec<&'e EdgeRecord>,
}

/// Aggregates the raw edges inside the hard node universe, fusing paths
/// through collapsed nodes into direct edges.
///
/// A fused edge takes the smaller of its two counts and the sum of their
/// latencies. Fusions that loop back onto their origin are dropped.
pub fn collapse_edges(edges: &[EdgeRecord], filtered: &FilteredNodes<'_>) -> Collapsed {
	let mut agg = EdgeAggregator::default();
	let mut order: Vec<&str> = Vec::new();
	let mut through: HashMap<&str, Through<'_>> = HashMap::new();

	for edge in edges {
		if !filtered.is_hard(&edge.from) || !filtered.is_hard(&edge.to) {
			continue;
		}
		let from_collapsed = filtered.is_collapsed(&edge.from);
		let to_collapsed = filtered.is_collapsed(&edge.to);
		if !from_collapsed && !to_collapsed {
			agg.add(&edge.from, &edge.to, edge.count, edge.avg_ms, edge.median_ms);
			continue;
		}
		if to_collapsed {
			let entry = through.entry(edge.to.as_str()).or_insert_with(|| {
				order.push(edge.to.as_str());
				Through::default()
			});
			entry.inbound.push(edge);
		}
		if from_collapsed {
			let entry = through.entry(edge.from.as_str()).or_insert_with(|| {
				order.push(edge.from.as_str());
				Through::default()
			});
			entry.outbound.push(edge);
		}
	}

	let mut context_volume = Vec::with_capacity(order.len());
	for node in order {
		let Some(paths) = through.get(node) else {
			continue;
		};
		let volume = paths.inbound.iter().fold(0u64, |sum, e| sum.saturating_add(e.count));
		context_volume.push((node.to_string(), volume));
		for inbound in &paths.inbound {
			for outbound in &paths.outbound {
				if inbound.from == outbound.to {
					continue;
				}
				agg.add(
					&inbound.from,
					&outbound.to,
					inbound.count.min(outbound.count),
					inbound.avg_ms + outbound.avg_ms,
					inbound.median_ms + outbound.median_ms,
				);
			}
		}
	}

	Collapsed {
		edges: agg.finish(),
		context_volume,
	}
}
