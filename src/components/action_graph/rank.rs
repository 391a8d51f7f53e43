use super::collapse::AggregatedEdge;
use super::filter::FilteredNodes;

/// Keeps the `k` busiest edges between rendered nodes. Equal counts keep
/// their aggregation order.
pub fn rank_edges(
	edges: Vec<AggregatedEdge>,
	filtered: &FilteredNodes<'_>,
	k: usize,
) -> Vec<AggregatedEdge> {
	let mut ranked: Vec<_> = edges
		.into_iter()
		.filter(|e| filtered.is_rendered(&e.from) && filtered.is_rendered(&e.to))
		.collect();
	ranked.sort_by(|a, b| b.count.cmp(&a.count));
	ranked.truncate(k);
	ranked
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::action_graph::filter::filter_nodes;
	use crate::components::action_graph::types::{NodeKind, NodeRecord};
	use crate::config::ViewSettings;

	fn agg(from: &str, to: &str, count: u64) -> AggregatedEdge {
		AggregatedEdge {
			from: from.into(),
			to: to.into(),
			count,
			avg_ms: 0.0,
			median_ms: 0.0,
		}
	}

	fn nodes(ids: &[&str]) -> Vec<NodeRecord> {
		ids.iter()
			.map(|id| NodeRecord {
				id: id.to_string(),
				label: id.to_string(),
				kind: NodeKind::Click,
				count: 1,
			})
			.collect()
	}

	#[test]
	fn keeps_top_k_by_count_with_stable_ties() {
		let nodes = nodes(&["a", "b", "c", "d"]);
		let filtered = filter_nodes(&nodes, &ViewSettings::default());
		let edges = vec![
			agg("a", "b", 3),
			agg("b", "c", 9),
			agg("c", "d", 3),
			agg("d", "a", 5),
			agg("a", "c", 3),
		];
		let ranked = rank_edges(edges, &filtered, 4);
		let got: Vec<_> = ranked.iter().map(|e| (e.from.as_str(), e.count)).collect();
		assert_eq!(got, [("b", 9), ("d", 5), ("a", 3), ("c", 3)]);
		assert_eq!(ranked[2].to, "b");
	}

	#[test]
	fn never_exceeds_k() {
		let nodes = nodes(&["a", "b"]);
		let filtered = filter_nodes(&nodes, &ViewSettings::default());
		let edges: Vec<_> = (0..50).map(|i| agg("a", "b", i)).collect();
		let ranked = rank_edges(edges, &filtered, 10);
		assert_eq!(ranked.len(), 10);
		assert_eq!(ranked[0].count, 49);
		assert_eq!(ranked[9].count, 40);
	}

	#[test]
	fn drops_edges_to_unrendered_nodes() {
		let nodes = nodes(&["a", "b"]);
		let filtered = filter_nodes(&nodes, &ViewSettings::default());
		let ranked = rank_edges(vec![agg("a", "zz", 100), agg("a", "b", 1)], &filtered, 60);
		assert_eq!(ranked, vec![agg("a", "b", 1)]);
	}
}
