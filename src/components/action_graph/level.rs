//! Breadth-first layering over a possibly cyclic transition graph.

use std::collections::{BTreeSet, HashMap, VecDeque};

use super::collapse::AggregatedEdge;
use super::types::{NodeKind, NodeRecord};

/// Index of the highest-count node among `candidates`; the earliest wins ties.
fn busiest<'a>(candidates: impl Iterator<Item = (usize, &'a NodeRecord)>) -> Option<usize> {
	let mut best: Option<(usize, u64)> = None;
	for (i, node) in candidates {
		if best.is_none_or(|(_, count)| node.count > count) {
			best = Some((i, node.count));
		}
	}
	best.map(|(i, _)| i)
}

/// Root used when every node has an inbound edge: the busiest navigation
/// node, or the busiest node overall.
pub fn fallback_root(nodes: &[&NodeRecord]) -> Option<usize> {
	busiest(nodes.iter().copied().enumerate().filter(|(_, n)| n.kind == NodeKind::Navigation))
		.or_else(|| busiest(nodes.iter().copied().enumerate()))
}

/// Shortest-path depth from the root set for each node, in `nodes` order.
/// Nodes no root reaches sit at depth 0.
pub fn bfs_depths(nodes: &[&NodeRecord], edges: &[AggregatedEdge]) -> Vec<usize> {
	let n = nodes.len();
	if n == 0 {
		return Vec::new();
	}

	let index: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect();
	let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
	let mut in_degree = vec![0usize; n];
	for edge in edges {
		let (Some(&u), Some(&v)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) else {
			continue;
		};
		adjacency[u].push(v);
		// A self-loop does not stop a node from starting a flow.
		if u != v {
			in_degree[v] += 1;
		}
	}

	let mut roots: Vec<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
	if roots.is_empty() {
		roots.extend(fallback_root(nodes));
	}

	let mut depth: Vec<Option<usize>> = vec![None; n];
	let mut queue = VecDeque::new();
	for &root in &roots {
		depth[root] = Some(0);
		queue.push_back(root);
	}

	while let Some(u) = queue.pop_front() {
		let next = depth[u].unwrap_or(0) + 1;
		for &v in &adjacency[u] {
			if depth[v].is_none_or(|d| next < d) {
				depth[v] = Some(next);
				queue.push_back(v);
			}
		}
	}

	depth.into_iter().map(|d| d.unwrap_or(0)).collect()
}

/// Renumbers depths onto `0..distinct`, keeping their order.
pub fn compress_levels(depths: &[usize]) -> Vec<usize> {
	let distinct: BTreeSet<usize> = depths.iter().copied().collect();
	let dense: HashMap<usize, usize> = distinct.into_iter().enumerate().map(|(i, d)| (d, i)).collect();
	depths.iter().map(|d| dense[d]).collect()
}

pub fn assign_levels(nodes: &[&NodeRecord], edges: &[AggregatedEdge]) -> Vec<usize> {
	compress_levels(&bfs_depths(nodes, edges))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, kind: NodeKind, count: u64) -> NodeRecord {
		NodeRecord {
			id: id.into(),
			label: id.into(),
			kind,
			count,
		}
	}

	fn edge(from: &str, to: &str) -> AggregatedEdge {
		AggregatedEdge {
			from: from.into(),
			to: to.into(),
			count: 1,
			avg_ms: 0.0,
			median_ms: 0.0,
		}
	}

	#[test]
	fn chain_gets_increasing_depths() {
		let owned = vec![
			node("a", NodeKind::Navigation, 1),
			node("b", NodeKind::Click, 1),
			node("c", NodeKind::Click, 1),
		];
		let nodes: Vec<_> = owned.iter().collect();
		let depths = bfs_depths(&nodes, &[edge("a", "b"), edge("b", "c")]);
		assert_eq!(depths, [0, 1, 2]);
	}

	#[test]
	fn shortcut_wins_over_long_path() {
		let owned = vec![
			node("a", NodeKind::Navigation, 1),
			node("b", NodeKind::Click, 1),
			node("c", NodeKind::Click, 1),
			node("d", NodeKind::Click, 1),
		];
		let nodes: Vec<_> = owned.iter().collect();
		let edges = [edge("a", "b"), edge("b", "c"), edge("c", "d"), edge("a", "d")];
		let depths = bfs_depths(&nodes, &edges);
		assert_eq!(depths, [0, 1, 2, 1]);
		// Every edge reachable from a root satisfies child <= parent + 1.
		for e in &edges {
			let u = owned.iter().position(|n| n.id == e.from).unwrap();
			let v = owned.iter().position(|n| n.id == e.to).unwrap();
			assert!(depths[v] <= depths[u] + 1);
		}
	}

	#[test]
	fn full_cycle_roots_at_busiest_navigation() {
		let owned = vec![
			node("c1", NodeKind::Click, 50),
			node("n1", NodeKind::Navigation, 3),
			node("n2", NodeKind::Navigation, 7),
		];
		let nodes: Vec<_> = owned.iter().collect();
		let edges = [edge("c1", "n1"), edge("n1", "n2"), edge("n2", "c1")];
		assert_eq!(fallback_root(&nodes), Some(2));
		assert_eq!(bfs_depths(&nodes, &edges), [1, 2, 0]);
	}

	#[test]
	fn full_cycle_without_navigation_roots_at_busiest() {
		let owned = vec![
			node("x", NodeKind::Click, 2),
			node("y", NodeKind::Click, 9),
			node("z", NodeKind::Click, 9),
		];
		let nodes: Vec<_> = owned.iter().collect();
		let edges = [edge("x", "y"), edge("y", "z"), edge("z", "x")];
		assert_eq!(fallback_root(&nodes), Some(1));
		assert_eq!(bfs_depths(&nodes, &edges), [2, 0, 1]);
	}

	#[test]
	fn unreachable_cycle_defaults_to_zero() {
		let owned = vec![
			node("r", NodeKind::Navigation, 1),
			node("s", NodeKind::Click, 1),
			node("p", NodeKind::Click, 1),
			node("q", NodeKind::Click, 1),
		];
		let nodes: Vec<_> = owned.iter().collect();
		let edges = [edge("r", "s"), edge("p", "q"), edge("q", "p")];
		assert_eq!(bfs_depths(&nodes, &edges), [0, 1, 0, 0]);
	}

	#[test]
	fn self_loop_does_not_block_root() {
		let owned = vec![node("a", NodeKind::Click, 1), node("b", NodeKind::Click, 1)];
		let nodes: Vec<_> = owned.iter().collect();
		assert_eq!(bfs_depths(&nodes, &[edge("a", "a"), edge("a", "b")]), [0, 1]);
	}

	#[test]
	fn compression_is_dense_and_ordered() {
		assert_eq!(compress_levels(&[0, 4, 4, 9, 2]), [0, 2, 2, 3, 1]);
		assert!(compress_levels(&[]).is_empty());
	}

	#[test]
	fn empty_input_yields_nothing() {
		assert!(assign_levels(&[], &[edge("a", "b")]).is_empty());
	}
}
