use leptos::prelude::*;

use crate::components::action_graph::GraphLayout;
use crate::components::action_graph::types::StyledEdge;

struct EdgeRow {
	id: String,
	peer: String,
	stats: String,
}

/// One row of the in/out edge lists, named by the node at the far end.
fn edge_row(layout: &GraphLayout, edge: &StyledEdge, far_end: &str) -> EdgeRow {
	let peer = layout
		.node(far_end)
		.map(|n| n.title().to_string())
		.unwrap_or_else(|| far_end.to_string());
	EdgeRow {
		id: edge.id.clone(),
		peer,
		stats: format!(
			"{}× · median {:.0}ms · avg {:.0}ms",
			edge.count, edge.median_ms, edge.avg_ms
		),
	}
}

fn edge_list(title: &'static str, traffic: u64, rows: Vec<EdgeRow>) -> AnyView {
	let body = if rows.is_empty() {
		view! { <p class="muted">"none"</p> }.into_any()
	} else {
		view! {
			<ul class="edge-list">
				{rows
					.into_iter()
					.map(|row| {
						view! {
							<li title={row.id}>
								<span class="edge-peer">{row.peer}</span>
								<span class="edge-label">{row.stats}</span>
							</li>
						}
					})
					.collect_view()}
			</ul>
		}
		.into_any()
	};
	view! {
		<h3>{title} " (" {traffic} ")"</h3>
		{body}
	}
	.into_any()
}

/// Details of the focused node and the folded context nodes.
#[component]
pub fn NodePanel(
	#[prop(into)] layout: Signal<GraphLayout>,
	#[prop(into)] focus: Signal<Option<String>>,
	#[prop(into)] on_clear: Callback<()>,
) -> impl IntoView {
	let details = move || {
		let raw = focus.get()?;
		layout.with(|layout| {
			let node = layout.node_by_raw(&raw)?;
			let incoming = || layout.edges.iter().filter(|e| e.target == node.safe_id);
			let outgoing = || layout.edges.iter().filter(|e| e.source == node.safe_id);
			let traffic_in = incoming().fold(0u64, |sum, e| sum.saturating_add(e.count));
			let traffic_out = outgoing().fold(0u64, |sum, e| sum.saturating_add(e.count));
			let inbound: Vec<_> = incoming().map(|e| edge_row(layout, e, &e.source)).collect();
			let outbound: Vec<_> = outgoing().map(|e| edge_row(layout, e, &e.target)).collect();
			let label_lines: Vec<String> = node.label.lines().map(str::to_string).collect();
			let kind = node.kind.as_str();
			let count = node.count;
			let color = node.color;
			let current = node.is_current;
			let placement = format!(
				"{} lane · level {} · row {}",
				node.lane.name(),
				node.level,
				node.rank
			);

			Some(view! {
				<div class="node-details">
					<div class="node-kind" style={format!("border-left: 4px solid {color}")}>
						{kind}
						{current.then_some(view! { <span class="badge current">"current"</span> })}
					</div>
					{label_lines
						.into_iter()
						.map(|line| view! { <div class="node-label">{line}</div> })
						.collect_view()}
					<p>"Seen " {count} " times"</p>
					<p class="muted">{placement}</p>
					{edge_list("Incoming", traffic_in, inbound)}
					{edge_list("Outgoing", traffic_out, outbound)}
					<button on:click=move |_| on_clear.run(())>"Clear focus"</button>
				</div>
			})
		})
	};

	let collapsed = move || {
		layout.with(|layout| {
			layout
				.collapsed
				.iter()
				.map(|c| {
					let title = c.label.lines().next().unwrap_or(&c.raw_id).to_string();
					let volume = c.volume;
					view! {
						<li>
							<span class="edge-peer">{title}</span>
							<span class="edge-label">{volume}</span>
						</li>
					}
				})
				.collect_view()
		})
	};

	view! {
		<aside class="node-panel">
			<h2>"Selection"</h2>
			{move || {
				details()
					.map(|d| d.into_any())
					.unwrap_or_else(|| {
						view! { <p class="muted">"Click a node to focus it."</p> }.into_any()
					})
			}}
			<Show when=move || layout.with(|l| !l.collapsed.is_empty())>
				<h2>"Collapsed tabs"</h2>
				<ul class="edge-list">{collapsed}</ul>
			</Show>
		</aside>
	}
}
