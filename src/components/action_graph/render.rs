use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ActionGraphState;
use super::types::{PositionedNode, StyledEdge};

const BACKGROUND: &str = "#1a1a2e";
const TITLE_CHARS: usize = 26;

pub fn render(state: &ActionGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	if state.layout.is_empty() {
		draw_empty_hint(state, ctx);
		return;
	}

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	for edge in &state.layout.edges {
		draw_edge(state, ctx, edge);
	}
	for node in &state.layout.nodes {
		let hovered = state.hovered.as_deref() == Some(node.raw_id.as_str());
		draw_node(state, ctx, node, hovered);
	}
	ctx.restore();
	ctx.set_global_alpha(1.0);
}

fn draw_empty_hint(state: &ActionGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.5)");
	ctx.set_font("14px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(
		"No actions recorded yet",
		state.width / 2.0,
		state.height / 2.0,
	);
	ctx.set_text_align("start");
}

/// Start point, control point and end point of an edge's curve.
fn edge_geometry(
	state: &ActionGraphState,
	source: &PositionedNode,
	target: &PositionedNode,
	offset: f64,
) -> ((f64, f64), (f64, f64), (f64, f64)) {
	let (w, h) = (state.config.node_width, state.config.node_height);
	let (start, end, bend) = if target.x > source.x {
		((source.x + w, source.y + h / 2.0), (target.x, target.y + h / 2.0), 0.0)
	} else if target.x < source.x {
		((source.x, source.y + h / 2.0), (target.x + w, target.y + h / 2.0), 0.0)
	} else {
		// Same column: leave from the side and bow outwards.
		((source.x + w, source.y + h / 2.0), (target.x + w, target.y + h / 2.0), w / 3.0)
	};

	let (dx, dy) = (end.0 - start.0, end.1 - start.1);
	let dist = (dx * dx + dy * dy).sqrt().max(0.001);
	// Left-hand normal of the edge's own direction.
	let (nx, ny) = (-dy / dist, dx / dist);
	let lateral = offset * 2.0;
	let control = (
		(start.0 + end.0) / 2.0 + nx * lateral + bend,
		(start.1 + end.1) / 2.0 + ny * lateral,
	);
	(start, control, end)
}

fn draw_edge(state: &ActionGraphState, ctx: &CanvasRenderingContext2d, edge: &StyledEdge) {
	let (Some(source), Some(target)) = (state.layout.node(&edge.source), state.layout.node(&edge.target)) else {
		return;
	};
	let k = state.transform.k;
	let alpha = edge.opacity * edge.emphasis;

	ctx.set_global_alpha(alpha);
	ctx.set_stroke_style_str(edge.color);
	ctx.set_fill_style_str(edge.color);
	ctx.set_line_width(edge.width);

	if edge.source == edge.target {
		let (cx, cy) = (source.x + state.config.node_width / 2.0, source.y);
		ctx.begin_path();
		let _ = ctx.arc(cx, cy, 12.0, PI, 2.0 * PI);
		ctx.stroke();
		return;
	}

	let (start, control, end) = edge_geometry(state, source, target, edge.offset);
	ctx.begin_path();
	ctx.move_to(start.0, start.1);
	ctx.quadratic_curve_to(control.0, control.1, end.0, end.1);
	ctx.stroke();

	let (tx, ty) = (end.0 - control.0, end.1 - control.1);
	let tl = (tx * tx + ty * ty).sqrt();
	if tl > 0.001 {
		let (ux, uy) = (tx / tl, ty / tl);
		let arrow = 6.0 + edge.width;
		let (back_x, back_y) = (end.0 - ux * arrow, end.1 - uy * arrow);
		let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);
		ctx.begin_path();
		ctx.move_to(end.0, end.1);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}

	if k > 0.6 && edge.emphasis >= 1.0 {
		let mid_x = 0.25 * start.0 + 0.5 * control.0 + 0.25 * end.0;
		let mid_y = 0.25 * start.1 + 0.5 * control.1 + 0.25 * end.1;
		ctx.set_global_alpha(alpha.max(0.5));
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
		ctx.set_font("10px sans-serif");
		let _ = ctx.fill_text(&edge.label, mid_x + 4.0, mid_y - 4.0);
	}
}

fn draw_node(
	state: &ActionGraphState,
	ctx: &CanvasRenderingContext2d,
	node: &PositionedNode,
	hovered: bool,
) {
	let (w, h) = (state.config.node_width, state.config.node_height);
	let k = state.transform.k;

	if node.is_current {
		let (cx, cy) = (node.x + w / 2.0, node.y + h / 2.0);
		if let Ok(gradient) = ctx.create_radial_gradient(cx, cy, h / 2.0, cx, cy, w * 0.75) {
			let _ = gradient.add_color_stop(0.0, "rgba(46, 204, 113, 0.35)");
			let _ = gradient.add_color_stop(1.0, "rgba(46, 204, 113, 0)");
			ctx.set_global_alpha(node.emphasis);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill_rect(node.x - w / 4.0, node.y - h, w * 1.5, h * 3.0);
		}
	}

	ctx.set_global_alpha(node.emphasis);
	ctx.set_fill_style_str("#24243e");
	ctx.fill_rect(node.x, node.y, w, h);
	ctx.set_fill_style_str(node.color);
	ctx.fill_rect(node.x, node.y, 5.0, h);

	let (border, border_width) = if node.is_current {
		("#2ecc71", 2.5)
	} else if hovered {
		("white", 1.5)
	} else {
		("rgba(255, 255, 255, 0.25)", 1.0)
	};
	ctx.set_stroke_style_str(border);
	ctx.set_line_width(border_width / k.max(0.5));
	ctx.stroke_rect(node.x, node.y, w, h);

	let title: String = node.title().chars().take(TITLE_CHARS).collect();
	ctx.set_fill_style_str("white");
	ctx.set_font("12px sans-serif");
	let _ = ctx.fill_text(&title, node.x + 12.0, node.y + 17.0);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
	ctx.set_font("10px sans-serif");
	let meta = format!("{} · {}", node.kind.as_str(), node.count);
	let _ = ctx.fill_text(&meta, node.x + 12.0, node.y + 32.0);
	ctx.set_global_alpha(1.0);
}
