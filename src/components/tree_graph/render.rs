use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{NODE_RADIUS, TreeGraphState};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#fdfaf2");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);

	let mut positions = std::collections::HashMap::new();
	state.graph.visit_nodes(|node| {
		positions.insert(node.index(), (node.x() as f64, node.y() as f64));
	});

	for edge in state.edges() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};

		// t=0: every edge at base alpha; t=1: hovered edges bright, the rest faded
		let is_highlighted =
			state.is_highlighted(edge.source) && state.is_highlighted(edge.target);
		let base = state.edge_width(edge.weight) / k;
		let (alpha, width) = if is_highlighted {
			(0.7 + 0.3 * t, base * (1.0 + 0.3 * t))
		} else {
			(0.7 - 0.55 * t, base * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(111, 83, 6, {})", alpha));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		if is_highlighted && t > 0.01 {
			ctx.set_fill_style_str(&format!("rgba(22, 22, 21, {})", t));
			ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
			let _ = ctx.fill_text(
				&format!("{:.3}", edge.weight),
				(x1 + x2) / 2.0 + 3.0,
				(y1 + y2) / 2.0 - 3.0,
			);
		}
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	(x, y): (f64, f64),
	radius: f64,
	color: &str,
	label: &str,
	k: f64,
	alpha: f64,
) {
	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
	ctx.set_stroke_style_str("#161615");
	ctx.set_line_width(1.5 / k);
	ctx.stroke();

	ctx.set_fill_style_str("#161615");
	ctx.set_font(&format!("bold {}px sans-serif", 11.0 / k.max(0.5)));
	let _ = ctx.fill_text(label, x + radius + 3.0, y + 4.0);
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &TreeGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		draw_node(
			ctx,
			(node.x() as f64, node.y() as f64),
			NODE_RADIUS * (1.0 - 0.15 * t),
			&info.color,
			&info.id,
			k,
			1.0 - 0.7 * t,
		);
	});

	if let Some(selected) = state.selected {
		state.graph.visit_nodes(|node| {
			if node.index() != selected {
				return;
			}
			ctx.begin_path();
			let _ = ctx.arc(
				node.x() as f64,
				node.y() as f64,
				NODE_RADIUS + 4.0 / k,
				0.0,
				2.0 * PI,
			);
			ctx.set_stroke_style_str("#F1B40E");
			ctx.set_line_width(3.0 / k);
			ctx.stroke();
		});
	}

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let radius = if state.is_hovered(idx) {
			NODE_RADIUS * (1.0 + 0.35 * t)
		} else {
			NODE_RADIUS * (1.0 + 0.2 * t)
		};
		let info = &node.data.user_data;
		draw_node(
			ctx,
			(node.x() as f64, node.y() as f64),
			radius,
			&info.color,
			&info.id,
			k,
			1.0,
		);
	});
}
