//! Viewport math: screen↔canvas transforms, anchored zoom, focus/fit.
//!
//! Screen (client) coordinates are pixels relative to the container
//! origin; canvas coordinates are the pan/zoom-independent space nodes
//! live in. All functions here are pure.

use crate::id::NodeId;
use crate::model::{NodeData, Point, Viewport};

/// Default scale bounds for wheel zoom.
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 10.0;
/// Scale change per wheel-delta unit.
pub const ZOOM_SPEED: f32 = 0.001;

/// Map a screen point (relative to the container origin) to canvas space.
pub fn canvas_point(view: &Viewport, screen: Point) -> Point {
    Point::new(
        (screen.x - view.pan.x) / view.scale,
        (screen.y - view.pan.y) / view.scale,
    )
}

/// Compute the pan/scale after a wheel-zoom gesture anchored at `screen`.
///
/// The canvas point under the anchor stays mapped to the same screen
/// pixel, so the content doesn't jump under the cursor while zooming.
pub fn zoom_at_point(
    view: &Viewport,
    screen: Point,
    wheel_delta: f32,
    min: f32,
    max: f32,
    speed: f32,
) -> Viewport {
    let factor = 1.0 - wheel_delta * speed;
    let new_scale = (view.scale * factor).clamp(min, max);
    let anchor_canvas = canvas_point(view, screen);
    Viewport {
        pan: Point::new(
            screen.x - anchor_canvas.x * new_scale,
            screen.y - anchor_canvas.y * new_scale,
        ),
        scale: new_scale,
    }
}

/// Compute the pan/scale that fits the selected nodes (or all nodes when
/// the selection is empty) into a `container_w × container_h` viewport
/// with `padding` logical units spare. Empty documents yield the identity
/// view. Scale is clamped to `[0.1, 4]`; a degenerate zero-size bounding
/// box is floored to 1×1 to avoid dividing by zero.
pub fn compute_focus(
    container_w: f32,
    container_h: f32,
    nodes: &[NodeData],
    selected: &[NodeId],
    padding: f32,
) -> Viewport {
    let mut targets: Vec<&NodeData> = nodes.iter().filter(|n| selected.contains(&n.id)).collect();
    if targets.is_empty() {
        targets = nodes.iter().collect();
    }
    if targets.is_empty() {
        return Viewport {
            pan: Point::ZERO,
            scale: 1.0,
        };
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for n in &targets {
        min_x = min_x.min(n.x);
        min_y = min_y.min(n.y);
        max_x = max_x.max(n.x + n.width);
        max_y = max_y.max(n.y + n.height);
    }

    let content_w = (max_x - min_x).max(1.0);
    let content_h = (max_y - min_y).max(1.0);
    let center_x = min_x + content_w / 2.0;
    let center_y = min_y + content_h / 2.0;

    let scale_x = (container_w - padding) / content_w;
    let scale_y = (container_h - padding) / content_h;
    let scale = scale_x.min(scale_y).clamp(0.1, 4.0);

    Viewport {
        pan: Point::new(
            container_w / 2.0 - center_x * scale,
            container_h / 2.0 - center_y * scale,
        ),
        scale,
    }
}
