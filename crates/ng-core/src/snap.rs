//! Grid snapping and drag-step quantization.

use crate::collide::resolve_delta;
use crate::id::NodeId;
use crate::model::{GridConfig, NodeData, Point};

/// Round each component to the nearest multiple of `unit`.
fn quantize(v: f32, unit: f32) -> f32 {
    (v / unit).round() * unit
}

/// Snap a delta so the *target position* (anchor + delta) lands on the
/// grid, rather than snapping the delta itself. Used for single-node
/// placement where the anchor may already be off-grid.
pub fn snap_delta(delta: Point, anchor: Point, unit: f32) -> Point {
    let snap = |d: f32, origin: f32| quantize(origin + d, unit) - origin;
    Point::new(snap(delta.x, anchor.x), snap(delta.y, anchor.y))
}

/// Convert a raw per-frame pointer delta into the step actually applied
/// to the selection: quantize to `base_unit × snap_step` (a zero unit
/// disables snapping), then limit against obstacles when collision
/// avoidance is on.
///
/// Called once per animation-frame tick during a drag; the event layer is
/// responsible for coalescing pointer-move events down to that rate.
pub fn compute_drag_step(
    nodes: &[NodeData],
    selected: &[NodeId],
    delta: Point,
    config: &GridConfig,
    collision_enabled: bool,
) -> Point {
    let unit = config.base_unit * config.snap_step;
    let desired = if unit > 0.0 {
        Point::new(quantize(delta.x, unit), quantize(delta.y, unit))
    } else {
        delta
    };

    if !collision_enabled {
        return desired;
    }

    let selected_rects: Vec<_> = nodes
        .iter()
        .filter(|n| selected.contains(&n.id))
        .map(|n| n.rect())
        .collect();
    let obstacle_rects: Vec<_> = nodes
        .iter()
        .filter(|n| !selected.contains(&n.id))
        .map(|n| n.rect())
        .collect();
    resolve_delta(&selected_rects, &obstacle_rects, desired)
}
