//! Collision-aware drag resolution.
//!
//! Given the rectangles being dragged and the static obstacles around
//! them, `resolve_delta` limits a desired displacement to the largest
//! same-sign displacement that doesn't push any selected rectangle into
//! an obstacle it wasn't already overlapping. It is a movement limiter,
//! not a physics solver: pre-existing penetration is never corrected, and
//! motion away from contact is never restricted.
//!
//! Resolution runs per axis, X then Y — the resolved X shift decides
//! which obstacles are horizontally in range for the Y check, so diagonal
//! moves settle consistently. The full delta is split into sub-steps of
//! at most a quarter grid cell so a fast drag can't tunnel through a thin
//! obstacle between two frames.

use crate::grid::{CELL_SIZE, SpatialGrid};
use crate::model::{Point, Rect};

/// Tolerance for overlap comparisons: rectangles exactly sharing an edge
/// must not register as overlapping.
pub const EPS: f32 = 0.0001;

/// Sub-step cap; beyond this, longer drags just take coarser steps.
const MAX_SUB_STEPS: u32 = 40;

/// Resolve a desired displacement for `selected` against `obstacles`.
///
/// The result satisfies `|out.x| <= |delta.x|`, `|out.y| <= |delta.y|`,
/// with each component keeping the input's sign or collapsing to zero.
/// Empty selection or obstacle set passes the delta through unchanged.
pub fn resolve_delta(selected: &[Rect], obstacles: &[Rect], delta: Point) -> Point {
    if selected.is_empty() || obstacles.is_empty() {
        return delta;
    }
    if delta.x == 0.0 && delta.y == 0.0 {
        return delta;
    }

    // Obstacles are static for the whole gesture: index once per call.
    let grid = SpatialGrid::build(obstacles, CELL_SIZE);

    let max_component = delta.x.abs().max(delta.y.abs());
    let steps = ((max_component / (CELL_SIZE / 4.0)).ceil() as u32).clamp(1, MAX_SUB_STEPS);
    let sub = Point::new(delta.x / steps as f32, delta.y / steps as f32);

    let mut working: Vec<Rect> = selected.to_vec();
    let mut accumulated = Point::ZERO;

    for _ in 0..steps {
        let allowed = resolve_step(&working, obstacles, &grid, sub);
        if allowed.x == 0.0 && allowed.y == 0.0 {
            // Fully blocked; remaining sub-steps can't make progress.
            log::trace!(
                "resolve_delta blocked at ({}, {}) of ({}, {})",
                accumulated.x,
                accumulated.y,
                delta.x,
                delta.y
            );
            break;
        }
        for r in &mut working {
            r.x += allowed.x;
            r.y += allowed.y;
        }
        accumulated.x += allowed.x;
        accumulated.y += allowed.y;
    }

    accumulated
}

/// One sub-step of axis-sequential clamping. The most restrictive clamp
/// across all selected×obstacle pairs wins for each axis.
fn resolve_step(selected: &[Rect], obstacles: &[Rect], grid: &SpatialGrid, sub: Point) -> Point {
    let mut dx = sub.x;
    let mut dy = sub.y;

    if dx != 0.0 {
        let mut allowed = dx;
        for s in selected {
            for &i in &grid.query_swept(s, dx, 0.0) {
                let o = &obstacles[i];
                let vert_overlap = s.bottom() > o.y + EPS && s.y < o.bottom() - EPS;
                if !vert_overlap {
                    continue;
                }
                if dx > 0.0 {
                    let proposed_right = s.right() + allowed;
                    if proposed_right > o.x && s.right() <= o.x {
                        allowed = allowed.min(o.x - s.right());
                    }
                } else {
                    let proposed_left = s.x + allowed;
                    if proposed_left < o.right() && s.x >= o.right() {
                        allowed = allowed.max(o.right() - s.x);
                    }
                }
            }
        }
        dx = allowed;
    }

    if dy != 0.0 {
        let mut allowed = dy;
        for s in selected {
            // The X axis already resolved: test horizontal range at the
            // shifted position so diagonal moves see the right obstacles.
            let shifted_x = s.x + dx;
            for &i in &grid.query_swept(s, dx, dy) {
                let o = &obstacles[i];
                let hor_overlap =
                    shifted_x + s.width > o.x + EPS && shifted_x < o.right() - EPS;
                if !hor_overlap {
                    continue;
                }
                if dy > 0.0 {
                    let proposed_bottom = s.bottom() + allowed;
                    if proposed_bottom > o.y && s.bottom() <= o.y {
                        allowed = allowed.min(o.y - s.bottom());
                    }
                } else {
                    let proposed_top = s.y + allowed;
                    if proposed_top < o.bottom() && s.y >= o.bottom() {
                        allowed = allowed.max(o.bottom() - s.y);
                    }
                }
            }
        }
        dy = allowed;
    }

    Point::new(dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn passthrough_without_obstacles() {
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let out = resolve_delta(&selected, &[], Point::new(20.0, 5.0));
        assert_eq!(out, Point::new(20.0, 5.0));
    }

    #[test]
    fn passthrough_without_selection() {
        let obstacles = vec![rect(60.0, 0.0, 50.0, 20.0)];
        let out = resolve_delta(&[], &obstacles, Point::new(20.0, 5.0));
        assert_eq!(out, Point::new(20.0, 5.0));
    }

    #[test]
    fn clamps_rightward_motion_at_obstacle() {
        // right edge at 50, obstacle at 60: 10 units of clearance
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(60.0, 0.0, 50.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(20.0, 0.0));
        assert_eq!(out.x, 10.0);
        assert_eq!(out.y, 0.0);
    }

    #[test]
    fn clamps_leftward_motion_at_obstacle() {
        let selected = vec![rect(100.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(0.0, 0.0, 80.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(-40.0, 0.0));
        assert_eq!(out.x, -20.0);
    }

    #[test]
    fn min_clamp_across_selection() {
        // a: right=50, obstacle at 60 → cap 10. c: right=170, obstacle at 190 → cap 20.
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0), rect(120.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(60.0, 0.0, 50.0, 20.0), rect(190.0, 0.0, 50.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(25.0, 0.0));
        assert_eq!(out.x, 10.0);
        assert_eq!(out.y, 0.0);
    }

    #[test]
    fn no_clamp_when_vertical_ranges_disjoint() {
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(60.0, 100.0, 50.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(30.0, 0.0));
        assert_eq!(out.x, 30.0);
    }

    #[test]
    fn touching_edges_do_not_block() {
        // Obstacle sits exactly below: shared horizontal edge, no overlap.
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(60.0, 20.0, 50.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(30.0, 0.0));
        assert_eq!(out.x, 30.0);
    }

    #[test]
    fn vertical_motion_clamped() {
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(0.0, 35.0, 50.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(0.0, 40.0));
        assert_eq!(out.y, 15.0);
    }

    #[test]
    fn no_tunneling_through_thin_obstacle() {
        // 10-wide obstacle (well under cell/4) in the path of a 300-unit drag
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(100.0, 0.0, 10.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(300.0, 0.0));
        // Leading edge stops at the obstacle boundary instead of passing it
        assert_eq!(out.x, 50.0);
    }

    #[test]
    fn diagonal_resolves_x_before_y() {
        // Moving down-right: obstacle blocks X at 10; after the X clamp the
        // rect is horizontally clear of the lower obstacle, so Y passes.
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(60.0, 0.0, 20.0, 20.0), rect(200.0, 30.0, 20.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(20.0, 15.0));
        assert_eq!(out.x, 10.0);
        assert_eq!(out.y, 15.0);
    }

    #[test]
    fn preexisting_overlap_not_pushed_out() {
        // Already penetrating: s.right() > o.x, so the crossing guard never
        // fires and motion continues unimpeded (limiter, not solver).
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(40.0, 0.0, 50.0, 20.0)];
        let out = resolve_delta(&selected, &obstacles, Point::new(5.0, 0.0));
        assert_eq!(out.x, 5.0);
    }

    #[test]
    fn monotone_and_sign_preserving() {
        let selected = vec![rect(0.0, 0.0, 50.0, 20.0)];
        let obstacles = vec![rect(60.0, 0.0, 50.0, 20.0)];
        for desired in [5.0_f32, 10.0, 15.0, 80.0, 300.0] {
            let out = resolve_delta(&selected, &obstacles, Point::new(desired, 0.0));
            assert!(out.x.abs() <= desired.abs());
            assert!(out.x >= 0.0);
        }
    }
}
