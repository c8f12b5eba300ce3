//! Spatial hash grid over obstacle rectangles.
//!
//! Buckets each obstacle into every fixed-size cell its bounds overlap so
//! the collision resolver can ask "which obstacles are near this swept
//! box" without an O(n²) pairwise scan. The grid is built once per
//! resolver call — obstacles don't move during a single drag gesture —
//! and indexes into the caller's obstacle slice rather than cloning.

use crate::model::Rect;
use std::collections::HashMap;

/// Default cell edge length in logical units.
pub const CELL_SIZE: f32 = 100.0;

/// Cell-bucketed index over a slice of obstacle rectangles.
pub struct SpatialGrid {
    cell: f32,
    buckets: HashMap<(i64, i64), Vec<usize>>,
    len: usize,
}

impl SpatialGrid {
    /// Build the index with the given cell size.
    pub fn build(obstacles: &[Rect], cell: f32) -> Self {
        let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, r) in obstacles.iter().enumerate() {
            let (c0, c1, r0, r1) = cell_span(r, cell);
            for c in c0..=c1 {
                for row in r0..=r1 {
                    buckets.entry((c, row)).or_default().push(i);
                }
            }
        }
        Self {
            cell,
            buckets,
            len: obstacles.len(),
        }
    }

    /// Indices of obstacles registered in any cell the swept box touches:
    /// the union of `probe` and `probe` shifted by `(dx, dy)`. Deduplicated,
    /// in ascending index order.
    pub fn query_swept(&self, probe: &Rect, dx: f32, dy: f32) -> Vec<usize> {
        let swept = Rect::new(
            probe.x.min(probe.x + dx),
            probe.y.min(probe.y + dy),
            probe.width + dx.abs(),
            probe.height + dy.abs(),
        );
        let (c0, c1, r0, r1) = cell_span(&swept, self.cell);

        // Indices are dense, so a seen-flag per obstacle beats a hash set.
        let mut seen = vec![false; self.len];
        let mut out = Vec::new();
        for c in c0..=c1 {
            for row in r0..=r1 {
                if let Some(bucket) = self.buckets.get(&(c, row)) {
                    for &i in bucket {
                        if !seen[i] {
                            seen[i] = true;
                            out.push(i);
                        }
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }
}

/// Inclusive (col, col, row, row) range of cells a rect overlaps.
fn cell_span(r: &Rect, cell: f32) -> (i64, i64, i64, i64) {
    (
        (r.x / cell).floor() as i64,
        (r.right() / cell).floor() as i64,
        (r.y / cell).floor() as i64,
        (r.bottom() / cell).floor() as i64,
    )
}
