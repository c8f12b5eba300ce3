//! Rectangle intersection and box-selection queries.

use crate::id::NodeId;
use crate::model::{NodeData, Rect};

/// Strict AABB overlap test. Rectangles that merely share an edge do not
/// count as intersecting.
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Ids of every node whose bounds overlap the selection box.
/// Order follows the node list (paint order).
pub fn nodes_in_box(nodes: &[NodeData], selection: &Rect) -> Vec<NodeId> {
    nodes
        .iter()
        .filter(|n| rects_intersect(selection, &n.rect()))
        .map(|n| n.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeStyle;

    fn node(id: &str, x: f32, y: f32, w: f32, h: f32) -> NodeData {
        NodeData {
            id: NodeId::intern(id),
            x,
            y,
            width: w,
            height: h,
            text: String::new(),
            style: NodeStyle::default(),
        }
    }

    #[test]
    fn overlap_and_touch() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(rects_intersect(&a, &b));
        // Exactly touching edges do not intersect
        assert!(!rects_intersect(&a, &c));
    }

    #[test]
    fn box_selection_collects_overlapping_ids() {
        let nodes = vec![
            node("a", 0.0, 0.0, 10.0, 10.0),
            node("b", 50.0, 50.0, 10.0, 10.0),
            node("c", 8.0, 8.0, 10.0, 10.0),
        ];
        let hit = nodes_in_box(&nodes, &Rect::new(0.0, 0.0, 12.0, 12.0));
        assert_eq!(hit, vec![NodeId::intern("a"), NodeId::intern("c")]);
    }

    #[test]
    fn empty_box_selects_nothing() {
        let nodes = vec![node("a", 0.0, 0.0, 10.0, 10.0)];
        let hit = nodes_in_box(&nodes, &Rect::new(100.0, 100.0, 5.0, 5.0));
        assert!(hit.is_empty());
    }
}
