//! Capability facets for extensions.
//!
//! Embedders hand extension code a narrow trait object instead of the
//! whole `EditorStore`: viewport control, node editing, layout, and UI
//! state are separate facets, so an extension that only aligns nodes
//! cannot also rewrite the document. All four are implemented by
//! `EditorStore` through plain forwarding.

use crate::store::{EditorStore, StylePatch};
use ng_core::model::{NodeData, NodeStyle, Point, Viewport};
use ng_core::NodeId;

/// Pan/zoom/focus control.
pub trait ViewportOps {
    fn set_pan(&mut self, pan: Point);
    fn set_scale(&mut self, scale: f32);
    fn set_pan_scale(&mut self, pan: Point, scale: f32);
    fn zoom_at(&mut self, screen: Point, wheel_delta: f32);
    fn focus_to(&mut self, container_w: f32, container_h: f32);
    fn canvas_point(&self, screen: Point) -> Point;
    fn view(&self) -> Viewport;
}

/// Document mutation: node CRUD and size maintenance.
pub trait NodeOps {
    fn make_node(&self, text: &str, at: Point, style: NodeStyle) -> NodeData;
    fn add_node(&mut self, node: NodeData, select: bool) -> NodeId;
    fn delete_selected(&mut self);
    fn update_node_text(&mut self, id: NodeId, text: &str);
    fn update_selected_style(&mut self, patch: &StylePatch);
    fn recalc_all_sizes(&mut self);
    fn snap_selected_to_grid(&mut self);
    fn nodes(&self) -> &[NodeData];
}

/// Alignment and distribution over the current selection.
pub trait LayoutOps {
    fn align_selected_left(&mut self);
    fn align_selected_top(&mut self);
    fn align_selected_right(&mut self);
    fn align_selected_bottom(&mut self);
    fn distribute_selected_horizontally(&mut self);
    fn distribute_selected_vertically(&mut self);
}

/// Selection and view-state toggles.
pub trait UiOps {
    fn set_selected(&mut self, ids: Vec<NodeId>);
    fn clear_selected(&mut self);
    fn toggle_selected(&mut self, id: NodeId);
    fn selected(&self) -> &[NodeId];
    fn set_show_debug_grid(&mut self, v: bool);
    fn toggle_show_debug_grid(&mut self);
    fn toggle_snap_on_release(&mut self);
    fn set_collision_enabled(&mut self, v: bool);
    fn toggle_collision(&mut self);
}

impl ViewportOps for EditorStore {
    fn set_pan(&mut self, pan: Point) {
        EditorStore::set_pan(self, pan);
    }
    fn set_scale(&mut self, scale: f32) {
        EditorStore::set_scale(self, scale);
    }
    fn set_pan_scale(&mut self, pan: Point, scale: f32) {
        EditorStore::set_pan_scale(self, pan, scale);
    }
    fn zoom_at(&mut self, screen: Point, wheel_delta: f32) {
        EditorStore::zoom_at(self, screen, wheel_delta);
    }
    fn focus_to(&mut self, container_w: f32, container_h: f32) {
        EditorStore::focus_to(self, container_w, container_h);
    }
    fn canvas_point(&self, screen: Point) -> Point {
        EditorStore::canvas_point(self, screen)
    }
    fn view(&self) -> Viewport {
        EditorStore::view(self)
    }
}

impl NodeOps for EditorStore {
    fn make_node(&self, text: &str, at: Point, style: NodeStyle) -> NodeData {
        EditorStore::make_node(self, text, at, style)
    }
    fn add_node(&mut self, node: NodeData, select: bool) -> NodeId {
        EditorStore::add_node(self, node, select)
    }
    fn delete_selected(&mut self) {
        EditorStore::delete_selected(self);
    }
    fn update_node_text(&mut self, id: NodeId, text: &str) {
        EditorStore::update_node_text(self, id, text);
    }
    fn update_selected_style(&mut self, patch: &StylePatch) {
        EditorStore::update_selected_style(self, patch);
    }
    fn recalc_all_sizes(&mut self) {
        EditorStore::recalc_all_sizes(self);
    }
    fn snap_selected_to_grid(&mut self) {
        EditorStore::snap_selected_to_grid(self);
    }
    fn nodes(&self) -> &[NodeData] {
        EditorStore::nodes(self)
    }
}

impl LayoutOps for EditorStore {
    fn align_selected_left(&mut self) {
        EditorStore::align_selected_left(self);
    }
    fn align_selected_top(&mut self) {
        EditorStore::align_selected_top(self);
    }
    fn align_selected_right(&mut self) {
        EditorStore::align_selected_right(self);
    }
    fn align_selected_bottom(&mut self) {
        EditorStore::align_selected_bottom(self);
    }
    fn distribute_selected_horizontally(&mut self) {
        EditorStore::distribute_selected_horizontally(self);
    }
    fn distribute_selected_vertically(&mut self) {
        EditorStore::distribute_selected_vertically(self);
    }
}

impl UiOps for EditorStore {
    fn set_selected(&mut self, ids: Vec<NodeId>) {
        EditorStore::set_selected(self, ids);
    }
    fn clear_selected(&mut self) {
        EditorStore::clear_selected(self);
    }
    fn toggle_selected(&mut self, id: NodeId) {
        EditorStore::toggle_selected(self, id);
    }
    fn selected(&self) -> &[NodeId] {
        EditorStore::selected(self)
    }
    fn set_show_debug_grid(&mut self, v: bool) {
        EditorStore::set_show_debug_grid(self, v);
    }
    fn toggle_show_debug_grid(&mut self) {
        EditorStore::toggle_show_debug_grid(self);
    }
    fn toggle_snap_on_release(&mut self) {
        EditorStore::toggle_snap_on_release(self);
    }
    fn set_collision_enabled(&mut self, v: bool) {
        EditorStore::set_collision_enabled(self, v);
    }
    fn toggle_collision(&mut self) {
        EditorStore::toggle_collision(self);
    }
}
