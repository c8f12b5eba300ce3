//! The editor store: single mutation funnel over the live document.
//!
//! All node, selection, and viewport mutation goes through this type so
//! the core invariants hold everywhere: node sizes are always derived
//! from text + style + config, ids stay unique, and every document
//! mutation lands in the debounced snapshot pipeline (history push +
//! autosave write after the quiet period). Callers drive time explicitly
//! via `tick()` — the store owns no timer thread.

use crate::doc::{
    CanvasSnapshot, center_nodes_at, parse_clipboard, restore_snapshot, serialize_clipboard,
    serialize_snapshot,
};
use crate::history::HistoryStack;
use crate::io::{Autosave, Storage, StorageError};
use crate::scheduler::{Clock, SnapshotScheduler};
use ng_core::model::{GridConfig, NodeData, NodeStyle, Point, Rect, TextAlign, Viewport};
use ng_core::view::{ZOOM_MAX, ZOOM_MIN, ZOOM_SPEED};
use ng_core::{
    NodeId, calculate_node_size, canvas_point, compute_drag_step, compute_focus, nodes_in_box,
    zoom_at_point,
};
use std::rc::Rc;

/// Default focus/fit padding in logical units.
const FOCUS_PADDING: f32 = 100.0;

/// Partial style update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct StylePatch {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_size: Option<f32>,
    pub is_bold: Option<bool>,
    pub text_align: Option<TextAlign>,
}

impl StylePatch {
    fn apply(&self, style: &mut NodeStyle) {
        if let Some(v) = &self.background_color {
            style.background_color = v.clone();
        }
        if let Some(v) = &self.text_color {
            style.text_color = v.clone();
        }
        if let Some(v) = self.font_size {
            style.font_size = v;
        }
        if let Some(v) = self.is_bold {
            style.is_bold = v;
        }
        if let Some(v) = self.text_align {
            style.text_align = v;
        }
    }
}

/// Active drag gesture: the anchor advances only by the applied step so
/// quantization remainders accumulate instead of getting lost.
struct DragState {
    last: Point,
    latest: Point,
}

pub struct EditorStore {
    nodes: Vec<NodeData>,
    config: GridConfig,
    view: Viewport,
    selected: Vec<NodeId>,
    collision_enabled: bool,
    show_debug_grid: bool,
    snap_on_release: bool,
    drag: Option<DragState>,
    history: HistoryStack<CanvasSnapshot>,
    scheduler: SnapshotScheduler<CanvasSnapshot>,
    clock: Rc<dyn Clock>,
    autosave: Rc<dyn Autosave>,
}

impl EditorStore {
    pub fn new(clock: Rc<dyn Clock>, autosave: Rc<dyn Autosave>) -> Self {
        let mut store = Self {
            nodes: Vec::new(),
            config: GridConfig::default(),
            view: Viewport::default(),
            selected: Vec::new(),
            collision_enabled: true,
            show_debug_grid: false,
            snap_on_release: true,
            drag: None,
            history: HistoryStack::default(),
            scheduler: SnapshotScheduler::default(),
            clock,
            autosave,
        };
        // Seed history so the pristine document is an undo target.
        let initial = store.snapshot();
        store.history.push(initial);
        store
    }

    // ─── Snapshot pipeline ───────────────────────────────────────────────

    /// Current state as an immutable snapshot.
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            nodes: self.nodes.clone(),
            config: self.config.clone(),
            view: self.view,
            show_debug_grid: self.show_debug_grid,
            selected_node_ids: self.selected.clone(),
            collision_enabled: self.collision_enabled,
        }
    }

    fn queue_snapshot(&mut self) {
        let snap = self.snapshot();
        self.scheduler.queue(snap, self.clock.now_ms());
    }

    /// Open a batch: intermediate states until `end_batch` never reach
    /// history, only the final one does.
    pub fn begin_batch(&mut self) {
        self.scheduler.begin_batch();
    }

    pub fn end_batch(&mut self) {
        self.scheduler.end_batch(self.clock.now_ms());
    }

    /// Drive the debounce. Call from the embedder's timer/frame callback;
    /// returns true when a snapshot was committed.
    pub fn tick(&mut self) -> bool {
        if let Some(snap) = self.scheduler.poll(self.clock.now_ms()) {
            log::debug!(
                "committing snapshot: {} nodes, {} selected",
                snap.nodes.len(),
                snap.selected_node_ids.len()
            );
            self.autosave.set(&serialize_snapshot(&snap));
            self.history.push(snap);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snap) => {
                self.restore(snap);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snap) => {
                self.restore(snap);
                true
            }
            None => false,
        }
    }

    /// Replace live state with a snapshot: duplicate ids are rewritten
    /// and every node re-measured, so even a snapshot from an older
    /// config version re-resolves consistently.
    fn restore(&mut self, snap: CanvasSnapshot) {
        let mut seen = std::collections::HashSet::new();
        self.nodes = snap
            .nodes
            .into_iter()
            .map(|mut n| {
                if !seen.insert(n.id) {
                    n.id = n.id.disambiguate();
                    seen.insert(n.id);
                }
                let (w, h) = calculate_node_size(&n.text, &n.style, &snap.config);
                n.width = w;
                n.height = h;
                n
            })
            .collect();
        self.config = snap.config;
        self.view = snap.view;
        self.show_debug_grid = snap.show_debug_grid;
        self.selected = snap.selected_node_ids;
        self.collision_enabled = snap.collision_enabled;
    }

    // ─── Node CRUD ───────────────────────────────────────────────────────

    /// Build a node with a fresh id and measured size, without adding it.
    pub fn make_node(&self, text: &str, at: Point, style: NodeStyle) -> NodeData {
        let (width, height) = calculate_node_size(text, &style, &self.config);
        NodeData {
            id: NodeId::generate(),
            x: at.x,
            y: at.y,
            width,
            height,
            text: text.to_string(),
            style,
        }
    }

    pub fn add_node(&mut self, node: NodeData, select: bool) -> NodeId {
        let mut node = node;
        if self.nodes.iter().any(|n| n.id == node.id) {
            node.id = node.id.disambiguate();
        }
        let id = node.id;
        self.nodes.push(node);
        if select {
            self.selected = vec![id];
        }
        self.queue_snapshot();
        id
    }

    pub fn add_nodes(&mut self, nodes: Vec<NodeData>, select: bool) -> Vec<NodeId> {
        let mut added = Vec::with_capacity(nodes.len());
        for mut node in nodes {
            if self.nodes.iter().any(|n| n.id == node.id) {
                node.id = node.id.disambiguate();
            }
            added.push(node.id);
            self.nodes.push(node);
        }
        if select {
            self.selected = added.clone();
        }
        self.queue_snapshot();
        added
    }

    pub fn delete_selected(&mut self) {
        let selected = std::mem::take(&mut self.selected);
        self.nodes.retain(|n| !selected.contains(&n.id));
        self.queue_snapshot();
    }

    /// Replace a node's text and re-derive its size.
    pub fn update_node_text(&mut self, id: NodeId, text: &str) {
        let config = self.config.clone();
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            let (w, h) = calculate_node_size(text, &node.style, &config);
            node.text = text.to_string();
            node.width = w;
            node.height = h;
            self.queue_snapshot();
        }
    }

    /// Apply a style patch to every selected node, re-deriving sizes.
    pub fn update_selected_style(&mut self, patch: &StylePatch) {
        let config = self.config.clone();
        let selected = self.selected.clone();
        for node in self.nodes.iter_mut().filter(|n| selected.contains(&n.id)) {
            patch.apply(&mut node.style);
            let (w, h) = calculate_node_size(&node.text, &node.style, &config);
            node.width = w;
            node.height = h;
        }
        self.queue_snapshot();
    }

    /// Swap the layout config and reflow every node (text wrap points may
    /// have moved).
    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
        self.recalc_all_sizes();
    }

    pub fn recalc_all_sizes(&mut self) {
        for node in &mut self.nodes {
            let (w, h) = calculate_node_size(&node.text, &node.style, &self.config);
            node.width = w;
            node.height = h;
        }
        self.queue_snapshot();
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn set_selected(&mut self, ids: Vec<NodeId>) {
        self.selected = ids;
    }

    pub fn clear_selected(&mut self) {
        self.selected.clear();
    }

    pub fn toggle_selected(&mut self, id: NodeId) {
        match self.selected.iter().position(|s| *s == id) {
            Some(i) => {
                self.selected.remove(i);
            }
            None => self.selected.push(id),
        }
    }

    /// Box selection. `additive` keeps the previous selection (shift-drag).
    pub fn select_in_box(&mut self, selection: Rect, additive: bool) {
        let hit = nodes_in_box(&self.nodes, &selection);
        if !additive {
            self.selected.clear();
        }
        for id in hit {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
    }

    // ─── Drag gesture ────────────────────────────────────────────────────

    /// Start a drag. `start` is in canvas space.
    pub fn begin_drag(&mut self, start: Point) {
        self.drag = Some(DragState {
            last: start,
            latest: start,
        });
    }

    /// Record the latest pointer position; work happens in `drag_frame`.
    /// The event layer coalesces pointer-moves down to frame rate.
    pub fn drag_pointer(&mut self, latest: Point) {
        if let Some(drag) = &mut self.drag {
            drag.latest = latest;
        }
    }

    /// One animation-frame tick of the active drag: quantize + resolve
    /// the accumulated delta and move the selection by the result.
    /// Returns the applied step.
    pub fn drag_frame(&mut self) -> Point {
        let Some(drag) = &self.drag else {
            return Point::ZERO;
        };
        let delta = Point::new(drag.latest.x - drag.last.x, drag.latest.y - drag.last.y);
        let step = compute_drag_step(
            &self.nodes,
            &self.selected,
            delta,
            &self.config,
            self.collision_enabled,
        );
        if step.x != 0.0 || step.y != 0.0 {
            let selected = &self.selected;
            for node in self.nodes.iter_mut().filter(|n| selected.contains(&n.id)) {
                node.x += step.x;
                node.y += step.y;
            }
        }
        if let Some(drag) = &mut self.drag {
            // Advance the anchor by what was applied, not what was asked:
            // the sub-unit remainder carries into the next frame.
            drag.last.x += step.x;
            drag.last.y += step.y;
        }
        step
    }

    /// Finish the drag; optionally snap the selection onto the grid
    /// (disabled when `snap_step` is 0).
    pub fn end_drag(&mut self) {
        self.drag = None;
        if self.snap_on_release && self.config.snap_step != 0.0 {
            let unit = self.config.base_unit;
            let selected = &self.selected;
            for node in self.nodes.iter_mut().filter(|n| selected.contains(&n.id)) {
                node.x = (node.x / unit).round() * unit;
                node.y = (node.y / unit).round() * unit;
            }
        }
        self.queue_snapshot();
    }

    pub fn snap_selected_to_grid(&mut self) {
        let unit = self.config.base_unit;
        let selected = &self.selected;
        for node in self.nodes.iter_mut().filter(|n| selected.contains(&n.id)) {
            node.x = (node.x / unit).round() * unit;
            node.y = (node.y / unit).round() * unit;
        }
        self.queue_snapshot();
    }

    // ─── Alignment & distribution ────────────────────────────────────────

    pub fn align_selected_left(&mut self) {
        self.align_selected(|nodes| nodes.iter().map(|n| n.x).fold(f32::INFINITY, f32::min), |n, v| n.x = v);
    }

    pub fn align_selected_top(&mut self) {
        self.align_selected(|nodes| nodes.iter().map(|n| n.y).fold(f32::INFINITY, f32::min), |n, v| n.y = v);
    }

    pub fn align_selected_right(&mut self) {
        self.align_selected(
            |nodes| {
                nodes
                    .iter()
                    .map(|n| n.x + n.width)
                    .fold(f32::NEG_INFINITY, f32::max)
            },
            |n, v| n.x = v - n.width,
        );
    }

    pub fn align_selected_bottom(&mut self) {
        self.align_selected(
            |nodes| {
                nodes
                    .iter()
                    .map(|n| n.y + n.height)
                    .fold(f32::NEG_INFINITY, f32::max)
            },
            |n, v| n.y = v - n.height,
        );
    }

    fn align_selected(
        &mut self,
        edge: impl Fn(&[&NodeData]) -> f32,
        place: impl Fn(&mut NodeData, f32),
    ) {
        if self.selected.is_empty() {
            return;
        }
        let selected = self.selected.clone();
        let targets: Vec<&NodeData> = self
            .nodes
            .iter()
            .filter(|n| selected.contains(&n.id))
            .collect();
        let v = edge(&targets);
        for node in self.nodes.iter_mut().filter(|n| selected.contains(&n.id)) {
            place(node, v);
        }
        self.queue_snapshot();
    }

    /// Equalize horizontal gaps between selected nodes. The leftmost and
    /// rightmost stay put; fewer than three selected is a no-op.
    pub fn distribute_selected_horizontally(&mut self) {
        self.distribute(|n| n.x, |n| n.width, |n, v| n.x = v);
    }

    /// Vertical counterpart of `distribute_selected_horizontally`.
    pub fn distribute_selected_vertically(&mut self) {
        self.distribute(|n| n.y, |n| n.height, |n, v| n.y = v);
    }

    fn distribute(
        &mut self,
        pos: impl Fn(&NodeData) -> f32,
        extent: impl Fn(&NodeData) -> f32,
        place: impl Fn(&mut NodeData, f32),
    ) {
        if self.selected.len() <= 2 {
            return;
        }
        let selected = self.selected.clone();
        let mut targets: Vec<&NodeData> = self
            .nodes
            .iter()
            .filter(|n| selected.contains(&n.id))
            .collect();
        targets.sort_by(|a, b| pos(a).total_cmp(&pos(b)));

        let first = targets[0];
        let last = targets[targets.len() - 1];
        let total: f32 = targets.iter().map(|n| extent(n)).sum();
        let span = pos(last) + extent(last) - pos(first);
        let gap = (span - total) / (targets.len() - 1) as f32;

        let mut cursor = pos(first) + extent(first) + gap;
        let mut placements = Vec::new();
        for n in &targets[1..targets.len() - 1] {
            placements.push((n.id, cursor));
            cursor += extent(n) + gap;
        }

        for (id, v) in placements {
            if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
                place(node, v);
            }
        }
        self.queue_snapshot();
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn set_pan(&mut self, pan: Point) {
        self.view.pan = pan;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.view.scale = scale;
    }

    pub fn set_pan_scale(&mut self, pan: Point, scale: f32) {
        self.view = Viewport { pan, scale };
    }

    /// Wheel zoom anchored at a screen point, default bounds.
    pub fn zoom_at(&mut self, screen: Point, wheel_delta: f32) {
        self.zoom_at_with(screen, wheel_delta, ZOOM_MIN, ZOOM_MAX, ZOOM_SPEED);
    }

    pub fn zoom_at_with(&mut self, screen: Point, wheel_delta: f32, min: f32, max: f32, speed: f32) {
        self.view = zoom_at_point(&self.view, screen, wheel_delta, min, max, speed);
    }

    /// Fit the selection (or everything) into the container.
    pub fn focus_to(&mut self, container_w: f32, container_h: f32) {
        self.view = compute_focus(
            container_w,
            container_h,
            &self.nodes,
            &self.selected,
            FOCUS_PADDING,
        );
    }

    /// Screen point (relative to the container origin) → canvas point.
    pub fn canvas_point(&self, screen: Point) -> Point {
        canvas_point(&self.view, screen)
    }

    // ─── Toggles ─────────────────────────────────────────────────────────

    pub fn set_collision_enabled(&mut self, v: bool) {
        self.collision_enabled = v;
    }

    pub fn toggle_collision(&mut self) {
        self.collision_enabled = !self.collision_enabled;
    }

    pub fn set_show_debug_grid(&mut self, v: bool) {
        self.show_debug_grid = v;
    }

    pub fn toggle_show_debug_grid(&mut self) {
        self.show_debug_grid = !self.show_debug_grid;
    }

    pub fn toggle_snap_on_release(&mut self) {
        self.snap_on_release = !self.snap_on_release;
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    /// Selected nodes serialized for the clipboard, or `None` when the
    /// selection is empty.
    pub fn copy_selected(&self) -> Option<String> {
        let selected: Vec<NodeData> = self
            .nodes
            .iter()
            .filter(|n| self.selected.contains(&n.id))
            .cloned()
            .collect();
        if selected.is_empty() {
            return None;
        }
        Some(serialize_clipboard(&selected))
    }

    pub fn cut_selected(&mut self) -> Option<String> {
        let payload = self.copy_selected()?;
        self.delete_selected();
        Some(payload)
    }

    /// Paste clipboard JSON centered at a canvas-space target point.
    /// Returns false (state untouched) when the text isn't node JSON.
    pub fn paste_at(&mut self, text: &str, target: Point) -> bool {
        let Some(mut nodes) = parse_clipboard(text, &self.config) else {
            return false;
        };
        center_nodes_at(&mut nodes, target);
        self.add_nodes(nodes, true);
        true
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn save_to(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        storage.save_text(&serialize_snapshot(&self.snapshot()))
    }

    pub fn save_as_to(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        storage.save_as_text(&serialize_snapshot(&self.snapshot()))
    }

    /// Load from storage. `Ok(false)` means the text was malformed; the
    /// live document is left unchanged in that case.
    pub fn load_from(&mut self, storage: &mut dyn Storage) -> Result<bool, StorageError> {
        let text = storage.load_text()?;
        Ok(self.restore_from_json(&text))
    }

    /// Restore from serialized JSON, queueing the restored state as a
    /// snapshot. Malformed input restores nothing and returns false.
    pub fn restore_from_json(&mut self, text: &str) -> bool {
        match restore_snapshot(text) {
            Some(snap) => {
                self.restore(snap);
                self.queue_snapshot();
                true
            }
            None => false,
        }
    }

    /// Best-effort restore from the autosave slot.
    pub fn load_autosave(&mut self) -> bool {
        match self.autosave.get() {
            Some(text) => self.restore_from_json(&text),
            None => false,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[NodeData] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn view(&self) -> Viewport {
        self.view
    }

    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    pub fn show_debug_grid(&self) -> bool {
        self.show_debug_grid
    }

    pub fn snap_on_release(&self) -> bool {
        self.snap_on_release
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryAutosave;
    use crate::scheduler::{ManualClock, SNAPSHOT_DEBOUNCE_MS};
    use pretty_assertions::assert_eq;

    fn fixture() -> (EditorStore, Rc<ManualClock>, Rc<MemoryAutosave>) {
        let clock = Rc::new(ManualClock::default());
        let autosave = Rc::new(MemoryAutosave::default());
        let store = EditorStore::new(clock.clone(), autosave.clone());
        (store, clock, autosave)
    }

    fn settle(store: &mut EditorStore, clock: &ManualClock) {
        clock.advance(SNAPSHOT_DEBOUNCE_MS);
        store.tick();
    }

    #[test]
    fn add_node_derives_size_and_selects() {
        let (mut store, _, _) = fixture();
        let node = store.make_node("hello", Point::new(10.0, 20.0), NodeStyle::default());
        let id = store.add_node(node, true);
        let n = store.node(id).unwrap();
        assert!(n.width >= store.config().base_unit * 2.0);
        assert_eq!(store.selected(), &[id]);
    }

    #[test]
    fn add_node_disambiguates_duplicate_id() {
        let (mut store, _, _) = fixture();
        let mut a = store.make_node("a", Point::ZERO, NodeStyle::default());
        a.id = NodeId::intern("fixed");
        let mut b = store.make_node("b", Point::ZERO, NodeStyle::default());
        b.id = NodeId::intern("fixed");
        let first = store.add_node(a, false);
        let second = store.add_node(b, false);
        assert_ne!(first, second);
        assert_eq!(store.nodes().len(), 2);
    }

    #[test]
    fn text_update_reflows_size() {
        let (mut store, _, _) = fixture();
        let node = store.make_node("a", Point::ZERO, NodeStyle::default());
        let id = store.add_node(node, false);
        let h1 = store.node(id).unwrap().height;
        store.update_node_text(id, "a\nb\nc");
        assert!(store.node(id).unwrap().height > h1);
    }

    #[test]
    fn config_change_reflows_every_node() {
        let (mut store, _, _) = fixture();
        let long: String = "a".repeat(100);
        let node = store.make_node(&long, Point::ZERO, NodeStyle::default());
        let id = store.add_node(node, false);
        let h1 = store.node(id).unwrap().height;
        // Narrower max width forces more wrapping
        let mut cfg = store.config().clone();
        cfg.max_node_width_units = 20.0;
        store.set_config(cfg);
        assert!(store.node(id).unwrap().height > h1);
    }

    #[test]
    fn undo_redo_roundtrip_through_debounce() {
        let (mut store, clock, _) = fixture();
        let node = store.make_node("a", Point::ZERO, NodeStyle::default());
        let id = store.add_node(node, false);
        settle(&mut store, &clock);

        store.update_node_text(id, "changed");
        settle(&mut store, &clock);

        assert!(store.undo());
        assert_eq!(store.node(id).unwrap().text, "a");
        assert!(store.redo());
        assert_eq!(store.node(id).unwrap().text, "changed");
    }

    #[test]
    fn mutation_after_undo_clears_redo() {
        let (mut store, clock, _) = fixture();
        let node = store.make_node("a", Point::ZERO, NodeStyle::default());
        let id = store.add_node(node, false);
        settle(&mut store, &clock);
        store.update_node_text(id, "b");
        settle(&mut store, &clock);

        assert!(store.undo());
        assert!(store.can_redo());
        store.update_node_text(id, "c");
        settle(&mut store, &clock);
        assert!(!store.can_redo());
        assert!(!store.redo());
    }

    #[test]
    fn rapid_edits_collapse_to_one_history_entry() {
        let (mut store, clock, _) = fixture();
        let node = store.make_node("", Point::ZERO, NodeStyle::default());
        let id = store.add_node(node, false);
        settle(&mut store, &clock);

        // Simulated keystrokes inside one quiet period
        for text in ["h", "he", "hel", "hell", "hello"] {
            store.update_node_text(id, text);
            clock.advance(50);
            store.tick();
        }
        settle(&mut store, &clock);

        assert!(store.undo());
        // One undo steps over the whole burst
        assert_eq!(store.node(id).unwrap().text, "");
    }

    #[test]
    fn batch_suppresses_intermediate_snapshots() {
        let (mut store, clock, _) = fixture();
        let node = store.make_node("start", Point::ZERO, NodeStyle::default());
        let id = store.add_node(node, false);
        settle(&mut store, &clock);

        store.begin_batch();
        store.update_node_text(id, "step1");
        settle(&mut store, &clock); // must not fire inside the batch
        store.update_node_text(id, "step2");
        store.end_batch();
        settle(&mut store, &clock);

        assert!(store.undo());
        assert_eq!(store.node(id).unwrap().text, "start");
        assert!(store.redo());
        assert_eq!(store.node(id).unwrap().text, "step2");
    }

    #[test]
    fn autosave_written_on_commit() {
        let (mut store, clock, autosave) = fixture();
        let node = store.make_node("persisted", Point::ZERO, NodeStyle::default());
        store.add_node(node, false);
        assert_eq!(autosave.get(), None);
        settle(&mut store, &clock);
        let saved = autosave.get().expect("autosave written");
        assert!(saved.contains("persisted"));
    }

    #[test]
    fn drag_frame_quantizes_and_carries_remainder() {
        let (mut store, _, _) = fixture();
        let node = store.make_node("a", Point::ZERO, NodeStyle::default());
        let id = store.add_node(node, true);

        store.begin_drag(Point::ZERO);
        store.drag_pointer(Point::new(3.0, 0.0));
        // base_unit 5: a 3px delta rounds up to one grid unit
        let step = store.drag_frame();
        assert_eq!(step.x, 5.0);
        assert_eq!(store.node(id).unwrap().x, 5.0);

        // Anchor advanced by the applied 5: a further 1px of pointer
        // travel leaves a -1 remainder that quantizes to zero.
        store.drag_pointer(Point::new(4.0, 0.0));
        assert_eq!(store.drag_frame(), Point::ZERO);
    }

    #[test]
    fn end_drag_snaps_on_release() {
        let (mut store, _, _) = fixture();
        let mut node = store.make_node("a", Point::ZERO, NodeStyle::default());
        node.x = 13.0;
        node.y = 17.0;
        let id = store.add_node(node, true);

        store.begin_drag(Point::ZERO);
        store.end_drag();
        let n = store.node(id).unwrap();
        assert_eq!((n.x, n.y), (15.0, 15.0));
    }

    #[test]
    fn end_drag_respects_snap_step_zero() {
        let (mut store, _, _) = fixture();
        let mut cfg = store.config().clone();
        cfg.snap_step = 0.0;
        store.set_config(cfg);
        let mut node = store.make_node("a", Point::ZERO, NodeStyle::default());
        node.x = 13.0;
        node.y = 17.0;
        let id = store.add_node(node, true);

        store.begin_drag(Point::ZERO);
        store.end_drag();
        let n = store.node(id).unwrap();
        assert_eq!((n.x, n.y), (13.0, 17.0));
    }

    #[test]
    fn drag_respects_collision() {
        let (mut store, _, _) = fixture();
        let mover = store.make_node("", Point::ZERO, NodeStyle::default());
        let mover_w = mover.width;
        let id = store.add_node(mover, true);
        let mut wall = store.make_node("", Point::ZERO, NodeStyle::default());
        wall.x = mover_w + 10.0;
        store.add_node(wall, false);
        store.set_selected(vec![id]);

        store.begin_drag(Point::ZERO);
        store.drag_pointer(Point::new(100.0, 0.0));
        let step = store.drag_frame();
        assert_eq!(step.x, 10.0);
    }

    #[test]
    fn align_left_moves_to_minimum_x() {
        let (mut store, _, _) = fixture();
        let mut a = store.make_node("a", Point::new(10.0, 0.0), NodeStyle::default());
        a.y = 0.0;
        let ida = store.add_node(a, false);
        let b = store.make_node("b", Point::new(50.0, 100.0), NodeStyle::default());
        let idb = store.add_node(b, false);
        store.set_selected(vec![ida, idb]);
        store.align_selected_left();
        assert_eq!(store.node(ida).unwrap().x, 10.0);
        assert_eq!(store.node(idb).unwrap().x, 10.0);
    }

    #[test]
    fn distribute_needs_more_than_two() {
        let (mut store, _, _) = fixture();
        let a = store.make_node("a", Point::new(0.0, 0.0), NodeStyle::default());
        let b = store.make_node("b", Point::new(100.0, 0.0), NodeStyle::default());
        let (ax, bx) = (a.x, b.x);
        let ida = store.add_node(a, false);
        let idb = store.add_node(b, false);
        store.set_selected(vec![ida, idb]);
        store.distribute_selected_horizontally();
        assert_eq!(store.node(ida).unwrap().x, ax);
        assert_eq!(store.node(idb).unwrap().x, bx);
    }

    #[test]
    fn distribute_equalizes_gaps() {
        let (mut store, _, _) = fixture();
        let mut ids = Vec::new();
        for (i, x) in [0.0_f32, 17.0, 200.0].iter().enumerate() {
            let mut n = store.make_node(&format!("n{i}"), Point::new(*x, 0.0), NodeStyle::default());
            n.width = 50.0;
            ids.push(store.add_node(n, false));
        }
        store.set_selected(ids.clone());
        store.distribute_selected_horizontally();

        let xs: Vec<f32> = ids.iter().map(|id| store.node(*id).unwrap().x).collect();
        // Outer nodes fixed; middle centered so both gaps are equal
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[2], 200.0);
        let gap1 = xs[1] - (xs[0] + 50.0);
        let gap2 = xs[2] - (xs[1] + 50.0);
        assert!((gap1 - gap2).abs() < 1e-3);
    }

    #[test]
    fn load_malformed_json_leaves_state() {
        let (mut store, _, _) = fixture();
        let node = store.make_node("keep", Point::ZERO, NodeStyle::default());
        store.add_node(node, false);
        assert!(!store.restore_from_json("not json at all"));
        assert_eq!(store.nodes().len(), 1);
        assert_eq!(store.nodes()[0].text, "keep");
    }

    #[test]
    fn save_load_roundtrip_through_memory_storage() {
        let (mut store, _, _) = fixture();
        let node = store.make_node("saved note", Point::new(30.0, 40.0), NodeStyle::default());
        let id = store.add_node(node, true);
        store.set_pan_scale(Point::new(5.0, 6.0), 2.0);

        let mut storage = crate::io::MemoryStorage::default();
        store.save_to(&mut storage).unwrap();

        let (mut other, _, _) = fixture();
        assert!(other.load_from(&mut storage).unwrap());
        assert_eq!(other.nodes().len(), 1);
        assert_eq!(other.nodes()[0].id, id);
        assert_eq!(other.nodes()[0].text, "saved note");
        assert_eq!(other.view().scale, 2.0);
        assert_eq!(other.selected(), &[id]);
    }

    #[test]
    fn paste_places_group_at_target() {
        let (mut store, _, _) = fixture();
        let a = store.make_node("a", Point::ZERO, NodeStyle::default());
        store.add_node(a, true);
        let payload = store.copy_selected().unwrap();

        assert!(store.paste_at(&payload, Point::new(300.0, 300.0)));
        assert_eq!(store.nodes().len(), 2);
        let pasted = &store.nodes()[1];
        // Center of the pasted node sits on the target
        assert!((pasted.x + pasted.width / 2.0 - 300.0).abs() < 1e-3);
        assert!((pasted.y + pasted.height / 2.0 - 300.0).abs() < 1e-3);
    }

    #[test]
    fn select_in_box_additive() {
        let (mut store, _, _) = fixture();
        let a = store.make_node("a", Point::new(0.0, 0.0), NodeStyle::default());
        let b = store.make_node("b", Point::new(500.0, 500.0), NodeStyle::default());
        let ida = store.add_node(a, false);
        let idb = store.add_node(b, false);

        store.select_in_box(Rect::new(-5.0, -5.0, 20.0, 20.0), false);
        assert_eq!(store.selected(), &[ida]);
        store.select_in_box(Rect::new(495.0, 495.0, 20.0, 20.0), true);
        assert_eq!(store.selected(), &[ida, idb]);
        store.select_in_box(Rect::new(495.0, 495.0, 20.0, 20.0), false);
        assert_eq!(store.selected(), &[idb]);
    }
}
