//! Document snapshots and the persisted JSON format.
//!
//! On disk a document is `{ nodes, config, scale, pan, showDebugGrid,
//! selectedNodeIds, collisionEnabled }`. Nodes are compressed on write:
//! style fields equal to the documented defaults are omitted, and derived
//! `width`/`height` are always omitted (recomputed on load). On read,
//! missing fields fall back to defaults, duplicate ids are rewritten with
//! a generated suffix, and every node is re-measured against the restored
//! config. A parse failure restores nothing — the caller's state stays
//! untouched.

use ng_core::model::{GridConfig, NodeData, NodeStyle, Point, TextAlign, Viewport};
use ng_core::{NodeId, calculate_node_size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A complete, immutable capture of document + viewport state: the unit
/// of undo/redo and of persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSnapshot {
    pub nodes: Vec<NodeData>,
    pub config: GridConfig,
    pub view: Viewport,
    pub show_debug_grid: bool,
    pub selected_node_ids: Vec<NodeId>,
    pub collision_enabled: bool,
}

impl Default for CanvasSnapshot {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            config: GridConfig::default(),
            view: Viewport::default(),
            show_debug_grid: false,
            selected_node_ids: Vec::new(),
            collision_enabled: true,
        }
    }
}

// ─── Wire format ─────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedDocument {
    nodes: Vec<SavedNode>,
    config: GridConfig,
    scale: f32,
    pan: Point,
    show_debug_grid: bool,
    selected_node_ids: Vec<NodeId>,
    collision_enabled: bool,
}

/// Lenient mirror of `SavedDocument` for reading: every field optional.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadedDocument {
    #[serde(default)]
    nodes: Vec<SavedNode>,
    #[serde(default)]
    config: Option<GridConfig>,
    #[serde(default)]
    scale: Option<f32>,
    #[serde(default)]
    pan: Option<Point>,
    #[serde(default)]
    show_debug_grid: bool,
    #[serde(default)]
    selected_node_ids: Vec<NodeId>,
    #[serde(default = "default_true")]
    collision_enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Compressed node: style fields are present only when they differ from
/// the defaults; derived size is never written.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<NodeId>,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_align: Option<TextAlign>,
}

impl SavedNode {
    fn compress(node: &NodeData) -> Self {
        let defaults = NodeStyle::default();
        let s = &node.style;
        Self {
            id: Some(node.id),
            x: node.x,
            y: node.y,
            text: node.text.clone(),
            background_color: (s.background_color != defaults.background_color)
                .then(|| s.background_color.clone()),
            text_color: (s.text_color != defaults.text_color).then(|| s.text_color.clone()),
            font_size: (s.font_size != defaults.font_size).then_some(s.font_size),
            is_bold: (s.is_bold != defaults.is_bold).then_some(s.is_bold),
            text_align: (s.text_align != defaults.text_align).then_some(s.text_align),
        }
    }

    /// Fill defaults and recompute the derived size.
    fn expand(self, config: &GridConfig) -> NodeData {
        let defaults = NodeStyle::default();
        let style = NodeStyle {
            background_color: self.background_color.unwrap_or(defaults.background_color),
            text_color: self.text_color.unwrap_or(defaults.text_color),
            font_size: self.font_size.unwrap_or(defaults.font_size),
            is_bold: self.is_bold.unwrap_or(defaults.is_bold),
            text_align: self.text_align.unwrap_or(defaults.text_align),
        };
        let (width, height) = calculate_node_size(&self.text, &style, config);
        NodeData {
            id: self.id.unwrap_or_else(NodeId::generate),
            x: self.x,
            y: self.y,
            width,
            height,
            text: self.text,
            style,
        }
    }
}

// ─── Save / restore ──────────────────────────────────────────────────────

/// Serialize a snapshot to the persisted JSON form.
pub fn serialize_snapshot(snapshot: &CanvasSnapshot) -> String {
    let doc = SavedDocument {
        nodes: snapshot.nodes.iter().map(SavedNode::compress).collect(),
        config: snapshot.config.clone(),
        scale: snapshot.view.scale,
        pan: snapshot.view.pan,
        show_debug_grid: snapshot.show_debug_grid,
        selected_node_ids: snapshot.selected_node_ids.clone(),
        collision_enabled: snapshot.collision_enabled,
    };
    // The wire struct contains no non-string keys or NaNs: can't fail.
    serde_json::to_string(&doc).unwrap_or_default()
}

/// Parse persisted JSON back into a snapshot. Returns `None` on malformed
/// input; the caller's live state must be left unchanged in that case.
pub fn restore_snapshot(text: &str) -> Option<CanvasSnapshot> {
    let loaded: LoadedDocument = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(err) => {
            log::warn!("discarding malformed document: {err}");
            return None;
        }
    };

    let config = loaded.config.unwrap_or_default();
    let mut seen = HashSet::new();
    let nodes = loaded
        .nodes
        .into_iter()
        .map(|saved| {
            let mut node = saved.expand(&config);
            if !seen.insert(node.id) {
                node.id = node.id.disambiguate();
                seen.insert(node.id);
            }
            node
        })
        .collect();

    Some(CanvasSnapshot {
        nodes,
        config,
        view: Viewport {
            pan: loaded.pan.unwrap_or(Point::ZERO),
            scale: loaded.scale.unwrap_or(3.0),
        },
        show_debug_grid: loaded.show_debug_grid,
        selected_node_ids: loaded.selected_node_ids,
        collision_enabled: loaded.collision_enabled,
    })
}

// ─── Clipboard payloads ──────────────────────────────────────────────────

/// Serialize a node selection for the clipboard (compressed, pretty).
pub fn serialize_clipboard(nodes: &[NodeData]) -> String {
    let compressed: Vec<SavedNode> = nodes.iter().map(SavedNode::compress).collect();
    serde_json::to_string_pretty(&compressed).unwrap_or_default()
}

/// Parse clipboard text into nodes. Accepts a single object or an array;
/// anything without a string `text` field is skipped. Returns `None` when
/// the text isn't JSON or contains no usable nodes.
pub fn parse_clipboard(text: &str, config: &GridConfig) -> Option<Vec<NodeData>> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        obj @ serde_json::Value::Object(_) => vec![obj],
        _ => return None,
    };

    let nodes: Vec<NodeData> = items
        .into_iter()
        .filter(|item| item.get("text").is_some_and(|t| t.is_string()))
        .filter_map(|item| serde_json::from_value::<SavedNode>(item).ok())
        .map(|saved| saved.expand(config))
        .collect();

    if nodes.is_empty() { None } else { Some(nodes) }
}

/// Re-center a pasted group so its bounding-box midpoint lands on
/// `target`, giving each node a fresh id.
pub fn center_nodes_at(nodes: &mut [NodeData], target: Point) {
    if nodes.is_empty() {
        return;
    }
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for n in nodes.iter() {
        min_x = min_x.min(n.x);
        min_y = min_y.min(n.y);
        max_x = max_x.max(n.x + n.width);
        max_y = max_y.max(n.y + n.height);
    }
    let dx = target.x - (min_x + max_x) / 2.0;
    let dy = target.y - (min_y + max_y) / 2.0;
    for n in nodes.iter_mut() {
        n.id = NodeId::generate();
        n.x += dx;
        n.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot_with(texts: &[(&str, &str)]) -> CanvasSnapshot {
        let config = GridConfig::default();
        let nodes = texts
            .iter()
            .map(|(id, text)| {
                let style = NodeStyle::default();
                let (width, height) = calculate_node_size(text, &style, &config);
                NodeData {
                    id: NodeId::intern(id),
                    x: 10.0,
                    y: 20.0,
                    width,
                    height,
                    text: text.to_string(),
                    style,
                }
            })
            .collect();
        CanvasSnapshot {
            nodes,
            ..CanvasSnapshot::default()
        }
    }

    #[test]
    fn roundtrip_preserves_nodes_and_viewport() {
        let mut snapshot = snapshot_with(&[("a", "hello"), ("b", "多行\n文本")]);
        snapshot.view.scale = 2.0;
        snapshot.view.pan = Point::new(7.0, -3.0);
        snapshot.show_debug_grid = true;
        snapshot.selected_node_ids = vec![NodeId::intern("b")];

        let json = serialize_snapshot(&snapshot);
        let restored = restore_snapshot(&json).expect("roundtrip");
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn default_style_fields_omitted_on_write() {
        let snapshot = snapshot_with(&[("a", "x")]);
        let json = serialize_snapshot(&snapshot);
        assert!(!json.contains("backgroundColor"));
        assert!(!json.contains("isBold"));
        // Derived size never persisted
        assert!(!json.contains("width"));
        assert!(!json.contains("height"));
    }

    #[test]
    fn non_default_style_survives() {
        let mut snapshot = snapshot_with(&[("a", "x")]);
        snapshot.nodes[0].style.font_size = 14.0;
        snapshot.nodes[0].style.is_bold = true;
        let json = serialize_snapshot(&snapshot);
        let restored = restore_snapshot(&json).unwrap();
        assert_eq!(restored.nodes[0].style.font_size, 14.0);
        assert!(restored.nodes[0].style.is_bold);
    }

    #[test]
    fn malformed_json_restores_nothing() {
        assert!(restore_snapshot("not json").is_none());
        assert!(restore_snapshot("[1,2,3").is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let restored = restore_snapshot("{}").unwrap();
        assert!(restored.nodes.is_empty());
        assert_eq!(restored.view.scale, 3.0);
        assert_eq!(restored.view.pan, Point::ZERO);
        assert!(restored.collision_enabled);
        assert!(!restored.show_debug_grid);
    }

    #[test]
    fn partial_config_restores_with_field_defaults() {
        // A document from an older version: config missing most fields
        let json = r#"{"nodes":[{"id":"a","text":"x"}],"config":{"baseUnit":10.0}}"#;
        let restored = restore_snapshot(json).expect("partial config must not fail restore");
        assert_eq!(restored.config.base_unit, 10.0);
        assert_eq!(restored.config.line_height, 15.0);
        // Re-measurement uses the merged config
        assert!(restored.nodes[0].width >= 20.0);
    }

    #[test]
    fn duplicate_ids_rewritten_on_restore() {
        let json = r#"{"nodes":[{"id":"dup","text":"a"},{"id":"dup","text":"b"}]}"#;
        let restored = restore_snapshot(json).unwrap();
        assert_eq!(restored.nodes.len(), 2);
        assert_ne!(restored.nodes[0].id, restored.nodes[1].id);
        assert_eq!(restored.nodes[0].id, NodeId::intern("dup"));
        assert!(restored.nodes[1].id.as_str().starts_with("dup-"));
    }

    #[test]
    fn restored_nodes_are_remeasured() {
        let json = r#"{"nodes":[{"id":"a","text":"line\nline"}]}"#;
        let restored = restore_snapshot(json).unwrap();
        let cfg = GridConfig::default();
        let (w, h) = calculate_node_size("line\nline", &NodeStyle::default(), &cfg);
        assert_eq!(restored.nodes[0].width, w);
        assert_eq!(restored.nodes[0].height, h);
    }

    #[test]
    fn clipboard_rejects_non_node_json() {
        let cfg = GridConfig::default();
        assert!(parse_clipboard("42", &cfg).is_none());
        assert!(parse_clipboard("\"hello\"", &cfg).is_none());
        assert!(parse_clipboard(r#"[{"x": 1}]"#, &cfg).is_none());
    }

    #[test]
    fn clipboard_roundtrip_with_recentering() {
        let cfg = GridConfig::default();
        let snapshot = snapshot_with(&[("a", "one"), ("b", "two")]);
        let payload = serialize_clipboard(&snapshot.nodes);
        let mut pasted = parse_clipboard(&payload, &cfg).unwrap();
        assert_eq!(pasted.len(), 2);

        center_nodes_at(&mut pasted, Point::new(500.0, 500.0));
        // Fresh ids, original relative offsets preserved
        assert_ne!(pasted[0].id, snapshot.nodes[0].id);
        assert_eq!(
            pasted[1].x - pasted[0].x,
            snapshot.nodes[1].x - snapshot.nodes[0].x
        );
    }

    #[test]
    fn clipboard_accepts_single_object() {
        let cfg = GridConfig::default();
        let nodes = parse_clipboard(r#"{"text":"solo","x":5}"#, &cfg).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text, "solo");
        assert_eq!(nodes[0].x, 5.0);
    }
}
