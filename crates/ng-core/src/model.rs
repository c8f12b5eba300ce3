//! Core data model for canvas documents.
//!
//! A document is a flat list of `NodeData` — positioned, styled,
//! text-bearing rectangles in canvas (logical) space. Node width/height
//! are always derived from text + style + `GridConfig` by the measurement
//! engine, never authored directly. The `Viewport` maps canvas space to
//! screen space via a pan translation and a uniform scale.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};

// ─── Geometry value types ────────────────────────────────────────────────

/// A point in either canvas or screen space, depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle, position + size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

// ─── Node style ──────────────────────────────────────────────────────────

/// Horizontal text alignment inside a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Per-node visual style. Fields equal to `NodeStyle::default()` are
/// omitted from the persisted form (see `ng-editor`'s node compression).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub background_color: String,
    pub text_color: String,
    pub font_size: f32,
    pub is_bold: bool,
    pub text_align: TextAlign,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            font_size: 10.0,
            is_bold: false,
            text_align: TextAlign::Left,
        }
    }
}

// ─── Node ────────────────────────────────────────────────────────────────

/// A positioned, styled, text-bearing rectangle on the canvas.
///
/// `width`/`height` are derived: whenever `text`, style, or the grid
/// config changes, they must be recomputed via `measure::calculate_node_size`
/// (invariant: both are always ≥ `2 × base_unit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    #[serde(flatten)]
    pub style: NodeStyle,
}

impl NodeData {
    /// The node's bounding rectangle in canvas space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ─── Grid configuration ──────────────────────────────────────────────────

/// Process-wide layout configuration shared by all nodes.
///
/// Changing any field invalidates every node's derived size: text may
/// reflow, so callers must re-measure the whole document afterwards.
/// Fields missing from a persisted config fall back to their defaults
/// on deserialization, so documents written before a field existed
/// still restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Base grid unit in logical pixels; node sizes snap to multiples.
    pub base_unit: f32,
    pub line_height: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub show_border: bool,
    pub border_width: f32,
    pub border_radius: f32,
    pub selection_line_width: f32,
    /// Maximum node width, expressed in grid units.
    pub max_node_width_units: f32,
    pub font_family: String,
    /// Snap multiplier for drag quantization; 0 disables snapping.
    pub snap_step: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            base_unit: 5.0,
            line_height: 15.0,
            padding_x: 2.5,
            padding_y: 0.0,
            show_border: true,
            border_width: 0.2,
            border_radius: 3.0,
            selection_line_width: 0.5,
            max_node_width_units: 80.0,
            font_family: "\"Sarasa Mono SC\", \"Sarasa Mono TC\", \"Inconsolata\", monospace"
                .to_string(),
            snap_step: 1.0,
        }
    }
}

impl GridConfig {
    /// Maximum node content width in logical pixels.
    pub fn max_node_width(&self) -> f32 {
        self.max_node_width_units * self.base_unit
    }
}

// ─── Viewport ────────────────────────────────────────────────────────────

/// Pan/scale pair mapping canvas space to screen space.
/// `pan` is the screen-space translation of the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan: Point,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Point::new(50.0, 50.0),
            scale: 3.0,
        }
    }
}
