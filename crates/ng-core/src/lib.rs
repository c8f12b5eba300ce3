//! notegrid core: the spatial interaction engine of an infinite-canvas
//! note editor. Pure functions and value types only — no I/O, no timers.

pub mod collide;
pub mod cursor;
pub mod geometry;
pub mod grid;
pub mod id;
pub mod measure;
pub mod model;
pub mod snap;
pub mod view;

pub use collide::resolve_delta;
pub use cursor::char_index_at_position;
pub use geometry::{nodes_in_box, rects_intersect};
pub use grid::SpatialGrid;
pub use id::NodeId;
pub use measure::calculate_node_size;
pub use model::{GridConfig, NodeData, NodeStyle, Point, Rect, TextAlign, Viewport};
pub use snap::{compute_drag_step, snap_delta};
pub use view::{canvas_point, compute_focus, zoom_at_point};
