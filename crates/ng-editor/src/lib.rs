//! notegrid editor: the document engine around `ng-core`'s spatial math.
//! Owns the mutable canvas state, bounded undo history, the debounced
//! snapshot/autosave pipeline, persistence, and keyboard shortcut
//! resolution. No rendering and no event loop — embedders drive `tick()`
//! and feed input events in.

pub mod capability;
pub mod doc;
pub mod history;
pub mod io;
pub mod scheduler;
pub mod shortcuts;
pub mod store;

pub use capability::{LayoutOps, NodeOps, UiOps, ViewportOps};
pub use doc::{CanvasSnapshot, restore_snapshot, serialize_snapshot};
pub use history::HistoryStack;
pub use io::{Autosave, FileAutosave, FileStorage, MemoryAutosave, MemoryStorage, Storage, StorageError};
pub use scheduler::{Clock, ManualClock, SnapshotScheduler, SystemClock, SNAPSHOT_DEBOUNCE_MS};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{EditorStore, StylePatch};
