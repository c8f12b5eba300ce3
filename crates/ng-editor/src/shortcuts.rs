//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Two layers:
//! plain single-key bindings (active only when no modifier is held, and
//! only outside text editing) and modifier combos. Both are user
//! configurable: a JSON object of `action name → binding` is merged over
//! the defaults, so a partial or malformed config never loses the rest
//! of the map.

use std::collections::HashMap;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    DeleteSelected,
    Deselect,

    // ── Layout ──
    AlignLeft,
    AlignTop,
    AlignRight,
    AlignBottom,
    DistributeHorizontal,
    DistributeVertical,

    // ── Toggles ──
    ToggleCollision,
    ToggleDebugGrid,

    // ── Persistence ──
    Save,
    SaveAs,
    Load,
}

/// Every action, for iteration when exporting the map.
const ALL_ACTIONS: [ShortcutAction; 18] = [
    ShortcutAction::Undo,
    ShortcutAction::Redo,
    ShortcutAction::Copy,
    ShortcutAction::Cut,
    ShortcutAction::Paste,
    ShortcutAction::DeleteSelected,
    ShortcutAction::Deselect,
    ShortcutAction::AlignLeft,
    ShortcutAction::AlignTop,
    ShortcutAction::AlignRight,
    ShortcutAction::AlignBottom,
    ShortcutAction::DistributeHorizontal,
    ShortcutAction::DistributeVertical,
    ShortcutAction::ToggleCollision,
    ShortcutAction::ToggleDebugGrid,
    ShortcutAction::Save,
    ShortcutAction::SaveAs,
    ShortcutAction::Load,
];

impl ShortcutAction {
    /// Config-file name of the action (the keys of the JSON override
    /// map). The `distributeH`/`distributeV` short forms are the ids
    /// persisted maps carry; the long forms are accepted as aliases.
    fn from_config_name(name: &str) -> Option<Self> {
        Some(match name {
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "copy" => Self::Copy,
            "cut" => Self::Cut,
            "paste" => Self::Paste,
            "delete" => Self::DeleteSelected,
            "deselect" => Self::Deselect,
            "alignLeft" => Self::AlignLeft,
            "alignTop" => Self::AlignTop,
            "alignRight" => Self::AlignRight,
            "alignBottom" => Self::AlignBottom,
            "distributeH" | "distributeHorizontal" => Self::DistributeHorizontal,
            "distributeV" | "distributeVertical" => Self::DistributeVertical,
            "collisionToggle" => Self::ToggleCollision,
            "gridToggle" => Self::ToggleDebugGrid,
            "save" => Self::Save,
            "saveAs" => Self::SaveAs,
            "load" => Self::Load,
            _ => return None,
        })
    }

    /// Canonical name written when persisting the map.
    fn config_name(self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Copy => "copy",
            Self::Cut => "cut",
            Self::Paste => "paste",
            Self::DeleteSelected => "delete",
            Self::Deselect => "deselect",
            Self::AlignLeft => "alignLeft",
            Self::AlignTop => "alignTop",
            Self::AlignRight => "alignRight",
            Self::AlignBottom => "alignBottom",
            Self::DistributeHorizontal => "distributeH",
            Self::DistributeVertical => "distributeV",
            Self::ToggleCollision => "collisionToggle",
            Self::ToggleDebugGrid => "gridToggle",
            Self::Save => "save",
            Self::SaveAs => "saveAs",
            Self::Load => "load",
        }
    }
}

/// Normalize a key + modifier state into the canonical combo string:
/// modifiers in `ctrl, alt, shift, meta` order, then the lowercased key.
/// `"S"` with ctrl+shift held becomes `"ctrl+shift+s"`.
pub fn normalize_combo(key: &str, ctrl: bool, alt: bool, shift: bool, meta: bool) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(5);
    if ctrl {
        parts.push("ctrl".to_string());
    }
    if alt {
        parts.push("alt".to_string());
    }
    if shift {
        parts.push("shift".to_string());
    }
    if meta {
        parts.push("meta".to_string());
    }
    parts.push(key.to_lowercase());
    parts.join("+")
}

/// Re-order the modifier tokens of a user-written binding like
/// `"shift+ctrl+S"` into canonical form. `meta`/`cmd` fold into `ctrl`,
/// matching how `resolve` treats key events. Unknown tokens are treated
/// as the key.
fn normalize_binding(binding: &str) -> String {
    let mut ctrl = false;
    let mut alt = false;
    let mut shift = false;
    let mut key = String::new();
    for token in binding.split('+') {
        match token.trim().to_lowercase().as_str() {
            "ctrl" | "control" | "meta" | "cmd" => ctrl = true,
            "alt" => alt = true,
            "shift" => shift = true,
            other => key = other.to_string(),
        }
    }
    normalize_combo(&key, ctrl, alt, shift, false)
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap {
    /// Single-key bindings, matched only when no modifier is held.
    plain: HashMap<String, ShortcutAction>,
    /// Canonical combo string → action.
    combos: HashMap<String, ShortcutAction>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        let mut map = Self {
            plain: HashMap::new(),
            combos: HashMap::new(),
        };
        for (key, action) in [
            ("c", ShortcutAction::ToggleCollision),
            ("g", ShortcutAction::ToggleDebugGrid),
            ("a", ShortcutAction::AlignLeft),
            ("t", ShortcutAction::AlignTop),
            ("r", ShortcutAction::AlignRight),
            ("b", ShortcutAction::AlignBottom),
            ("h", ShortcutAction::DistributeHorizontal),
            ("v", ShortcutAction::DistributeVertical),
            ("delete", ShortcutAction::DeleteSelected),
            ("backspace", ShortcutAction::DeleteSelected),
            ("escape", ShortcutAction::Deselect),
        ] {
            map.plain.insert(key.to_string(), action);
        }
        for (combo, action) in [
            ("ctrl+s", ShortcutAction::Save),
            ("ctrl+shift+s", ShortcutAction::SaveAs),
            ("ctrl+o", ShortcutAction::Load),
            ("ctrl+z", ShortcutAction::Undo),
            ("ctrl+y", ShortcutAction::Redo),
            ("ctrl+shift+z", ShortcutAction::Redo),
            ("ctrl+c", ShortcutAction::Copy),
            ("ctrl+x", ShortcutAction::Cut),
            ("ctrl+v", ShortcutAction::Paste),
        ] {
            map.combos.insert(combo.to_string(), action);
        }
        map
    }
}

impl ShortcutMap {
    /// Defaults merged with a JSON override object of the form
    /// `{"collisionToggle": "k", "save": "ctrl+shift+k"}`. Malformed JSON
    /// or unknown action names leave the corresponding defaults intact.
    pub fn with_overrides(json: &str) -> Self {
        let mut map = Self::default();
        map.merge_json(json);
        map
    }

    pub fn merge_json(&mut self, json: &str) {
        let overrides: HashMap<String, String> = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(err) => {
                log::warn!("ignoring malformed shortcut config: {err}");
                return;
            }
        };
        for (name, binding) in overrides {
            let Some(action) = ShortcutAction::from_config_name(&name) else {
                log::warn!("ignoring unknown shortcut action {name:?}");
                continue;
            };
            self.rebind(action, &binding);
        }
    }

    /// Serialize the map as the persisted `action name → binding` object,
    /// the same shape `merge_json` reads back. Actions with several
    /// bindings export the shortest (ties broken alphabetically), so
    /// aliases like `backspace` for delete stay implicit.
    pub fn to_json(&self) -> String {
        let mut out = serde_json::Map::new();
        for action in ALL_ACTIONS {
            let mut candidates: Vec<&str> = self
                .plain
                .iter()
                .filter(|(_, a)| **a == action)
                .map(|(k, _)| k.as_str())
                .chain(
                    self.combos
                        .iter()
                        .filter(|(_, a)| **a == action)
                        .map(|(k, _)| k.as_str()),
                )
                .collect();
            candidates.sort_by_key(|b| (b.len(), b.to_string()));
            if let Some(binding) = candidates.first() {
                out.insert(
                    action.config_name().to_string(),
                    serde_json::Value::String(binding.to_string()),
                );
            }
        }
        // String-keyed map of strings: serialization can't fail.
        serde_json::to_string(&serde_json::Value::Object(out)).unwrap_or_default()
    }

    /// Point `action` at `binding`, removing its previous binding(s).
    pub fn rebind(&mut self, action: ShortcutAction, binding: &str) {
        self.plain.retain(|_, a| *a != action);
        self.combos.retain(|_, a| *a != action);
        if binding.contains('+') {
            self.combos.insert(normalize_binding(binding), action);
        } else {
            self.plain.insert(binding.to_lowercase(), action);
        }
    }

    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding. Plain bindings
    /// never fire with a modifier held, so typing stays unaffected.
    pub fn resolve(
        &self,
        key: &str,
        ctrl: bool,
        alt: bool,
        shift: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        // meta mirrors ctrl so macOS ⌘ combos resolve the same way
        let ctrl = ctrl || meta;
        if ctrl || alt || meta {
            return self
                .combos
                .get(&normalize_combo(key, ctrl, alt, shift, false))
                .copied();
        }
        if shift {
            // Shift alone is just capitalization while typing
            return None;
        }
        self.plain.get(&key.to_lowercase()).copied()
    }
}
