use egui::Key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyboard key as seen by the dispatcher
///
/// Named keys reuse egui's key vocabulary. Modifier keys get their own variants since
/// egui reports them only as modifier state, while the dispatcher tracks their presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Shift,
    Control,
    Alt,
    AltGraph,
    Meta,
    Windows,
    Named(Key),
}

impl KeyCode {
    /// Modifier keys only update tracked state and never match a trigger themselves
    pub fn is_modifier(self) -> bool {
        !matches!(self, KeyCode::Named(_))
    }

    /// Looks up a key by name
    ///
    /// Accepts modifier names and egui key names. Single letters are case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "shift" => return Some(KeyCode::Shift),
            "ctrl" | "control" => return Some(KeyCode::Control),
            "alt" => return Some(KeyCode::Alt),
            "altgraph" | "alt_graph" => return Some(KeyCode::AltGraph),
            "meta" => return Some(KeyCode::Meta),
            "win" | "windows" => return Some(KeyCode::Windows),
            _ => {}
        }

        Key::from_name(name)
            .or_else(|| Key::from_name(&name.to_ascii_uppercase()))
            .or_else(|| Key::from_name(&capitalized(name)))
            .map(KeyCode::Named)
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyCode::Shift => "shift",
            KeyCode::Control => "ctrl",
            KeyCode::Alt => "alt",
            KeyCode::AltGraph => "altgraph",
            KeyCode::Meta => "meta",
            KeyCode::Windows => "win",
            KeyCode::Named(key) => key.name(),
        }
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

impl From<Key> for KeyCode {
    fn from(key: Key) -> Self {
        KeyCode::Named(key)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
