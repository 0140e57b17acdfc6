use super::error::TriggerParseError;
use super::key::KeyCode;
use super::mask::TriggerMask;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const DOUBLE_CLICK_TOKEN: &str = "double-click";

/// Canonical description of what activates a behavior
///
/// A trigger is the pair of a [`TriggerMask`] and the set of ordinary keys that must be
/// held. Triggers are immutable and compare bit-for-bit, so they are used directly as map
/// keys. Modifier keys never end up in `keys`; they are folded into the mask.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputTrigger {
    mask: TriggerMask,
    keys: BTreeSet<KeyCode>,
    key_triggered: bool,
}

impl InputTrigger {
    pub fn new(mask: TriggerMask, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        let mut mask = mask;
        let mut ordinary = BTreeSet::new();

        for key in keys {
            match key {
                KeyCode::Shift => mask |= TriggerMask::SHIFT,
                KeyCode::Control => mask |= TriggerMask::CTRL,
                KeyCode::Alt => mask |= TriggerMask::ALT,
                KeyCode::AltGraph => mask |= TriggerMask::ALT_GRAPH,
                KeyCode::Meta => mask |= TriggerMask::META,
                KeyCode::Windows => mask |= TriggerMask::WIN,
                KeyCode::Named(_) => {
                    ordinary.insert(key);
                }
            }
        }

        Self {
            mask,
            keys: ordinary,
            key_triggered: !mask.is_pointer_based(),
        }
    }

    /// Pointer or gesture trigger without any held keys
    pub fn from_mask(mask: TriggerMask) -> Self {
        Self::new(mask, std::iter::empty::<KeyCode>())
    }

    pub fn mask(&self) -> TriggerMask {
        self.mask
    }

    pub fn keys(&self) -> &BTreeSet<KeyCode> {
        &self.keys
    }

    /// Keyboard-activated triggers go to the key lookup lists, everything else to the
    /// pointer lists
    pub fn is_key_triggered(&self) -> bool {
        self.key_triggered
    }

    pub fn is_double_click(&self) -> bool {
        self.mask.contains(TriggerMask::DOUBLE_CLICK)
    }

    pub fn is_scroll(&self) -> bool {
        self.mask.contains(TriggerMask::SCROLL)
    }

    /// Exact match, used when a behavior is activated
    pub fn matches(&self, mask: TriggerMask, pressed_keys: &BTreeSet<KeyCode>) -> bool {
        self.mask == mask && self.keys == *pressed_keys
    }

    /// Subset match, used to decide whether an active drag is still held
    ///
    /// Extra bits and extra keys are ignored; only the required ones must remain.
    pub fn matches_subset(&self, mask: TriggerMask, pressed_keys: &BTreeSet<KeyCode>) -> bool {
        mask.contains(self.mask) && self.keys.is_subset(pressed_keys)
    }
}

impl FromStr for InputTrigger {
    type Err = TriggerParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut tokens = input.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err(TriggerParseError::Empty);
        }

        let mut mask = TriggerMask::empty();
        let mut keys = Vec::new();

        for token in tokens {
            let bit = match token.to_ascii_lowercase().as_str() {
                DOUBLE_CLICK_TOKEN => Some(TriggerMask::DOUBLE_CLICK),
                "shift" => Some(TriggerMask::SHIFT),
                "ctrl" | "control" => Some(TriggerMask::CTRL),
                "alt" => Some(TriggerMask::ALT),
                "altgraph" | "alt_graph" => Some(TriggerMask::ALT_GRAPH),
                "meta" => Some(TriggerMask::META),
                "win" | "windows" => Some(TriggerMask::WIN),
                "button1" => Some(TriggerMask::BUTTON1),
                "button2" => Some(TriggerMask::BUTTON2),
                "button3" => Some(TriggerMask::BUTTON3),
                "scroll" => Some(TriggerMask::SCROLL),
                _ => None,
            };

            match bit {
                Some(bit) => mask |= bit,
                None => match KeyCode::from_name(token) {
                    Some(key) => keys.push(key),
                    None => {
                        return Err(TriggerParseError::UnknownToken {
                            token: token.to_string(),
                            input: input.to_string(),
                        })
                    }
                },
            }
        }

        let trigger = InputTrigger::new(mask, keys);
        if trigger.keys.is_empty() && !trigger.mask.is_pointer_based() {
            return Err(TriggerParseError::NoActivator(input.to_string()));
        }

        Ok(trigger)
    }
}

impl fmt::Display for InputTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let named = [
            (TriggerMask::DOUBLE_CLICK, DOUBLE_CLICK_TOKEN),
            (TriggerMask::SHIFT, "shift"),
            (TriggerMask::CTRL, "ctrl"),
            (TriggerMask::ALT, "alt"),
            (TriggerMask::ALT_GRAPH, "altgraph"),
            (TriggerMask::META, "meta"),
            (TriggerMask::WIN, "win"),
        ];

        let mut parts: Vec<&str> = named
            .iter()
            .filter(|(bit, _)| self.mask.contains(*bit))
            .map(|(_, name)| *name)
            .collect();
        parts.extend(self.keys.iter().map(|key| key.name()));

        for (bit, name) in [
            (TriggerMask::BUTTON1, "button1"),
            (TriggerMask::BUTTON2, "button2"),
            (TriggerMask::BUTTON3, "button3"),
            (TriggerMask::SCROLL, "scroll"),
        ] {
            if self.mask.contains(bit) {
                parts.push(name);
            }
        }

        f.write_str(&parts.join(" "))
    }
}
