//! Key binding strings
//!
//! Bindings use the `<Modifier-Key>` notation, e.g. `<Left>`,
//! `<Shift-Right>`, `<Control-q>` or `<F11>`. The angle brackets are
//! optional. Key names are X11 keysyms; a single uppercase letter implies
//! Shift.

use crate::navigation::KeyAction;
use crate::options::ReaderOptions;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        shift: false,
        control: false,
        alt: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// A parsed key binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Keysym name, letters in lowercase
    pub key: String,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(key: impl Into<String>, modifiers: KeyModifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = spec.trim();
        let inner = trimmed
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(trimmed);

        if inner.is_empty() {
            return Err(ReaderError::KeyBinding(format!("empty binding '{}'", spec)));
        }

        let mut parts: Vec<&str> = inner.split('-').collect();
        // A trailing '-' is the minus key itself
        let mut key = match parts.pop() {
            Some("") => {
                parts.pop();
                "-".to_string()
            }
            Some(key) => key.to_string(),
            None => String::new(),
        };

        let mut modifiers = KeyModifiers::default();
        for part in parts {
            match part {
                "Shift" => modifiers.shift = true,
                "Control" | "Ctrl" => modifiers.control = true,
                "Alt" | "Option" | "Meta" => modifiers.alt = true,
                other => {
                    return Err(ReaderError::KeyBinding(format!(
                        "unknown modifier '{}' in '{}'",
                        other, spec
                    )));
                }
            }
        }

        if key.is_empty() {
            return Err(ReaderError::KeyBinding(format!("missing key in '{}'", spec)));
        }

        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                modifiers.shift = true;
                key = c.to_ascii_lowercase().to_string();
            }
        }

        Ok(Self { key, modifiers })
    }
}

/// Lookup table from key presses to actions
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<(KeyBinding, KeyAction)>,
}

impl Keymap {
    pub fn from_options(options: &ReaderOptions) -> Result<Self> {
        let mut keymap = Keymap::default();
        for (action, spec) in options.key_bindings() {
            let binding = KeyBinding::parse(spec)?;
            if let Some((_, existing)) = keymap.bindings.iter().find(|(b, _)| *b == binding) {
                log::warn!(
                    "{} is bound to both {:?} and {:?}, keeping {:?}",
                    spec,
                    existing,
                    action,
                    existing
                );
                continue;
            }
            keymap.bindings.push((binding, action));
        }
        Ok(keymap)
    }

    /// Action for a key press.
    ///
    /// An exact match wins. Otherwise a binding of the bare key applies, so
    /// `<Left>` also fires for Control-Left unless that has its own binding.
    pub fn lookup(&self, key: &str, modifiers: KeyModifiers) -> Option<KeyAction> {
        let exact = self
            .bindings
            .iter()
            .find(|(b, _)| b.key == key && b.modifiers == modifiers);
        let bare = || {
            self.bindings
                .iter()
                .find(|(b, _)| b.key == key && b.modifiers.is_empty())
        };
        exact.or_else(bare).map(|(_, action)| *action)
    }

    /// Resolve a key press to a view command
    pub fn command(
        &self,
        key: &str,
        modifiers: KeyModifiers,
        direction: ReadingDirection,
    ) -> Option<crate::state::Command> {
        self.lookup(key, modifiers)
            .map(|action| action.command(direction))
    }
}
