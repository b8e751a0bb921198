use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Action, InputError};

/// Keyboard key to action table.
///
/// Keys are compared by their reported key string (`"w"`, `"ArrowUp"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = [
            ("w", Action::Accelerate),
            ("s", Action::Brake),
            ("a", Action::Left),
            ("d", Action::Right),
        ]
        .into_iter()
        .map(|(k, a)| (k.to_string(), a))
        .collect();
        Self { keys }
    }
}

impl KeyBindings {
    /// Bind `key` to the action named `action`, replacing any previous binding.
    pub fn bind(&mut self, key: impl Into<String>, action: &str) -> Result<(), InputError> {
        let action = Action::parse(action)?;
        self.keys.insert(key.into(), action);
        Ok(())
    }

    pub fn unbind(&mut self, key: &str) -> Option<Action> {
        self.keys.remove(key)
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.keys.get(key).copied()
    }
}

/// On-screen driving controls for touch devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchControl {
    Forward,
    Brakes,
    Left,
    Right,
}

impl TouchControl {
    pub fn action(self) -> Action {
        match self {
            Self::Forward => Action::Accelerate,
            Self::Brakes => Action::Brake,
            Self::Left => Action::Left,
            Self::Right => Action::Right,
        }
    }
}

/// Visibility of the on-screen controls. Hidden until the first touch of the
/// session, then revealed for good.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchSurface {
    revealed: bool,
}

impl TouchSurface {
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Reveal the controls. Returns true only on the first call.
    pub fn reveal(&mut self) -> bool {
        let first = !self.revealed;
        self.revealed = true;
        first
    }
}
