use serde::{Deserialize, Serialize};

use crate::InputError;

/// A driving control the simulation reads each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Accelerate,
    Brake,
    Left,
    Right,
}

const ACTION_COUNT: usize = 4;

impl Action {
    pub const ALL: [Action; ACTION_COUNT] =
        [Self::Accelerate, Self::Brake, Self::Left, Self::Right];

    const fn index(self) -> usize {
        match self {
            Self::Accelerate => 0,
            Self::Brake => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    /// Bit of this action in [`InputState::bits`].
    pub const fn bit(self) -> u8 {
        1 << self.index()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Accelerate => "accelerate",
            Self::Brake => "brake",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn parse(name: &str) -> Result<Self, InputError> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| InputError::UnknownBinding(name.to_string()))
    }
}

/// Physical origin of an input write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard,
    Touch,
    /// Programmatic writes (scripted input, tests).
    Direct,
}

/// Persistent action table. Copy it to take a consistent per-tick view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    down: [bool; ACTION_COUNT],
    last_source: [Option<InputSource>; ACTION_COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_action(&mut self, action: Action, pressed: bool) {
        self.apply(InputSource::Direct, action, pressed);
    }

    /// Record a write from `source`. The previous value is simply overwritten.
    pub fn apply(&mut self, source: InputSource, action: Action, pressed: bool) {
        self.down[action.index()] = pressed;
        self.last_source[action.index()] = Some(source);
    }

    pub fn get(&self, action: Action) -> bool {
        self.down[action.index()]
    }

    /// Source of the most recent write to `action`, for diagnostics.
    pub fn last_source(&self, action: Action) -> Option<InputSource> {
        self.last_source[action.index()]
    }

    /// The table as a bitset (`Accelerate = 1, Brake = 2, Left = 4, Right = 8`).
    pub fn bits(&self) -> u8 {
        Action::ALL
            .into_iter()
            .filter(|a| self.get(*a))
            .fold(0, |bits, a| bits | a.bit())
    }

    pub fn pressed(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.get(*a))
    }
}
