use crate::{Action, InputSource, InputState, KeyBindings, TouchControl, TouchSurface};

/// A raw event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    /// Touch began, on a control or elsewhere on the page (`None`).
    TouchStart(Option<TouchControl>),
    TouchEnd(Option<TouchControl>),
}

/// Folds raw key and touch events into the shared [`InputState`].
///
/// The only writer of the action table. The frame driver copies
/// [`InputAggregator::state`] once at the start of each frame.
#[derive(Debug, Clone, Default)]
pub struct InputAggregator {
    state: InputState,
    bindings: KeyBindings,
    touch: TouchSurface,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn touch_surface(&self) -> TouchSurface {
        self.touch
    }

    pub fn set_action(&mut self, action: Action, pressed: bool) {
        self.state.set_action(action, pressed);
    }

    pub fn get(&self, action: Action) -> bool {
        self.state.get(action)
    }

    /// Apply one event. Returns the action it wrote, if any.
    pub fn handle(&mut self, event: &InputEvent) -> Option<Action> {
        match event {
            InputEvent::KeyDown(key) => self.key_event(key, true),
            InputEvent::KeyUp(key) => self.key_event(key, false),
            InputEvent::TouchStart(control) => self.touch_event(*control, true),
            InputEvent::TouchEnd(control) => self.touch_event(*control, false),
        }
    }

    fn key_event(&mut self, key: &str, pressed: bool) -> Option<Action> {
        let action = self.bindings.action_for(key)?;
        self.state.apply(InputSource::Keyboard, action, pressed);
        tracing::trace!(key, ?action, pressed, "key input");
        Some(action)
    }

    fn touch_event(&mut self, control: Option<TouchControl>, pressed: bool) -> Option<Action> {
        if !self.touch.is_revealed() {
            // Controls were hidden when this touch landed; a touch start only
            // reveals them.
            if pressed && self.touch.reveal() {
                tracing::info!("touch controls revealed");
            }
            return None;
        }
        let action = control?.action();
        self.state.apply(InputSource::Touch, action, pressed);
        tracing::trace!(?action, pressed, "touch input");
        Some(action)
    }
}
