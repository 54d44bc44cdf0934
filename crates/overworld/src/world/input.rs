#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

const ACTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
        }
    }
}

/// Raw movement intent, each component in `-1..=1`. Y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub x: i8,
    pub y: i8,
}

impl MoveIntent {
    pub const NONE: MoveIntent = MoveIntent { x: 0, y: 0 };

    pub const fn new(x: i8, y: i8) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn is_none(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

const fn clamp_unit(value: i8) -> i8 {
    if value > 0 {
        1
    } else if value < 0 {
        -1
    } else {
        0
    }
}

/// Everything the simulation reads from input for one tick. Held
/// directions are level-triggered; every `*_pressed` flag is an edge that
/// is true for exactly one tick per physical key-down.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    interact_pressed: bool,
    advance_pressed: bool,
    pause_pressed: bool,
    reset_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_actions(actions: ActionStates) -> Self {
        Self {
            actions,
            ..Self::default()
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_interact_pressed(mut self, pressed: bool) -> Self {
        self.interact_pressed = pressed;
        self
    }

    pub fn with_advance_pressed(mut self, pressed: bool) -> Self {
        self.advance_pressed = pressed;
        self
    }

    pub fn with_pause_pressed(mut self, pressed: bool) -> Self {
        self.pause_pressed = pressed;
        self
    }

    pub fn with_reset_pressed(mut self, pressed: bool) -> Self {
        self.reset_pressed = pressed;
        self
    }

    pub fn interact_pressed(&self) -> bool {
        self.interact_pressed
    }

    pub fn advance_pressed(&self) -> bool {
        self.advance_pressed
    }

    pub fn pause_pressed(&self) -> bool {
        self.pause_pressed
    }

    pub fn reset_pressed(&self) -> bool {
        self.reset_pressed
    }

    pub fn move_intent(&self) -> MoveIntent {
        let mut x = 0i8;
        let mut y = 0i8;
        if self.is_down(InputAction::MoveRight) {
            x += 1;
        }
        if self.is_down(InputAction::MoveLeft) {
            x -= 1;
        }
        if self.is_down(InputAction::MoveDown) {
            y += 1;
        }
        if self.is_down(InputAction::MoveUp) {
            y -= 1;
        }
        MoveIntent::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_keys_cancel() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveLeft, true)
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::MoveUp, true);
        assert_eq!(snapshot.move_intent(), MoveIntent::new(0, -1));
    }

    #[test]
    fn empty_snapshot_has_no_intent_or_edges() {
        let snapshot = InputSnapshot::empty();
        assert!(snapshot.move_intent().is_none());
        assert!(!snapshot.interact_pressed());
        assert!(!snapshot.advance_pressed());
        assert!(!snapshot.pause_pressed());
        assert!(!snapshot.reset_pressed());
    }

    #[test]
    fn intent_components_are_clamped() {
        assert_eq!(MoveIntent::new(5, -9), MoveIntent { x: 1, y: -1 });
    }
}
