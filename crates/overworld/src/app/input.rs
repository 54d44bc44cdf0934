use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::world::{ActionStates, InputAction, InputSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKey {
    Confirm,
    Pause,
    Reset,
    Quit,
}

/// Turns raw key events into per-tick snapshots. Held directions are
/// tracked as levels; command keys latch a one-tick edge on the transition
/// from up to down, so OS key repeat never retriggers them.
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    pub(crate) quit_requested: bool,
    action_states: ActionStates,
    confirm_is_down: bool,
    confirm_pressed_edge: bool,
    pause_is_down: bool,
    pause_pressed_edge: bool,
    reset_is_down: bool,
    reset_pressed_edge: bool,
}

impl InputCollector {
    pub(crate) fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let is_pressed = state == ElementState::Pressed;
        if let Some(action) = movement_action_for(key) {
            self.action_states.set(action, is_pressed);
            return;
        }
        match command_key_for(key) {
            Some(CommandKey::Confirm) => {
                latch_edge(&mut self.confirm_is_down, &mut self.confirm_pressed_edge, is_pressed)
            }
            Some(CommandKey::Pause) => {
                latch_edge(&mut self.pause_is_down, &mut self.pause_pressed_edge, is_pressed)
            }
            Some(CommandKey::Reset) => {
                latch_edge(&mut self.reset_is_down, &mut self.reset_pressed_edge, is_pressed)
            }
            Some(CommandKey::Quit) => {
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            None => {}
        }
    }

    /// Drops every held key, e.g. when the window loses focus and the
    /// matching release events will never arrive.
    pub(crate) fn release_all(&mut self) {
        self.action_states = ActionStates::default();
        self.confirm_is_down = false;
        self.pause_is_down = false;
        self.reset_is_down = false;
    }

    pub(crate) fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::from_actions(self.action_states)
            .with_interact_pressed(self.confirm_pressed_edge)
            .with_advance_pressed(self.confirm_pressed_edge)
            .with_pause_pressed(self.pause_pressed_edge)
            .with_reset_pressed(self.reset_pressed_edge);
        self.confirm_pressed_edge = false;
        self.pause_pressed_edge = false;
        self.reset_pressed_edge = false;
        snapshot
    }
}

fn latch_edge(is_down: &mut bool, pressed_edge: &mut bool, is_pressed: bool) {
    if is_pressed && !*is_down {
        *pressed_edge = true;
    }
    *is_down = is_pressed;
}

fn movement_action_for(key: PhysicalKey) -> Option<InputAction> {
    match key {
        PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
            Some(InputAction::MoveUp)
        }
        PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
            Some(InputAction::MoveDown)
        }
        PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
            Some(InputAction::MoveLeft)
        }
        PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
            Some(InputAction::MoveRight)
        }
        _ => None,
    }
}

fn command_key_for(key: PhysicalKey) -> Option<CommandKey> {
    match key {
        PhysicalKey::Code(KeyCode::KeyZ | KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space) => {
            Some(CommandKey::Confirm)
        }
        PhysicalKey::Code(KeyCode::KeyP) => Some(CommandKey::Pause),
        PhysicalKey::Code(KeyCode::KeyR) => Some(CommandKey::Reset),
        PhysicalKey::Code(KeyCode::Escape) => Some(CommandKey::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputCollector, code: KeyCode) {
        input.handle_key(PhysicalKey::Code(code), ElementState::Pressed);
    }

    fn release(input: &mut InputCollector, code: KeyCode) {
        input.handle_key(PhysicalKey::Code(code), ElementState::Released);
    }

    #[test]
    fn confirm_press_is_edge_triggered_for_single_tick() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyZ);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.interact_pressed());
        assert!(first.advance_pressed());
        assert!(!second.interact_pressed());
        assert!(!second.advance_pressed());
    }

    #[test]
    fn held_confirm_does_not_retrigger_until_released() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::Enter);
        let first = input.snapshot_for_tick();
        press(&mut input, KeyCode::Enter);
        let second = input.snapshot_for_tick();
        release(&mut input, KeyCode::Enter);
        press(&mut input, KeyCode::Enter);
        let third = input.snapshot_for_tick();

        assert!(first.interact_pressed());
        assert!(!second.interact_pressed());
        assert!(third.interact_pressed());
    }

    #[test]
    fn wasd_and_arrow_keys_map_to_movement() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::ArrowLeft);

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.is_down(InputAction::MoveUp));
        assert!(snapshot.is_down(InputAction::MoveLeft));

        release(&mut input, KeyCode::KeyW);
        assert!(!input.snapshot_for_tick().is_down(InputAction::MoveUp));
    }

    #[test]
    fn held_direction_persists_across_ticks() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyD);
        for _ in 0..3 {
            assert!(input.snapshot_for_tick().is_down(InputAction::MoveRight));
        }
    }

    #[test]
    fn pause_and_reset_keys_latch_edges() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyP);
        press(&mut input, KeyCode::KeyR);
        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.pause_pressed());
        assert!(snapshot.reset_pressed());
        assert!(!input.snapshot_for_tick().pause_pressed());
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::Escape);
        assert!(input.quit_requested);
    }

    #[test]
    fn release_all_clears_held_state() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::ArrowDown);
        press(&mut input, KeyCode::Space);
        input.snapshot_for_tick();
        input.release_all();

        let snapshot = input.snapshot_for_tick();
        assert!(!snapshot.is_down(InputAction::MoveDown));
        press(&mut input, KeyCode::Space);
        assert!(input.snapshot_for_tick().interact_pressed());
    }
}
