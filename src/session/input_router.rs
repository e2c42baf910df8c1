//! Turns raw input events into motion commands and session transitions.
//!
//! There is a single "currently held" label. Releasing any code stops all
//! motors and clears it, even when another key is still physically held:
//! with two keys down, releasing one stops the robot and blanks the label.
//! Held keys that auto-repeat re-dispatch their command on every repeat.

use crate::control::{Action, CameraSource, Command, Direction, KeyMap};

use super::state::SessionState;

/// Events raised by the UI surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down (or repeated) or a button was pressed.
    /// `selection` carries the chosen animation/face for confirm buttons.
    Activated { code: String, selection: Option<String> },
    /// A key or hold-button was released.
    Released { code: String },
}

impl InputEvent {
    pub fn activated(code: impl Into<String>) -> Self {
        InputEvent::Activated {
            code: code.into(),
            selection: None,
        }
    }

    pub fn confirmed(code: impl Into<String>, selection: impl Into<String>) -> Self {
        InputEvent::Activated {
            code: code.into(),
            selection: Some(selection.into()),
        }
    }

    pub fn released(code: impl Into<String>) -> Self {
        InputEvent::Released { code: code.into() }
    }
}

/// Outward work requested by the router; everything else it does in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Dispatch(Command),
    /// Reload the auxiliary camera image once the settle delay has passed.
    ReloadSecondaryCamera,
}

pub struct InputRouter<'a> {
    state: &'a SessionState,
    keymap: &'a KeyMap,
}

impl<'a> InputRouter<'a> {
    pub fn new(state: &'a SessionState, keymap: &'a KeyMap) -> Self {
        Self { state, keymap }
    }

    pub fn handle(&self, event: InputEvent) -> Vec<Effect> {
        if !self.state.is_running() {
            log::debug!("Session terminated, ignoring {:?}", event);
            return Vec::new();
        }

        match event {
            InputEvent::Activated { code, selection } => self.activated(&code, selection),
            InputEvent::Released { .. } => {
                self.state.clear_active_input_label();
                vec![Effect::Dispatch(Command::motor_stop())]
            }
        }
    }

    fn activated(&self, code: &str, selection: Option<String>) -> Vec<Effect> {
        let speed = self.state.move_speed();
        let mut effects = Vec::new();

        match self.keymap.lookup(code) {
            Some(Action::Terminate) => {
                if self.state.request_termination() {
                    log::info!("Termination requested by '{}'", code);
                }
                effects.push(Effect::Dispatch(Command::motor_stop()));
            }
            Some(Action::Forward) => effects.push(Effect::Dispatch(Command::drive(speed))),
            Some(Action::Back) => effects.push(Effect::Dispatch(Command::drive(-speed))),
            Some(Action::TurnLeft) => effects.push(Effect::Dispatch(Command::turn(-speed))),
            Some(Action::TurnRight) => effects.push(Effect::Dispatch(Command::turn(speed))),
            Some(Action::LiftUp) => effects.push(Effect::Dispatch(Command::lift(Direction::Up))),
            Some(Action::LiftDown) => effects.push(Effect::Dispatch(Command::lift(Direction::Down))),
            Some(Action::HeadUp) => effects.push(Effect::Dispatch(Command::head(Direction::Up))),
            Some(Action::HeadDown) => effects.push(Effect::Dispatch(Command::head(Direction::Down))),
            Some(Action::CameraToggle) => {
                let camera = self.state.camera();
                if camera.is_active() {
                    camera.stop();
                } else {
                    camera.start();
                }
            }
            Some(Action::CameraOn) => {
                self.state.camera().start();
            }
            Some(Action::CameraOff) => {
                self.state.camera().stop();
            }
            Some(Action::SecondaryCamera) => {
                effects.push(Effect::Dispatch(Command::camera(CameraSource::Raspi)));
                effects.push(Effect::ReloadSecondaryCamera);
            }
            Some(Action::PlayAnimation) => match selection {
                Some(name) => effects.push(Effect::Dispatch(Command::animation(name))),
                None => log::debug!("'{}' carries no animation selection", code),
            },
            Some(Action::SetFace) => match selection {
                Some(name) => effects.push(Effect::Dispatch(Command::face(name))),
                None => log::debug!("'{}' carries no face selection", code),
            },
            None => {}
        }

        self.state.set_active_input_label(code);
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::keymap::buttons;

    fn dispatched(effects: &[Effect]) -> Vec<Command> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Dispatch(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_forward_then_release_with_default_speed() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);

        assert_eq!(router.handle(InputEvent::activated("ArrowUp")), vec![Effect::Dispatch(Command::drive(30))]);
        assert_eq!(state.active_input_label(), "ArrowUp");

        assert_eq!(router.handle(InputEvent::released("ArrowUp")), vec![Effect::Dispatch(Command::motor_stop())]);
        assert_eq!(state.active_input_label(), "");
    }

    #[test]
    fn test_directional_sign_and_magnitude() {
        let keymap = KeyMap::default();
        for speed in [0, 1, 30, 64, 100] {
            let state = SessionState::new(speed);
            let router = InputRouter::new(&state, &keymap);
            let cases = [
                ("ArrowUp", Command::drive(speed)),
                ("ArrowDown", Command::drive(-speed)),
                ("ArrowLeft", Command::turn(-speed)),
                ("ArrowRight", Command::turn(speed)),
                (buttons::FORWARD, Command::drive(speed)),
                (buttons::REVERSE, Command::drive(-speed)),
            ];
            for (code, expected) in cases {
                assert_eq!(dispatched(&router.handle(InputEvent::activated(code))), vec![expected], "code {code} speed {speed}");
            }
        }
    }

    #[test]
    fn test_any_release_stops_and_clears_even_with_two_held() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);

        router.handle(InputEvent::activated("ArrowUp"));
        router.handle(InputEvent::activated("ArrowLeft"));
        assert_eq!(state.active_input_label(), "ArrowLeft");

        // ArrowLeft is still held, yet releasing ArrowUp stops everything.
        let effects = router.handle(InputEvent::released("ArrowUp"));
        assert_eq!(dispatched(&effects), vec![Command::motor_stop()]);
        assert_eq!(state.active_input_label(), "");

        // Unmapped codes stop the motors on release too.
        let effects = router.handle(InputEvent::released("KeyZ"));
        assert_eq!(dispatched(&effects), vec![Command::motor_stop()]);
    }

    #[test]
    fn test_repeats_are_not_filtered() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);
        for _ in 0..3 {
            assert_eq!(dispatched(&router.handle(InputEvent::activated("ArrowRight"))), vec![Command::turn(30)]);
        }
    }

    #[test]
    fn test_lift_and_head() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);
        assert_eq!(dispatched(&router.handle(InputEvent::activated("Digit1"))), vec![Command::lift(Direction::Up)]);
        assert_eq!(dispatched(&router.handle(InputEvent::activated("Digit2"))), vec![Command::lift(Direction::Down)]);
        assert_eq!(dispatched(&router.handle(InputEvent::activated(buttons::HEAD_UP))), vec![Command::head(Direction::Up)]);
        assert_eq!(dispatched(&router.handle(InputEvent::activated("Digit4"))), vec![Command::head(Direction::Down)]);
    }

    #[test]
    fn test_camera_toggle_strictly_alternates() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);

        assert!(router.handle(InputEvent::activated("Digit5")).is_empty());
        assert!(state.camera().is_active());
        router.handle(InputEvent::activated("Digit5"));
        assert!(!state.camera().is_active());
        router.handle(InputEvent::activated("Digit5"));
        assert!(state.camera().is_active());
    }

    #[test]
    fn test_camera_on_off_buttons_are_idempotent() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);

        router.handle(InputEvent::activated(buttons::CAMERA_ON));
        router.handle(InputEvent::activated(buttons::CAMERA_ON));
        assert!(state.camera().is_active());
        router.handle(InputEvent::activated(buttons::CAMERA_OFF));
        router.handle(InputEvent::activated(buttons::CAMERA_OFF));
        assert!(!state.camera().is_active());
    }

    #[test]
    fn test_secondary_camera_requests_capture_then_reload() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);
        assert_eq!(
            router.handle(InputEvent::activated("Digit6")),
            vec![Effect::Dispatch(Command::camera(CameraSource::Raspi)), Effect::ReloadSecondaryCamera]
        );
    }

    #[test]
    fn test_animation_and_face_use_the_selection() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);

        assert_eq!(
            dispatched(&router.handle(InputEvent::confirmed(buttons::ANIMATION, "anim_bored_01"))),
            vec![Command::animation("anim_bored_01")]
        );
        assert_eq!(dispatched(&router.handle(InputEvent::confirmed(buttons::SET_FACE, "wink"))), vec![Command::face("wink")]);
        assert!(router.handle(InputEvent::activated(buttons::SET_FACE)).is_empty());
        assert_eq!(state.active_input_label(), buttons::SET_FACE);
    }

    #[test]
    fn test_unmapped_code_only_records_label() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);
        assert!(router.handle(InputEvent::activated("KeyQ")).is_empty());
        assert_eq!(state.active_input_label(), "KeyQ");
    }

    #[test]
    fn test_termination_is_final() {
        let state = SessionState::new(30);
        let keymap = KeyMap::default();
        let router = InputRouter::new(&state, &keymap);

        assert_eq!(dispatched(&router.handle(InputEvent::activated("Escape"))), vec![Command::motor_stop()]);
        assert!(!state.is_running());
        assert_eq!(state.active_input_label(), "Escape");

        assert!(router.handle(InputEvent::activated("ArrowUp")).is_empty());
        assert!(router.handle(InputEvent::released("Escape")).is_empty());
        assert_eq!(state.active_input_label(), "Escape");
    }
}
