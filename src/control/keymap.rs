//! Mapping from input codes (keys and on-screen buttons) to operator actions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What an input code asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Terminate,
    Forward,
    Back,
    TurnLeft,
    TurnRight,
    LiftUp,
    LiftDown,
    HeadUp,
    HeadDown,
    CameraToggle,
    CameraOn,
    CameraOff,
    SecondaryCamera,
    PlayAnimation,
    SetFace,
}

/// Codes raised by the on-screen buttons.
pub mod buttons {
    pub const FORWARD: &str = "btnForward";
    pub const REVERSE: &str = "btnReverse";
    pub const LEFT: &str = "btnLeft";
    pub const RIGHT: &str = "btnRight";
    pub const LIFT_UP: &str = "btnLiftUp";
    pub const LIFT_DOWN: &str = "btnLiftDown";
    pub const HEAD_UP: &str = "btnHeadUp";
    pub const HEAD_DOWN: &str = "btnHeadDown";
    pub const CAMERA_ON: &str = "btnCameraOn";
    pub const CAMERA_OFF: &str = "btnCameraOff";
    pub const RASPI_CAMERA: &str = "btnRaspiCamera";
    pub const ANIMATION: &str = "btnAnimation";
    pub const SET_FACE: &str = "btnSetFace";
}

const DEFAULT_BINDINGS: &[(&str, Action)] = &[
    ("Escape", Action::Terminate),
    ("ArrowUp", Action::Forward),
    ("ArrowDown", Action::Back),
    ("ArrowLeft", Action::TurnLeft),
    ("ArrowRight", Action::TurnRight),
    ("Digit1", Action::LiftUp),
    ("Digit2", Action::LiftDown),
    ("Digit3", Action::HeadUp),
    ("Digit4", Action::HeadDown),
    ("Digit5", Action::CameraToggle),
    ("Digit6", Action::SecondaryCamera),
    (buttons::FORWARD, Action::Forward),
    (buttons::REVERSE, Action::Back),
    (buttons::LEFT, Action::TurnLeft),
    (buttons::RIGHT, Action::TurnRight),
    (buttons::LIFT_UP, Action::LiftUp),
    (buttons::LIFT_DOWN, Action::LiftDown),
    (buttons::HEAD_UP, Action::HeadUp),
    (buttons::HEAD_DOWN, Action::HeadDown),
    (buttons::CAMERA_ON, Action::CameraOn),
    (buttons::CAMERA_OFF, Action::CameraOff),
    (buttons::RASPI_CAMERA, Action::SecondaryCamera),
    (buttons::ANIMATION, Action::PlayAnimation),
    (buttons::SET_FACE, Action::SetFace),
];

/// Code to action table. A configured table replaces the defaults entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap(HashMap<String, Action>);

impl KeyMap {
    pub fn lookup(&self, code: &str) -> Option<Action> {
        self.0.get(code).copied()
    }

    pub fn codes_for(&self, action: Action) -> impl Iterator<Item = &str> {
        self.0.iter().filter(move |(_, a)| **a == action).map(|(code, _)| code.as_str())
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self(DEFAULT_BINDINGS.iter().map(|(code, action)| (code.to_string(), *action)).collect())
    }
}

impl FromIterator<(String, Action)> for KeyMap {
    fn from_iter<I: IntoIterator<Item = (String, Action)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keymap = KeyMap::default();
        assert_eq!(keymap.lookup("Escape"), Some(Action::Terminate));
        assert_eq!(keymap.lookup("ArrowLeft"), Some(Action::TurnLeft));
        assert_eq!(keymap.lookup(buttons::REVERSE), Some(Action::Back));
        assert_eq!(keymap.lookup("Digit5"), Some(Action::CameraToggle));
        assert_eq!(keymap.lookup("KeyQ"), None);

        let mut forward: Vec<&str> = keymap.codes_for(Action::Forward).collect();
        forward.sort();
        assert_eq!(forward, vec!["ArrowUp", "btnForward"]);
    }

    #[test]
    fn test_deserialize_from_toml_table() {
        let keymap: KeyMap = toml::from_str("KeyW = \"forward\"\nKeyQ = \"terminate\"\n").unwrap();
        let expected: KeyMap = [("KeyW".to_string(), Action::Forward), ("KeyQ".to_string(), Action::Terminate)].into_iter().collect();
        assert_eq!(keymap, expected);
        assert_eq!(keymap.lookup("ArrowUp"), None);
    }
}
