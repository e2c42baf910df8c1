// UI module for the Cozmo teleoperation client
//
// This module organizes the UI into separate components:
// - `top_panel`: Drive/actuator buttons, camera and animation controls, input label
// - `right_panel`: Telemetry status table
// - `camera_panel`: Primary and auxiliary camera images
// - `app_state`: Application state management, keyboard capture and main update loop

pub mod app_state;
pub mod camera_panel;
pub mod right_panel;
pub mod top_panel;

use embassy_sync::channel::TrySendError;

use crate::UIRefreshQueueSender;
use crate::control::Telemetry;

pub use app_state::AppState;

/// Render updates published by the session loops.
pub enum UIRefreshState {
    /// Fresh status decoded from a command response.
    Telemetry(Telemetry),
    /// Periodic republish of the active input label.
    InputLabel(String),
    /// Encoded bytes of the latest primary camera image.
    CameraFrame(Vec<u8>),
    /// Encoded bytes of the auxiliary camera snapshot.
    SecondaryCameraFrame(Vec<u8>),
    CameraStateChanged(bool),
    SessionEnded,
}

impl UIRefreshState {
    fn describe(&self) -> &'static str {
        match self {
            UIRefreshState::Telemetry(_) => "telemetry",
            UIRefreshState::InputLabel(_) => "input label",
            UIRefreshState::CameraFrame(_) => "camera frame",
            UIRefreshState::SecondaryCameraFrame(_) => "secondary camera frame",
            UIRefreshState::CameraStateChanged(_) => "camera state",
            UIRefreshState::SessionEnded => "session ended",
        }
    }
}

/// Hand an update to the UI without ever waiting on it. A full queue drops the update.
pub fn publish(ui_refresh_tx: &UIRefreshQueueSender, update: UIRefreshState) {
    if let Err(TrySendError::Full(update)) = ui_refresh_tx.try_send(update) {
        log::debug!("UI refresh queue full, dropping {}", update.describe());
    }
}
