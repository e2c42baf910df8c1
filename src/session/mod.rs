//! Operator session core.
//!
//! All loops here run as tasks on one Embassy thread executor, so they are
//! cooperative and never run in parallel. They share nothing but the
//! [`SessionContext`], and coordinate only through its two session flags.
//!
//! ## Module Organization
//!
//! - `state`: session flags, active input label, move speed
//! - `input_router`: input events to commands and camera/session transitions
//! - `dispatcher`: fire-and-forget command requests and telemetry rendering
//! - `camera_poller`: start/stop camera refresh loop and the auxiliary reload
//! - `tick_loop`: fixed-rate label republish that ends the session
//! - `task`: executor entry point wiring the loops to the UI queues

pub mod camera_poller;
pub mod dispatcher;
pub mod input_router;
pub mod state;
pub mod task;
pub mod tick_loop;

use crate::UIRefreshQueueSender;
use crate::control::{RobotClient, TeleopConfig};

use state::SessionState;

pub use input_router::InputEvent;
pub use task::start_session;

/// Everything one session needs, created once and shared by reference with every task.
pub struct SessionContext {
    pub state: SessionState,
    pub config: TeleopConfig,
    pub transport: RobotClient,
    pub ui_refresh_tx: UIRefreshQueueSender,
}

impl SessionContext {
    pub fn new(config: TeleopConfig, transport: RobotClient, ui_refresh_tx: UIRefreshQueueSender) -> Self {
        Self {
            state: SessionState::new(config.move_speed),
            config,
            transport,
            ui_refresh_tx,
        }
    }
}
