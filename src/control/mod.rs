//! Control module: the robot's command protocol and everything needed to speak it.
//!
//! - `command`: command model and JSON wire encoding
//! - `telemetry`: decoded status returned with each command response
//! - `keymap`: input code to operator action table
//! - `config`: TOML configuration for the session
//! - `client`: HTTP transport to the robot server

pub mod client;
pub mod command;
pub mod config;
pub mod keymap;
pub mod telemetry;

pub use client::{RobotClient, Transport};
pub use command::{CameraSource, Command, CommandKind, CommandPayload, Direction};
pub use config::TeleopConfig;
pub use keymap::{Action, KeyMap};
pub use telemetry::Telemetry;
