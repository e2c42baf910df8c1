//! Command type definitions and their JSON wire encoding.
//!
//! A [`Command`] is built per dispatch and never outlives the request that
//! carries it. The robot server expects a flat JSON object with a `command`
//! kind and a `value` that is either a number or a string.

use serde::{Deserialize, Serialize};

/// Largest speed magnitude accepted by `move` and `turn`.
pub const MAX_SPEED: i32 = 100;

/// Value carried by `motor_stop`; the server ignores it.
pub const MOTOR_STOP_SENTINEL: i32 = 0;

/// Command kinds understood by the robot server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Move,
    Turn,
    Lift,
    Head,
    MotorStop,
    #[serde(rename = "camera")]
    CameraMode,
    Animation,
    Face,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Move => "move",
            CommandKind::Turn => "turn",
            CommandKind::Lift => "lift",
            CommandKind::Head => "head",
            CommandKind::MotorStop => "motor_stop",
            CommandKind::CameraMode => "camera",
            CommandKind::Animation => "animation",
            CommandKind::Face => "face",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel direction for the lift and head actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Image source the server should capture from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSource {
    /// The robot's own camera, served as the primary stream.
    Cozmo,
    /// The auxiliary camera attached to the server host.
    Raspi,
}

impl CameraSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraSource::Cozmo => "cozmo",
            CameraSource::Raspi => "raspi",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "cozmo" => Some(CameraSource::Cozmo),
            "raspi" => Some(CameraSource::Raspi),
            _ => None,
        }
    }
}

/// A command value: a signed number or an identifier string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandValue {
    Number(i32),
    Text(String),
}

impl std::fmt::Display for CommandValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandValue::Number(n) => write!(f, "{}", n),
            CommandValue::Text(s) => f.write_str(s),
        }
    }
}

/// Error raised when a payload does not describe a valid command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The payload was not valid JSON or did not match the payload shape.
    Malformed(String),
    /// `move`/`turn` with a non-numeric value or one outside [-100, 100].
    SpeedOutOfRange(CommandValue),
    /// `lift`/`head` with something other than `up` or `down`.
    InvalidDirection(CommandValue),
    /// `camera` naming an unknown source.
    UnknownCameraSource(CommandValue),
    /// `animation`/`face` without an identifier.
    MissingIdentifier(CommandKind),
    /// `motor_stop` carrying something other than the sentinel.
    InvalidSentinel(CommandValue),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Malformed(msg) => write!(f, "Malformed command payload: {}", msg),
            CommandError::SpeedOutOfRange(v) => write!(f, "Speed must be a number in [-{MAX_SPEED}, {MAX_SPEED}], got {}", v),
            CommandError::InvalidDirection(v) => write!(f, "Direction must be 'up' or 'down', got {}", v),
            CommandError::UnknownCameraSource(v) => write!(f, "Unknown camera source: {}", v),
            CommandError::MissingIdentifier(kind) => write!(f, "Command '{}' requires a non-empty identifier", kind),
            CommandError::InvalidSentinel(v) => write!(f, "motor_stop must carry {MOTOR_STOP_SENTINEL}, got {}", v),
        }
    }
}

impl std::error::Error for CommandError {}

/// JSON payload structure for the robot server endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub command: CommandKind,
    pub value: CommandValue,
}

/// An immutable command bound for the robot.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    kind: CommandKind,
    value: CommandValue,
}

impl Command {
    /// Drive straight; positive is forward. Clamped to [-100, 100].
    pub fn drive(speed: i32) -> Self {
        Self::numeric(CommandKind::Move, speed.clamp(-MAX_SPEED, MAX_SPEED))
    }

    /// Turn in place; positive is clockwise. Clamped to [-100, 100].
    pub fn turn(speed: i32) -> Self {
        Self::numeric(CommandKind::Turn, speed.clamp(-MAX_SPEED, MAX_SPEED))
    }

    pub fn lift(direction: Direction) -> Self {
        Self::text(CommandKind::Lift, direction.as_str())
    }

    pub fn head(direction: Direction) -> Self {
        Self::text(CommandKind::Head, direction.as_str())
    }

    pub fn motor_stop() -> Self {
        Self::numeric(CommandKind::MotorStop, MOTOR_STOP_SENTINEL)
    }

    pub fn camera(source: CameraSource) -> Self {
        Self::text(CommandKind::CameraMode, source.as_str())
    }

    pub fn animation(name: impl Into<String>) -> Self {
        Self::text(CommandKind::Animation, name)
    }

    pub fn face(name: impl Into<String>) -> Self {
        Self::text(CommandKind::Face, name)
    }

    fn numeric(kind: CommandKind, value: i32) -> Self {
        Self {
            kind,
            value: CommandValue::Number(value),
        }
    }

    fn text(kind: CommandKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: CommandValue::Text(value.into()),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn value(&self) -> &CommandValue {
        &self.value
    }

    /// Convert the command to its JSON payload.
    pub fn to_payload(&self) -> CommandPayload {
        CommandPayload {
            command: self.kind,
            value: self.value.clone(),
        }
    }

    /// Rebuild a command from a payload, enforcing each kind's value domain.
    pub fn from_payload(payload: CommandPayload) -> Result<Self, CommandError> {
        let CommandPayload { command: kind, value } = payload;
        match kind {
            CommandKind::Move | CommandKind::Turn => match value {
                CommandValue::Number(speed) if (-MAX_SPEED..=MAX_SPEED).contains(&speed) => Ok(Self::numeric(kind, speed)),
                other => Err(CommandError::SpeedOutOfRange(other)),
            },
            CommandKind::Lift | CommandKind::Head => match &value {
                CommandValue::Text(s) if Direction::parse(s).is_some() => Ok(Self { kind, value }),
                _ => Err(CommandError::InvalidDirection(value)),
            },
            CommandKind::MotorStop => match value {
                CommandValue::Number(MOTOR_STOP_SENTINEL) => Ok(Self::motor_stop()),
                // Older clients sent the sentinel as a string.
                CommandValue::Text(ref s) if s == "0" => Ok(Self::motor_stop()),
                other => Err(CommandError::InvalidSentinel(other)),
            },
            CommandKind::CameraMode => match &value {
                CommandValue::Text(s) => match CameraSource::parse(s) {
                    Some(source) => Ok(Self::camera(source)),
                    None => Err(CommandError::UnknownCameraSource(value)),
                },
                _ => Err(CommandError::UnknownCameraSource(value)),
            },
            CommandKind::Animation | CommandKind::Face => match value {
                CommandValue::Text(s) if !s.trim().is_empty() => Ok(Self::text(kind, s)),
                _ => Err(CommandError::MissingIdentifier(kind)),
            },
        }
    }

    /// Encode to the JSON request body.
    pub fn encode(&self) -> Result<String, CommandError> {
        serde_json::to_string(&self.to_payload()).map_err(|e| CommandError::Malformed(e.to_string()))
    }

    /// Decode and validate a JSON request body.
    pub fn decode(body: &str) -> Result<Self, CommandError> {
        let payload: CommandPayload = serde_json::from_str(body).map_err(|e| CommandError::Malformed(e.to_string()))?;
        Self::from_payload(payload)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.value)
    }
}
