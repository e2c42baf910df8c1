//! Decoded robot status returned in the body of a command response.
//!
//! Decoding is per field: a field that is missing or has the wrong JSON type
//! is left as `None` and the rest of the payload is still used. Only a body
//! that is not a JSON object at all is rejected.

use serde_json::{Map, Value};

/// Error raised when a response body cannot be read as telemetry.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryError {
    InvalidJson(String),
    NotAnObject,
}

impl std::fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelemetryError::InvalidJson(msg) => write!(f, "Invalid telemetry JSON: {}", msg),
            TelemetryError::NotAnObject => write!(f, "Telemetry payload is not a JSON object"),
        }
    }
}

impl std::error::Error for TelemetryError {}

/// A three-component reading expanded on the wire as `<prefix>_x/_y/_z`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Axes {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

/// One status snapshot. Created per response and never merged with older ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Telemetry {
    pub timestamp: Option<u64>,
    /// Position in mm.
    pub pose: Axes,
    pub pose_angle_rad: Option<f64>,
    pub pose_pitch_rad: Option<f64>,
    pub left_wheel_speed_mmps: Option<f64>,
    pub right_wheel_speed_mmps: Option<f64>,
    pub head_angle_rad: Option<f64>,
    pub lift_height_mm: Option<f64>,
    pub accel: Axes,
    pub gyro: Axes,
    /// Robot status bitmask.
    pub status: Option<u64>,
    pub battery_voltage: Option<f64>,
    pub backpack_touch_sensor_raw: Option<u64>,
    pub cliff_data_raw: Option<Vec<i64>>,
    pub curr_path_segment: Option<i64>,
}

impl Telemetry {
    /// Decode a response body.
    pub fn from_json(body: &str) -> Result<Self, TelemetryError> {
        let value: Value = serde_json::from_str(body).map_err(|e| TelemetryError::InvalidJson(e.to_string()))?;
        let fields = value.as_object().ok_or(TelemetryError::NotAnObject)?;
        Ok(Self::from_fields(fields))
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let float = |name: &str| fields.get(name).and_then(Value::as_f64);
        let unsigned = |name: &str| fields.get(name).and_then(Value::as_u64);
        let axes = |prefix: &str| Axes {
            x: float(&format!("{prefix}_x")),
            y: float(&format!("{prefix}_y")),
            z: float(&format!("{prefix}_z")),
        };

        Self {
            timestamp: unsigned("timestamp"),
            pose: axes("pose"),
            pose_angle_rad: float("pose_angle_rad"),
            pose_pitch_rad: float("pose_pitch_rad"),
            left_wheel_speed_mmps: float("lwheel_speed_mmps"),
            right_wheel_speed_mmps: float("rwheel_speed_mmps"),
            head_angle_rad: float("head_angle_rad"),
            lift_height_mm: float("lift_height_mm"),
            accel: axes("accel"),
            gyro: axes("gyro"),
            status: unsigned("status"),
            battery_voltage: float("battery_voltage"),
            backpack_touch_sensor_raw: unsigned("backpack_touch_sensor_raw"),
            cliff_data_raw: fields.get("cliff_data_raw").and_then(Value::as_array).map(|items| items.iter().filter_map(Value::as_i64).collect()),
            curr_path_segment: fields.get("curr_path_segment").and_then(Value::as_i64),
        }
    }
}
