//! # Right Panel - Telemetry Status
//!
//! Formats the most recent [`Telemetry`] into display rows and renders them as
//! a two-column table. Each row uses a fixed precision:
//! - position, wheel speeds, accelerometer and battery: 1 decimal
//! - angles, head, lift and gyroscope: 3 decimals
//! - status and backpack touch sensor: hexadecimal
//! - cliff sensor data: the raw list
//!
//! Missing fields render as `-` so a partial payload still shows everything it has.

use crate::control::Telemetry;
use crate::control::telemetry::Axes;
use crate::ui::AppState;
use eframe::egui;

const MISSING: &str = "-";

fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => MISSING.to_string(),
    }
}

fn hex(value: Option<u64>) -> String {
    match value {
        Some(v) => format!("{:x}", v),
        None => MISSING.to_string(),
    }
}

fn triple(axes: &Axes, decimals: usize) -> String {
    format!("{}, {}, {}", fixed(axes.x, decimals), fixed(axes.y, decimals), fixed(axes.z, decimals))
}

/// Display rows for one telemetry snapshot, in panel order.
pub fn telemetry_rows(t: &Telemetry) -> Vec<(&'static str, String)> {
    vec![
        (
            "Pose",
            format!("({}) - [{}, {}]", triple(&t.pose, 1), fixed(t.pose_angle_rad, 3), fixed(t.pose_pitch_rad, 3)),
        ),
        (
            "Wheels",
            format!("({}, {})", fixed(t.left_wheel_speed_mmps, 1), fixed(t.right_wheel_speed_mmps, 1)),
        ),
        ("Head", fixed(t.head_angle_rad, 3)),
        ("Lift", fixed(t.lift_height_mm, 3)),
        ("Accel", format!("({}) - [{}]", triple(&t.accel, 1), triple(&t.gyro, 3))),
        ("Status", hex(t.status)),
        ("Battery", fixed(t.battery_voltage, 1)),
        ("Touch", hex(t.backpack_touch_sensor_raw)),
        (
            "Cliff",
            match &t.cliff_data_raw {
                Some(values) => values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(","),
                None => MISSING.to_string(),
            },
        ),
        ("Timestamp", t.timestamp.map_or_else(|| MISSING.to_string(), |v| v.to_string())),
        ("Path segment", t.curr_path_segment.map_or_else(|| MISSING.to_string(), |v| v.to_string())),
    ]
}

/// Render the right panel with the latest telemetry.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::right("telemetry_panel").resizable(false).exact_width(320.0).show(ctx, |ui| {
        ui.heading("Robot status");
        ui.separator();

        let Some(telemetry) = &state.telemetry else {
            ui.centered_and_justified(|ui| {
                ui.label("No status received yet. Send a command to refresh.");
            });
            return;
        };

        let rows = telemetry_rows(telemetry);

        use egui_extras::{Column, TableBuilder};
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::exact(90.0))
            .column(Column::remainder())
            .body(|mut body| {
                for (name, value) in rows {
                    body.row(20.0, |mut row| {
                        row.col(|ui| {
                            ui.label(name);
                        });
                        row.col(|ui| {
                            ui.label(egui::RichText::new(value).monospace());
                        });
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::telemetry::tests::FULL_PAYLOAD;

    fn row<'a>(rows: &'a [(&'static str, String)], name: &str) -> &'a str {
        rows.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str()).unwrap()
    }

    #[test]
    fn test_full_payload_formatting() {
        let telemetry = Telemetry::from_json(FULL_PAYLOAD).unwrap();
        let rows = telemetry_rows(&telemetry);

        assert_eq!(row(&rows, "Pose"), "(12.3, -3.2, 0.0) - [1.571, -0.012]");
        assert_eq!(row(&rows, "Wheels"), "(50.0, -49.9)");
        assert_eq!(row(&rows, "Head"), "0.432");
        assert_eq!(row(&rows, "Lift"), "32.000");
        assert_eq!(row(&rows, "Accel"), "(1.3, -0.5, 9.8) - [0.001, -0.002, 0.123]");
        assert_eq!(row(&rows, "Status"), "2100");
        assert_eq!(row(&rows, "Battery"), "3.9");
        assert_eq!(row(&rows, "Touch"), "fff");
        assert_eq!(row(&rows, "Cliff"), "212,198,201,220");
        assert_eq!(row(&rows, "Timestamp"), "123456");
        assert_eq!(row(&rows, "Path segment"), "-1");
    }

    #[test]
    fn test_missing_fields_render_as_placeholder() {
        let telemetry = Telemetry::from_json(r#"{"pose_x": 5.0, "status": 255}"#).unwrap();
        let rows = telemetry_rows(&telemetry);

        assert_eq!(row(&rows, "Pose"), "(5.0, -, -) - [-, -]");
        assert_eq!(row(&rows, "Status"), "ff");
        assert_eq!(row(&rows, "Battery"), "-");
        assert_eq!(row(&rows, "Cliff"), "-");
    }
}
