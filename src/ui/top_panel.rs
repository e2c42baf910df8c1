//! # Top Panel - Operator Controls
//!
//! Fixed-height panel with three columns:
//! - Column 1: drive pad and lift/head buttons, active while held
//! - Column 2: camera controls
//! - Column 3: animation and face selectors with their confirm buttons
//!
//! Below the columns the active input label is shown as `Event [ label ]`.
//! Every control only raises an [`InputEvent`] with its button code; what the
//! code means is decided by the key map on the session side.

use crate::control::keymap::{Action, buttons};
use crate::session::InputEvent;
use crate::ui::AppState;
use eframe::egui;

const HOLD_BUTTON_SIZE: [f32; 2] = [80.0, 28.0];

/// Keyboard codes bound to the same action as a button, for its hover text.
fn key_hint(state: &AppState, action: Action) -> String {
    let mut keys: Vec<&str> = state.keymap.codes_for(action).filter(|code| !code.starts_with("btn")).collect();
    keys.sort();
    if keys.is_empty() { "No key bound".to_string() } else { format!("Key: {}", keys.join(", ")) }
}

/// Button that is active for as long as the pointer holds it down.
///
/// Raises `Activated` on the frame the press starts and `Released` on the frame it ends.
fn hold_button(ui: &mut egui::Ui, state: &mut AppState, label: &str, code: &'static str, action: Action) {
    let enabled = !state.session_ended;
    let response = ui.add_enabled(enabled, egui::Button::new(label).min_size(HOLD_BUTTON_SIZE.into()));
    let held = enabled && response.is_pointer_button_down_on();
    response.on_hover_text(key_hint(state, action));

    let was_held = state.held_buttons.contains(code);
    if held && !was_held {
        state.held_buttons.insert(code);
        state.send_input(InputEvent::activated(code));
    } else if !held && was_held {
        state.held_buttons.remove(code);
        state.send_input(InputEvent::released(code));
    }
}

fn click_button(ui: &mut egui::Ui, state: &AppState, label: &str, code: &'static str, action: Action) {
    let response = ui.add_enabled(!state.session_ended, egui::Button::new(label));
    let clicked = response.clicked();
    response.on_hover_text(key_hint(state, action));
    if clicked {
        state.send_input(InputEvent::activated(code));
    }
}

fn selector(ui: &mut egui::Ui, id: &str, options: &[String], selected: &mut String) {
    egui::ComboBox::from_id_salt(id).width(140.0).selected_text(selected.as_str()).show_ui(ui, |ui| {
        for option in options {
            ui.selectable_value(selected, option.clone(), option.as_str());
        }
    });
}

/// Render the top panel with the operator controls.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_controls").exact_height(170.0).show(ctx, |ui| {
        ui.columns(3, |cols| {
            // Column 1: drive pad and actuators
            cols[0].vertical(|ui| {
                ui.heading("Drive");
                ui.separator();
                ui.horizontal(|ui| {
                    ui.add_space(HOLD_BUTTON_SIZE[0] + ui.spacing().item_spacing.x);
                    hold_button(ui, state, "Forward", buttons::FORWARD, Action::Forward);
                });
                ui.horizontal(|ui| {
                    hold_button(ui, state, "Left", buttons::LEFT, Action::TurnLeft);
                    hold_button(ui, state, "Reverse", buttons::REVERSE, Action::Back);
                    hold_button(ui, state, "Right", buttons::RIGHT, Action::TurnRight);
                });
                ui.horizontal(|ui| {
                    hold_button(ui, state, "Lift up", buttons::LIFT_UP, Action::LiftUp);
                    hold_button(ui, state, "Lift down", buttons::LIFT_DOWN, Action::LiftDown);
                });
                ui.horizontal(|ui| {
                    hold_button(ui, state, "Head up", buttons::HEAD_UP, Action::HeadUp);
                    hold_button(ui, state, "Head down", buttons::HEAD_DOWN, Action::HeadDown);
                });
            });

            // Column 2: camera
            cols[1].vertical(|ui| {
                ui.heading("Camera");
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Status:");
                    let (text, color) = if state.camera_active {
                        ("streaming", egui::Color32::from_rgb(0, 160, 0))
                    } else {
                        ("off", egui::Color32::GRAY)
                    };
                    ui.label(egui::RichText::new(text).strong().color(color));
                });
                ui.horizontal(|ui| {
                    click_button(ui, state, "Camera on", buttons::CAMERA_ON, Action::CameraOn);
                    click_button(ui, state, "Camera off", buttons::CAMERA_OFF, Action::CameraOff);
                });
                click_button(ui, state, "Raspi snapshot", buttons::RASPI_CAMERA, Action::SecondaryCamera);
            });

            // Column 3: animations and faces
            cols[2].vertical(|ui| {
                ui.heading("Expression");
                ui.separator();
                egui::Grid::new("expression_grid").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
                    selector(ui, "animation_selector", &state.animations, &mut state.selected_animation);
                    let play = ui.add_enabled(!state.session_ended, egui::Button::new("Play"));
                    if play.clicked() {
                        state.send_input(InputEvent::confirmed(buttons::ANIMATION, state.selected_animation.clone()));
                    }
                    ui.end_row();

                    selector(ui, "face_selector", &state.faces, &mut state.selected_face);
                    let set = ui.add_enabled(!state.session_ended, egui::Button::new("Set face"));
                    if set.clicked() {
                        state.send_input(InputEvent::confirmed(buttons::SET_FACE, state.selected_face.clone()));
                    }
                    ui.end_row();
                });
            });
        });

        ui.separator();
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("Event [ {} ]", state.active_input_label)).monospace().strong());
            if state.session_ended {
                ui.add_space(20.0);
                ui.label(egui::RichText::new("Session ended").strong().color(egui::Color32::from_rgb(200, 60, 60)));
            }
        });
    });
}
