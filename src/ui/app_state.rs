//! # Application State Management
//!
//! `AppState` owns everything the window shows and is the only bridge between
//! egui and the session running on the executor thread:
//!
//! - drains render updates from `ui_refresh_rx` every frame
//! - turns keyboard events and button presses into [`InputEvent`]s on `input_tx`
//! - delegates drawing to the top, right and camera panels
//!
//! Once the session has ended the window stays open with its last content, but
//! no further input is forwarded.

use eframe::egui;
use std::collections::HashSet;

use super::{UIRefreshState, camera_panel, right_panel, top_panel};
use crate::control::{KeyMap, TeleopConfig, Telemetry};
use crate::session::InputEvent;

/// Latest decoded image of one camera feed.
pub struct CameraView {
    name: &'static str,
    pub texture: Option<egui::TextureHandle>,
}

impl CameraView {
    pub fn new(name: &'static str) -> Self {
        Self { name, texture: None }
    }

    /// Replace the shown image. An undecodable payload keeps the previous image.
    pub fn update(&mut self, ctx: &egui::Context, bytes: &[u8]) {
        match image::load_from_memory(bytes) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.as_flat_samples();
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
                match &mut self.texture {
                    Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                    None => self.texture = Some(ctx.load_texture(self.name, color_image, egui::TextureOptions::LINEAR)),
                }
            }
            Err(e) => {
                log::warn!("Failed to decode {} image ({} bytes): {}", self.name, bytes.len(), e);
            }
        }
    }
}

pub struct AppState {
    /// Receiver for render updates from the session loops.
    pub ui_refresh_rx: crate::UIRefreshQueueReceiver,
    /// Sender for operator input towards the input router.
    pub input_tx: crate::InputQueueSender,

    /// Last value published by the tick loop.
    pub active_input_label: String,
    /// Most recent telemetry, replaced wholesale by each command response.
    pub telemetry: Option<Telemetry>,
    pub camera: CameraView,
    pub secondary_camera: CameraView,
    pub camera_active: bool,
    pub session_ended: bool,

    pub animations: Vec<String>,
    pub faces: Vec<String>,
    pub selected_animation: String,
    pub selected_face: String,

    /// Hold buttons currently pressed with the pointer, by button code.
    pub held_buttons: HashSet<&'static str>,
    pub keymap: KeyMap,
    repaint_interval: std::time::Duration,
}

impl AppState {
    pub fn new(rx: crate::UIRefreshQueueReceiver, tx: crate::InputQueueSender, config: &TeleopConfig) -> Self {
        Self {
            ui_refresh_rx: rx,
            input_tx: tx,
            active_input_label: String::new(),
            telemetry: None,
            camera: CameraView::new("camera"),
            secondary_camera: CameraView::new("secondary_camera"),
            camera_active: false,
            session_ended: false,
            animations: config.animations.clone(),
            faces: config.faces.clone(),
            selected_animation: config.animations.first().cloned().unwrap_or_default(),
            selected_face: config.faces.first().cloned().unwrap_or_default(),
            held_buttons: HashSet::new(),
            keymap: config.keymap.clone(),
            repaint_interval: std::time::Duration::from_millis(config.tick_period_ms),
        }
    }

    /// Forward one input event to the router. Dropped after the session ended or when the queue is full.
    pub fn send_input(&self, event: InputEvent) {
        if self.session_ended {
            return;
        }
        if self.input_tx.try_send(event).is_err() {
            log::debug!("Input queue full, dropping event");
        }
    }

    fn apply_update(&mut self, ctx: &egui::Context, update: UIRefreshState) {
        match update {
            UIRefreshState::Telemetry(telemetry) => {
                self.telemetry = Some(telemetry);
            }
            UIRefreshState::InputLabel(label) => {
                self.active_input_label = label;
            }
            UIRefreshState::CameraFrame(bytes) => {
                self.camera.update(ctx, &bytes);
            }
            UIRefreshState::SecondaryCameraFrame(bytes) => {
                self.secondary_camera.update(ctx, &bytes);
            }
            UIRefreshState::CameraStateChanged(active) => {
                self.camera_active = active;
            }
            UIRefreshState::SessionEnded => {
                self.session_ended = true;
                self.held_buttons.clear();
            }
        }
    }

    fn capture_keyboard(&self, ctx: &egui::Context) {
        // Text fields keep their keys to themselves
        if ctx.wants_keyboard_input() {
            return;
        }

        let events = ctx.input(|i| i.events.clone());
        for event in events {
            if let egui::Event::Key {
                key, physical_key, pressed, ..
            } = event
            {
                let code = key_code(physical_key.unwrap_or(key));
                if pressed {
                    self.send_input(InputEvent::activated(code));
                } else {
                    self.send_input(InputEvent::released(code));
                }
            }
        }
    }
}

/// Browser-style physical key code for an egui key, e.g. `ArrowUp`, `Digit1`, `KeyW`.
pub fn key_code(key: egui::Key) -> String {
    use egui::Key;
    let digit = match key {
        Key::Num0 => Some(0),
        Key::Num1 => Some(1),
        Key::Num2 => Some(2),
        Key::Num3 => Some(3),
        Key::Num4 => Some(4),
        Key::Num5 => Some(5),
        Key::Num6 => Some(6),
        Key::Num7 => Some(7),
        Key::Num8 => Some(8),
        Key::Num9 => Some(9),
        _ => None,
    };
    if let Some(d) = digit {
        return format!("Digit{}", d);
    }

    match key {
        Key::ArrowUp => "ArrowUp".to_string(),
        Key::ArrowDown => "ArrowDown".to_string(),
        Key::ArrowLeft => "ArrowLeft".to_string(),
        Key::ArrowRight => "ArrowRight".to_string(),
        Key::Escape => "Escape".to_string(),
        Key::Enter => "Enter".to_string(),
        Key::Space => "Space".to_string(),
        Key::Tab => "Tab".to_string(),
        Key::Backspace => "Backspace".to_string(),
        other => {
            let name = other.name();
            if name.len() == 1 && name.chars().all(|c| c.is_ascii_alphabetic()) {
                format!("Key{}", name.to_ascii_uppercase())
            } else {
                name.to_string()
            }
        }
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Repaint at the tick rate so camera frames and labels show up without input
        ctx.request_repaint_after(self.repaint_interval);

        while let Ok(update) = self.ui_refresh_rx.try_receive() {
            self.apply_update(ctx, update);
        }

        self.capture_keyboard(ctx);

        top_panel::render(ctx, self);
        right_panel::render(ctx, self);
        camera_panel::render(ctx, self);
    }
}
