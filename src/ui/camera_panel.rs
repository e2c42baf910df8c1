//! # Camera Panel
//!
//! Central area showing the robot camera next to the auxiliary snapshot. Both
//! images scale to fit their half of the panel and keep their aspect ratio.

use crate::ui::AppState;
use crate::ui::app_state::CameraView;
use eframe::egui;

fn show_view(ui: &mut egui::Ui, title: &str, view: &CameraView, placeholder: &str) {
    ui.vertical(|ui| {
        ui.label(egui::RichText::new(title).strong());
        match &view.texture {
            Some(texture) => {
                let available = ui.available_size();
                let size = texture.size_vec2();
                let scale = (available.x / size.x).min(available.y / size.y).min(2.0);
                ui.image((texture.id(), size * scale));
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new(placeholder).color(egui::Color32::GRAY));
                });
            }
        }
    });
}

/// Render the central panel with both camera images.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let placeholder = if state.camera_active { "Waiting for image..." } else { "Camera off" };
        ui.columns(2, |cols| {
            show_view(&mut cols[0], "Robot camera", &state.camera, placeholder);
            show_view(&mut cols[1], "Raspi camera", &state.secondary_camera, "No snapshot yet");
        });
    });
}
