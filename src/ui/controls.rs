use crate::engine::MediaEngine;
use crate::settings::SettingsStore;
use crate::shell::{Action, PlayerShell};
use egui::{Button, Slider, Ui};

pub struct PlayerControls;

impl PlayerControls {
    /// Scrubber row and transport row. Returns a clicked button's action.
    pub fn show<E: MediaEngine, S: SettingsStore>(
        ui: &mut Ui,
        shell: &mut PlayerShell<E, S>,
    ) -> Option<Action> {
        let mut picked = None;
        let skip_secs = shell.config().skip_ms / 1000;

        ui.horizontal(|ui| {
            let duration = shell.session().duration_ms as f64;
            let player_position = shell.session().position_ms as f64;

            // Keep the dragged value between frames instead of snapping back
            // to the engine position mid-drag.
            let slider_id = ui.id().with("seek_slider");
            let mut position = ui.memory(|mem| {
                mem.data.get_temp::<f64>(slider_id).unwrap_or(player_position)
            });

            let label_width = 110.0;
            ui.spacing_mut().slider_width = (ui.available_width() - label_width).max(50.0);
            let slider_response = ui.add(
                Slider::new(&mut position, 0.0..=duration)
                    .show_value(false)
                    .trailing_fill(true),
            );

            if slider_response.dragged() {
                ui.memory_mut(|mem| mem.data.insert_temp(slider_id, position));
            } else {
                ui.memory_mut(|mem| mem.data.insert_temp(slider_id, player_position));
            }

            if slider_response.drag_stopped() || slider_response.clicked() {
                shell.seek(position.max(0.0) as u64);
            }

            ui.label(shell.time_label());
        });

        ui.horizontal(|ui| {
            if ui
                .button("⏮")
                .on_hover_text(format!("Skip backward {skip_secs}s"))
                .clicked()
            {
                picked = Some(Action::SkipBackward);
            }

            let play_pause_text = if shell.session().playing { "⏸" } else { "▶" };
            if ui
                .add_enabled(shell.play_enabled(), Button::new(play_pause_text))
                .on_hover_text("Play\nIf nothing is loaded, open a file first")
                .clicked()
            {
                picked = Some(Action::PlayPause);
            }

            if ui
                .button("⏭")
                .on_hover_text(format!("Skip forward {skip_secs}s"))
                .clicked()
            {
                picked = Some(Action::SkipForward);
            }

            if ui.button("⏹").on_hover_text("Stop playback").clicked() {
                picked = Some(Action::Stop);
            }

            ui.separator();

            let mute_text = if shell.session().muted { "🔇" } else { "🔊" };
            if ui.button(mute_text).on_hover_text("Toggle mute").clicked() {
                picked = Some(Action::ToggleMute);
            }

            let mut volume = f32::from(shell.session().volume);
            ui.spacing_mut().slider_width = 100.0;
            if ui
                .add(Slider::new(&mut volume, 0.0..=100.0).show_value(false))
                .changed()
            {
                shell.set_volume(volume);
            }

            ui.separator();

            if ui.button("⛶").on_hover_text("Toggle fullscreen").clicked() {
                picked = Some(Action::ToggleFullscreen);
            }
        });

        picked
    }

    /// One-line status bar under the controls.
    pub fn status_line(ui: &mut Ui, text: &str) {
        ui.horizontal(|ui| {
            ui.label(text);
        });
    }
}
