use egui::{Button, Ui};

use crate::config::PLAYBACK_SPEEDS;
use crate::engine::MediaEngine;
use crate::settings::SettingsStore;
use crate::shell::{Action, PlayerShell};
use crate::ui::format::display_name;
use crate::ui::shortcuts::recent_shortcut_text;

pub struct MenuBar;

impl MenuBar {
    /// Draw the menu bar. Returns the entry the user picked this frame.
    pub fn show<E: MediaEngine, S: SettingsStore>(
        ui: &mut Ui,
        shell: &PlayerShell<E, S>,
    ) -> Option<Action> {
        let mut picked = None;

        egui::menu::bar(ui, |ui| {
            ui.menu_button("Media", |ui| {
                ui.set_min_width(200.0);
                if ui
                    .add(Button::new("📂 Open file...").shortcut_text("Ctrl+O"))
                    .clicked()
                {
                    picked = Some(Action::OpenDialog);
                    ui.close_menu();
                }

                ui.separator();

                ui.menu_button("Open Recent Files", |ui| {
                    if shell.recent().is_empty() {
                        ui.label("No recent files");
                    }
                    for (rank, path) in shell.recent().list().iter().enumerate() {
                        let mut button = Button::new(display_name(path));
                        if let Some(shortcut) = recent_shortcut_text(rank) {
                            button = button.shortcut_text(shortcut);
                        }
                        if ui.add(button).on_hover_text(path).clicked() {
                            picked = Some(Action::OpenRecent(rank));
                            ui.close_menu();
                        }
                    }
                });

                ui.separator();

                if ui.add(Button::new("Quit").shortcut_text("Ctrl+Q")).clicked() {
                    picked = Some(Action::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button("Playback", |ui| {
                ui.set_min_width(200.0);
                ui.menu_button("Speed", |ui| {
                    let current = shell.session().playback_rate;
                    for speed in PLAYBACK_SPEEDS {
                        if ui
                            .radio(current == speed, format!("{speed}x"))
                            .clicked()
                        {
                            picked = Some(Action::SetSpeed(speed));
                            ui.close_menu();
                        }
                    }
                });

                ui.separator();

                let entries = [
                    ("▶ Play", "Space", Action::PlayPause),
                    ("⏹ Stop", "", Action::Stop),
                    ("⏪ Skip backward", "Left", Action::SkipBackward),
                    ("⏩ Skip forward", "Right", Action::SkipForward),
                ];
                for (label, shortcut, action) in entries {
                    if ui.add(Button::new(label).shortcut_text(shortcut)).clicked() {
                        picked = Some(action);
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("Audio", |ui| {
                ui.set_min_width(200.0);
                let entries = [
                    ("🔊 Increase Volume", "Up", Action::VolumeUp),
                    ("🔉 Decrease Volume", "Down", Action::VolumeDown),
                    ("🔇 Mute", "M", Action::ToggleMute),
                ];
                for (label, shortcut, action) in entries {
                    if ui.add(Button::new(label).shortcut_text(shortcut)).clicked() {
                        picked = Some(action);
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("Video", |ui| {
                ui.set_min_width(200.0);
                if ui
                    .add(Button::new("⛶ Fullscreen").shortcut_text("F"))
                    .clicked()
                {
                    picked = Some(Action::ToggleFullscreen);
                    ui.close_menu();
                }
                if ui
                    .button("⊞ Native size")
                    .on_hover_text("Toggle display mode (double-click video)")
                    .clicked()
                {
                    picked = Some(Action::ToggleDisplayMode);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                ui.set_min_width(200.0);
                let mut visible = shell.status_enabled();
                if ui.checkbox(&mut visible, "Show Statusbar").changed() {
                    picked = Some(Action::SetStatusVisible(visible));
                }
            });
        });

        picked
    }
}
