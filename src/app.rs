use egui::{CentralPanel, Color32, Frame, ScrollArea, TopBottomPanel, Vec2};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::player::{DisplayMode, FfmpegEngine};
use crate::recent::RecentFiles;
use crate::settings::{JsonFileStore, MemoryStore, SettingsStore};
use crate::shell::{Action, PlayerShell};
use crate::ui::controls::PlayerControls;
use crate::ui::menu::MenuBar;
use crate::ui::shortcuts::pressed_actions;

pub const WINDOW_TITLE: &str = "Media Player";

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mkv", "mov"];

type Shell = PlayerShell<FfmpegEngine, Box<dyn SettingsStore>>;

pub struct PlayerApp {
    shell: Shell,
    /// Fullscreen state last sent to the window
    window_fullscreen: bool,
}

impl PlayerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: PlayerConfig,
        initial: Option<PathBuf>,
    ) -> Self {
        let store: Box<dyn SettingsStore> = match JsonFileStore::open_default() {
            Ok(store) => {
                debug!(path = %store.path().display(), "Using settings file");
                Box::new(store)
            }
            Err(e) => {
                warn!(error = %e, "Recent files will not be saved");
                Box::new(MemoryStore::new())
            }
        };

        let engine = FfmpegEngine::new(cc.egui_ctx.clone());
        let mut shell = PlayerShell::new(engine, RecentFiles::load(store), config);

        if let Some(path) = initial {
            Self::open_path(&mut shell, &path);
        }

        Self {
            shell,
            window_fullscreen: false,
        }
    }

    fn open_path(shell: &mut Shell, path: &Path) {
        if let Err(e) = shell.open(path) {
            info!(error = %e, "Open failed");
        }
    }

    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Open video")
            .add_filter("Video files", &VIDEO_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file()
        {
            Self::open_path(&mut self.shell, &path);
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, action: Action, now: Instant) {
        match action {
            Action::OpenDialog => self.open_dialog(),
            Action::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Action::ToggleDisplayMode => self.shell.engine_mut().toggle_display_mode(),
            other => self.shell.apply(other, now),
        }
    }

    fn sync_window(&mut self, ctx: &egui::Context) {
        let fullscreen = self.shell.session().fullscreen;
        if fullscreen != self.window_fullscreen {
            self.window_fullscreen = fullscreen;
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen));
        }
    }

    fn show_video(&self, ui: &mut egui::Ui) -> bool {
        let engine = self.shell.engine();
        let (Some(texture), Some(video_size)) = (engine.texture(), engine.video_size()) else {
            ui.centered_and_justified(|ui| {
                ui.heading("No video loaded\nOpen a file with Ctrl+O or drop one here");
            });
            return false;
        };
        let tex_id = texture.id();
        let mut should_toggle = false;

        match engine.display_mode() {
            DisplayMode::FitToWindow => {
                let available_size = ui.available_size();
                let aspect = video_size.0 as f32 / video_size.1.max(1) as f32;
                let available_aspect = available_size.x / available_size.y.max(1.0);

                let display_size = if aspect > available_aspect {
                    Vec2::new(available_size.x, available_size.x / aspect)
                } else {
                    Vec2::new(available_size.y * aspect, available_size.y)
                };

                ui.centered_and_justified(|ui| {
                    if ui.image((tex_id, display_size)).double_clicked() {
                        should_toggle = true;
                    }
                });
            }
            DisplayMode::NativeSize => {
                ScrollArea::both().show(ui, |ui| {
                    let size = Vec2::new(video_size.0 as f32, video_size.1 as f32);
                    if ui.image((tex_id, size)).double_clicked() {
                        should_toggle = true;
                    }
                });
            }
        }

        should_toggle
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.shell.engine_mut().update();
        self.shell.pump_engine_events();

        let (dropped, pointer_moved) = ctx.input(|i| {
            (
                i.raw.dropped_files.first().and_then(|f| f.path.clone()),
                i.pointer.delta() != Vec2::ZERO,
            )
        });
        if let Some(path) = dropped {
            Self::open_path(&mut self.shell, &path);
        }
        if pointer_moved {
            self.shell.pointer_moved(now);
        }

        for action in pressed_actions(ctx) {
            self.dispatch(ctx, action, now);
        }

        self.shell.tick(now);

        let mut actions = Vec::new();
        if self.shell.chrome().visible {
            TopBottomPanel::top("menu_bar").show(ctx, |ui| {
                actions.extend(MenuBar::show(ui, &self.shell));
            });

            if let Some(status) = self.shell.status_text() {
                let status = status.to_string();
                TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                    PlayerControls::status_line(ui, &status);
                });
            }

            TopBottomPanel::bottom("controls").show(ctx, |ui| {
                actions.extend(PlayerControls::show(ui, &mut self.shell));
            });
        }

        let mut toggle_display = false;
        CentralPanel::default()
            .frame(Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                toggle_display = self.show_video(ui);
            });
        if toggle_display {
            actions.push(Action::ToggleDisplayMode);
        }

        for action in actions {
            self.dispatch(ctx, action, now);
        }

        self.sync_window(ctx);

        if let Some(deadline) = self.shell.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}
