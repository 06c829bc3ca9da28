pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod player;
pub mod recent;
pub mod settings;
pub mod shell;
pub mod ui;

pub use app::PlayerApp;
pub use engine::{EngineEvent, MediaEngine, PlaybackState};
pub use player::{DisplayMode, FfmpegEngine};
pub use recent::RecentFiles;
pub use shell::{Action, PlayerShell};
pub use ui::controls::PlayerControls;
