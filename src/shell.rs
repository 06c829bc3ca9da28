//! Player shell: binds user actions to the media engine and reflects engine
//! notifications back into UI state.
//!
//! Everything here runs on the UI thread. Handlers that arm or check the
//! fullscreen auto-hide timer take the current `Instant` so tests can drive
//! time explicitly.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::config::PlayerConfig;
use crate::engine::{EngineEvent, MediaEngine, PlaybackState};
use crate::error::PlayerError;
use crate::recent::RecentFiles;
use crate::settings::SettingsStore;
use crate::ui::format::{display_name, format_time};

const MAX_VOLUME: u8 = 100;

/// A user request, from a shortcut, menu entry or button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    OpenDialog,
    OpenRecent(usize),
    Quit,
    PlayPause,
    Stop,
    SkipBackward,
    SkipForward,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    SetSpeed(f32),
    ToggleFullscreen,
    ExitFullscreen,
    ToggleDisplayMode,
    SetStatusVisible(bool),
}

/// Transient playback state, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub source: Option<PathBuf>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub playback_rate: f32,
    /// Percent, 0 to 100.
    pub volume: u8,
    pub muted: bool,
    pub fullscreen: bool,
    pub playing: bool,
}

impl SessionState {
    fn new(volume: u8) -> Self {
        Self {
            source: None,
            position_ms: 0,
            duration_ms: 0,
            playback_rate: 1.0,
            volume: volume.min(MAX_VOLUME),
            muted: false,
            fullscreen: false,
            playing: false,
        }
    }
}

/// On-screen controls, menu and status line visibility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chrome {
    pub visible: bool,
    hide_at: Option<Instant>,
}

/// Status line. `current` is the sticky message restored when the line is
/// re-shown; transient errors only replace `shown`.
#[derive(Clone, Debug)]
struct StatusLine {
    current: String,
    shown: String,
    enabled: bool,
}

impl StatusLine {
    fn new() -> Self {
        Self {
            current: "Ready".to_string(),
            shown: "Ready".to_string(),
            enabled: true,
        }
    }

    fn set_current(&mut self, message: String) {
        self.shown = message.clone();
        self.current = message;
    }

    fn flash(&mut self, message: String) {
        self.shown = message;
    }
}

pub struct PlayerShell<E, S> {
    engine: E,
    recent: RecentFiles<S>,
    config: PlayerConfig,
    session: SessionState,
    chrome: Chrome,
    status: StatusLine,
    play_enabled: bool,
    time_label: String,
}

impl<E: MediaEngine, S: SettingsStore> PlayerShell<E, S> {
    pub fn new(mut engine: E, recent: RecentFiles<S>, config: PlayerConfig) -> Self {
        let session = SessionState::new(config.initial_volume);
        engine.set_volume(f32::from(session.volume) / 100.0);

        Self {
            engine,
            recent,
            config,
            session,
            chrome: Chrome {
                visible: true,
                hide_at: None,
            },
            status: StatusLine::new(),
            play_enabled: false,
            time_label: format!("{} / {}", format_time(0), format_time(0)),
        }
    }

    /// Run a shell action. `OpenDialog`, `Quit` and `ToggleDisplayMode` need
    /// the window and are handled by the app.
    pub fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::OpenRecent(rank) => {
                if let Err(e) = self.open_recent(rank) {
                    debug!(error = %e, "Open recent failed");
                }
            }
            Action::PlayPause => self.play_pause(),
            Action::Stop => self.stop(),
            Action::SkipBackward => self.skip_backward(self.config.skip_ms),
            Action::SkipForward => self.skip_forward(self.config.skip_ms),
            Action::VolumeUp => self.increase_volume(self.config.volume_step),
            Action::VolumeDown => self.decrease_volume(self.config.volume_step),
            Action::ToggleMute => self.toggle_mute(),
            Action::SetSpeed(rate) => self.set_playback_rate(rate),
            Action::ToggleFullscreen => self.toggle_fullscreen(now),
            Action::ExitFullscreen => self.exit_fullscreen(),
            Action::SetStatusVisible(visible) => self.set_status_visible(visible),
            Action::OpenDialog | Action::Quit | Action::ToggleDisplayMode => {
                debug!(?action, "Action handled by the window");
            }
        }
    }

    /// Open `path`, or post an error status and leave the engine alone if it
    /// does not exist.
    pub fn open(&mut self, path: &Path) -> Result<(), PlayerError> {
        if !path.exists() {
            self.status
                .flash(format!("Error: File {} not found", path.display()));
            info!(path = %path.display(), "Refusing to open missing file");
            return Err(PlayerError::FileNotFound(path.to_path_buf()));
        }

        info!(path = %path.display(), "Opening media");
        self.engine.set_source(path);
        self.session.source = Some(path.to_path_buf());
        self.session.position_ms = 0;
        self.session.duration_ms = 0;
        self.session.playing = false;
        self.play_enabled = true;

        let path_str = path.to_string_lossy();
        self.status
            .set_current(format!("Playing: {}", display_name(&path_str)));
        self.recent.add(&path_str);

        self.play_pause();
        Ok(())
    }

    /// Open the recent file at `rank` (0 = most recent).
    pub fn open_recent(&mut self, rank: usize) -> Result<(), PlayerError> {
        let path = self
            .recent
            .get(rank)
            .map(PathBuf::from)
            .ok_or(PlayerError::NoRecentFile(rank))?;
        self.open(&path)
    }

    pub fn play_pause(&mut self) {
        if self.session.source.is_none() {
            debug!("Play/pause ignored, nothing loaded");
            return;
        }
        if self.engine.playback_state() == PlaybackState::Playing {
            self.engine.pause();
            self.session.playing = false;
        } else {
            self.engine.play();
            self.session.playing = true;
        }
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.session.playing = false;
    }

    pub fn skip_backward(&mut self, ms: u64) {
        self.seek(self.session.position_ms.saturating_sub(ms));
    }

    pub fn skip_forward(&mut self, ms: u64) {
        self.seek(self.session.position_ms.saturating_add(ms));
    }

    /// Scrubber drag or skip. Clamped to `[0, duration]`.
    pub fn seek(&mut self, position_ms: u64) {
        let position = position_ms.min(self.session.duration_ms);
        self.engine.set_position_ms(position);
        self.session.position_ms = position;
        self.refresh_time_label();
    }

    /// Volume slider. Fractional percents round half-up before clamping.
    pub fn set_volume(&mut self, percent: f32) {
        let volume = percent
            .round()
            .clamp(0.0, f32::from(MAX_VOLUME)) as u8;
        self.session.volume = volume;
        self.engine.set_volume(f32::from(volume) / 100.0);
    }

    pub fn increase_volume(&mut self, step: u8) {
        let volume = self.session.volume.saturating_add(step).min(MAX_VOLUME);
        self.set_volume(f32::from(volume));
    }

    pub fn decrease_volume(&mut self, step: u8) {
        let volume = self.session.volume.saturating_sub(step);
        self.set_volume(f32::from(volume));
    }

    pub fn toggle_mute(&mut self) {
        self.session.muted = !self.session.muted;
        self.engine.set_muted(self.session.muted);
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        self.session.playback_rate = rate;
        self.engine.set_playback_rate(rate);
    }

    pub fn toggle_fullscreen(&mut self, now: Instant) {
        if self.session.fullscreen {
            self.exit_fullscreen();
        } else {
            self.session.fullscreen = true;
            self.chrome.hide_at = Some(now + self.hide_delay());
        }
    }

    pub fn exit_fullscreen(&mut self) {
        self.session.fullscreen = false;
        self.chrome.visible = true;
        self.chrome.hide_at = None;
    }

    /// Pointer activity. In fullscreen, shows chrome and restarts the timer.
    pub fn pointer_moved(&mut self, now: Instant) {
        if self.session.fullscreen {
            self.chrome.visible = true;
            self.chrome.hide_at = Some(now + self.hide_delay());
        }
    }

    /// Hide chrome once the fullscreen idle deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.chrome.hide_at {
            if self.session.fullscreen && now >= deadline {
                self.chrome.visible = false;
                self.chrome.hide_at = None;
            }
        }
    }

    /// When `tick` next has something to do, if ever.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.chrome.hide_at
    }

    /// Status-line checkbox. Re-showing restores the last sticky message.
    pub fn set_status_visible(&mut self, visible: bool) {
        self.status.enabled = visible;
        if visible {
            self.status.shown = self.status.current.clone();
        }
    }

    /// Drain and apply all queued engine notifications.
    pub fn pump_engine_events(&mut self) {
        for event in self.engine.poll_events() {
            self.handle_engine_event(event);
        }
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::PositionChanged(position) => {
                self.session.position_ms = position;
                self.refresh_time_label();
            }
            EngineEvent::DurationChanged(duration) => {
                self.session.duration_ms = duration;
                self.session.position_ms = self.session.position_ms.min(duration);
            }
            EngineEvent::StateChanged(state) => {
                self.session.playing = state == PlaybackState::Playing;
            }
            EngineEvent::ErrorOccurred(message) => {
                error!(%message, "Engine error");
                self.play_enabled = false;
                self.session.playing = false;
                self.status.flash(format!("Error: {message}"));
            }
        }
    }

    fn refresh_time_label(&mut self) {
        if self.session.duration_ms > 0 {
            self.time_label = format!(
                "{} / {}",
                format_time(self.session.position_ms),
                format_time(self.session.duration_ms)
            );
        }
    }

    fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.config.hide_controls_ms)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn chrome(&self) -> Chrome {
        self.chrome
    }

    /// Text for the status line, `None` while it is switched off or hidden.
    pub fn status_text(&self) -> Option<&str> {
        (self.status.enabled && self.chrome.visible).then_some(self.status.shown.as_str())
    }

    pub fn status_enabled(&self) -> bool {
        self.status.enabled
    }

    pub fn play_enabled(&self) -> bool {
        self.play_enabled
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    pub fn recent(&self) -> &RecentFiles<S> {
        &self.recent
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryStore;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetSource(PathBuf),
        Play,
        Pause,
        Stop,
        SetPosition(u64),
        SetVolume(f32),
        SetMuted(bool),
        SetRate(f32),
    }

    #[derive(Default)]
    struct FakeEngine {
        calls: Vec<Call>,
        queued: Vec<EngineEvent>,
        state: PlaybackState,
    }

    impl FakeEngine {
        fn sources(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::SetSource(_)))
                .count()
        }

        fn last(&self) -> Option<&Call> {
            self.calls.last()
        }
    }

    impl MediaEngine for FakeEngine {
        fn set_source(&mut self, path: &Path) {
            self.calls.push(Call::SetSource(path.to_path_buf()));
        }
        fn play(&mut self) {
            self.calls.push(Call::Play);
            self.state = PlaybackState::Playing;
        }
        fn pause(&mut self) {
            self.calls.push(Call::Pause);
            self.state = PlaybackState::Paused;
        }
        fn stop(&mut self) {
            self.calls.push(Call::Stop);
            self.state = PlaybackState::Stopped;
        }
        fn playback_state(&self) -> PlaybackState {
            self.state
        }
        fn set_position_ms(&mut self, position: u64) {
            self.calls.push(Call::SetPosition(position));
        }
        fn set_volume(&mut self, volume: f32) {
            self.calls.push(Call::SetVolume(volume));
        }
        fn set_muted(&mut self, muted: bool) {
            self.calls.push(Call::SetMuted(muted));
        }
        fn set_playback_rate(&mut self, rate: f32) {
            self.calls.push(Call::SetRate(rate));
        }
        fn poll_events(&mut self) -> Vec<EngineEvent> {
            std::mem::take(&mut self.queued)
        }
    }

    fn shell() -> (PlayerShell<FakeEngine, MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        let recent = RecentFiles::load(store.clone());
        let shell = PlayerShell::new(FakeEngine::default(), recent, PlayerConfig::default());
        (shell, store)
    }

    fn media_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"not really a video").expect("write");
        path
    }

    fn loaded_shell(duration: u64) -> (PlayerShell<FakeEngine, MemoryStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut shell, _) = shell();
        shell.open(&media_file(&dir, "clip.mp4")).expect("open");
        shell.handle_engine_event(EngineEvent::DurationChanged(duration));
        (shell, dir)
    }

    #[test]
    fn new_shell_applies_initial_volume() {
        let (shell, _) = shell();
        assert_eq!(shell.engine().calls, vec![Call::SetVolume(1.0)]);
        assert_eq!(shell.session().volume, 100);
        assert_eq!(shell.status_text(), Some("Ready"));
        assert_eq!(shell.time_label(), "0:00 / 0:00");
    }

    #[test]
    fn open_existing_file_plays_and_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = media_file(&dir, "movie.mkv");
        let (mut shell, store) = shell();

        shell.open(&path).expect("open");

        assert_eq!(shell.engine().calls[1], Call::SetSource(path.clone()));
        assert_eq!(shell.engine().last(), Some(&Call::Play));
        assert!(shell.session().playing);
        assert!(shell.play_enabled());
        assert_eq!(shell.status_text(), Some("Playing: movie.mkv"));
        assert_eq!(shell.recent().get(0), Some(path.to_string_lossy().as_ref()));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn open_missing_file_leaves_engine_untouched() {
        let (mut shell, store) = shell();
        let calls_before = shell.engine().calls.clone();

        let result = shell.open(Path::new("/no/such/video.mp4"));

        assert!(matches!(result, Err(PlayerError::FileNotFound(_))));
        assert_eq!(shell.engine().calls, calls_before);
        assert!(shell.session().source.is_none());
        let status = shell.status_text().expect("status visible");
        assert!(status.contains("/no/such/video.mp4"));
        assert!(status.starts_with("Error:"));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn open_missing_file_keeps_current_source() {
        let (mut shell, dir) = loaded_shell(10_000);
        let source = shell.session().source.clone();

        let _ = shell.open(&dir.path().join("gone.mp4"));

        assert_eq!(shell.session().source, source);
        assert_eq!(shell.engine().sources(), 1);
    }

    #[test]
    fn open_recent_uses_rank() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = media_file(&dir, "a.mp4");
        let b = media_file(&dir, "b.mp4");
        let (mut shell, _) = shell();
        shell.open(&a).expect("open a");
        shell.open(&b).expect("open b");

        shell.apply(Action::OpenRecent(1), Instant::now());

        assert_eq!(shell.session().source.as_deref(), Some(a.as_path()));
        assert_eq!(shell.recent().get(0), Some(a.to_string_lossy().as_ref()));
    }

    #[test]
    fn open_recent_out_of_range_is_an_error() {
        let (mut shell, _) = shell();
        assert!(matches!(shell.open_recent(3), Err(PlayerError::NoRecentFile(3))));
        assert_eq!(shell.engine().sources(), 0);
    }

    #[test]
    fn recent_shortcut_past_end_is_ignored() {
        let (mut shell, _) = shell();
        let status = shell.status_text().map(str::to_string);
        shell.apply(Action::OpenRecent(4), Instant::now());
        assert_eq!(shell.engine().sources(), 0);
        assert_eq!(shell.status_text().map(str::to_string), status);
        assert!(shell.session().source.is_none());
    }

    #[test]
    fn play_pause_toggles() {
        let (mut shell, _dir) = loaded_shell(10_000);
        assert!(shell.session().playing);

        shell.play_pause();
        assert!(!shell.session().playing);
        assert_eq!(shell.engine().last(), Some(&Call::Pause));

        shell.play_pause();
        assert!(shell.session().playing);
        assert_eq!(shell.engine().last(), Some(&Call::Play));
    }

    #[test]
    fn play_pause_follows_engine_state() {
        let (mut shell, _dir) = loaded_shell(10_000);
        // Playback ended in the engine; the notification is still queued.
        shell.engine_mut().state = PlaybackState::Stopped;
        assert!(shell.session().playing);

        shell.play_pause();
        assert_eq!(shell.engine().last(), Some(&Call::Play));
        assert!(shell.session().playing);
    }

    #[test]
    fn play_pause_without_media_does_nothing() {
        let (mut shell, _) = shell();
        shell.play_pause();
        assert!(!shell.session().playing);
        assert_eq!(shell.engine().calls.len(), 1);
    }

    #[test]
    fn stop_resets_to_play_icon() {
        let (mut shell, _dir) = loaded_shell(10_000);
        shell.stop();
        assert!(!shell.session().playing);
        assert_eq!(shell.engine().last(), Some(&Call::Stop));
    }

    #[test]
    fn skip_backward_clamps_at_zero() {
        let (mut shell, _dir) = loaded_shell(60_000);
        shell.handle_engine_event(EngineEvent::PositionChanged(2000));

        shell.skip_backward(5000);

        assert_eq!(shell.engine().last(), Some(&Call::SetPosition(0)));
        assert_eq!(shell.session().position_ms, 0);
    }

    #[test]
    fn skip_forward_clamps_at_duration() {
        let (mut shell, _dir) = loaded_shell(60_000);
        shell.handle_engine_event(EngineEvent::PositionChanged(58_000));

        shell.apply(Action::SkipForward, Instant::now());

        assert_eq!(shell.engine().last(), Some(&Call::SetPosition(60_000)));
    }

    #[test]
    fn skip_forward_moves_by_configured_step() {
        let (mut shell, _dir) = loaded_shell(60_000);
        shell.handle_engine_event(EngineEvent::PositionChanged(10_000));
        shell.apply(Action::SkipForward, Instant::now());
        assert_eq!(shell.engine().last(), Some(&Call::SetPosition(15_000)));
    }

    #[test]
    fn volume_up_clamps_at_hundred() {
        let (mut shell, _) = shell();
        shell.set_volume(98.0);
        shell.increase_volume(5);
        assert_eq!(shell.session().volume, 100);
        assert_eq!(shell.engine().last(), Some(&Call::SetVolume(1.0)));
    }

    #[test]
    fn volume_down_clamps_at_zero() {
        let (mut shell, _) = shell();
        shell.set_volume(3.0);
        shell.apply(Action::VolumeDown, Instant::now());
        assert_eq!(shell.session().volume, 0);
        assert_eq!(shell.engine().last(), Some(&Call::SetVolume(0.0)));
    }

    #[test]
    fn slider_volume_rounds_half_up() {
        let (mut shell, _) = shell();
        shell.set_volume(42.5);
        assert_eq!(shell.session().volume, 43);
        shell.set_volume(42.4);
        assert_eq!(shell.session().volume, 42);
        shell.set_volume(140.0);
        assert_eq!(shell.session().volume, 100);
        shell.set_volume(-3.0);
        assert_eq!(shell.session().volume, 0);
    }

    #[test]
    fn mute_toggles_engine_flag() {
        let (mut shell, _) = shell();
        shell.toggle_mute();
        assert!(shell.session().muted);
        assert_eq!(shell.engine().last(), Some(&Call::SetMuted(true)));
        shell.apply(Action::ToggleMute, Instant::now());
        assert!(!shell.session().muted);
        assert_eq!(shell.engine().last(), Some(&Call::SetMuted(false)));
    }

    #[test]
    fn speed_selection_sets_rate() {
        let (mut shell, _) = shell();
        shell.apply(Action::SetSpeed(1.5), Instant::now());
        assert_eq!(shell.session().playback_rate, 1.5);
        assert_eq!(shell.engine().last(), Some(&Call::SetRate(1.5)));
    }

    #[test]
    fn fullscreen_hides_chrome_after_idle_delay() {
        let (mut shell, _) = shell();
        let start = Instant::now();
        shell.toggle_fullscreen(start);
        assert!(shell.session().fullscreen);

        shell.tick(start + Duration::from_millis(2999));
        assert!(shell.chrome().visible);

        shell.tick(start + Duration::from_millis(3000));
        assert!(!shell.chrome().visible);
        assert_eq!(shell.status_text(), None);
        assert_eq!(shell.next_deadline(), None);
    }

    #[test]
    fn pointer_movement_rearms_timer() {
        let (mut shell, _) = shell();
        let start = Instant::now();
        shell.toggle_fullscreen(start);
        shell.tick(start + Duration::from_secs(4));
        assert!(!shell.chrome().visible);

        let moved = start + Duration::from_secs(5);
        shell.pointer_moved(moved);
        assert!(shell.chrome().visible);

        shell.tick(moved + Duration::from_millis(2000));
        assert!(shell.chrome().visible);
        shell.tick(moved + Duration::from_millis(3000));
        assert!(!shell.chrome().visible);
    }

    #[test]
    fn pointer_movement_windowed_arms_nothing() {
        let (mut shell, _) = shell();
        shell.pointer_moved(Instant::now());
        assert_eq!(shell.next_deadline(), None);
    }

    #[test]
    fn exiting_fullscreen_shows_chrome_immediately() {
        let (mut shell, _) = shell();
        let start = Instant::now();
        shell.toggle_fullscreen(start);
        shell.tick(start + Duration::from_secs(10));
        assert!(!shell.chrome().visible);

        shell.apply(Action::ExitFullscreen, start);
        assert!(!shell.session().fullscreen);
        assert!(shell.chrome().visible);

        // A stale deadline must not hide chrome once windowed.
        shell.tick(start + Duration::from_secs(20));
        assert!(shell.chrome().visible);
    }

    #[test]
    fn toggle_fullscreen_twice_exits() {
        let (mut shell, _) = shell();
        let now = Instant::now();
        shell.toggle_fullscreen(now);
        shell.toggle_fullscreen(now);
        assert!(!shell.session().fullscreen);
        assert!(shell.chrome().visible);
    }

    #[test]
    fn position_event_updates_label_once_duration_known() {
        let (mut shell, _) = shell();
        shell.handle_engine_event(EngineEvent::PositionChanged(5000));
        assert_eq!(shell.time_label(), "0:00 / 0:00");

        shell.handle_engine_event(EngineEvent::DurationChanged(3_700_000));
        shell.handle_engine_event(EngineEvent::PositionChanged(65_000));
        assert_eq!(shell.time_label(), "1:05 / 1:01:40");
        assert_eq!(shell.session().position_ms, 65_000);
    }

    #[test]
    fn engine_error_disables_play_and_shows_text() {
        let (mut shell, _dir) = loaded_shell(10_000);
        shell
            .engine_mut()
            .queued
            .push(EngineEvent::ErrorOccurred("Unsupported codec".to_string()));

        shell.pump_engine_events();

        assert!(!shell.play_enabled());
        assert!(!shell.session().playing);
        assert_eq!(shell.status_text(), Some("Error: Unsupported codec"));
    }

    #[test]
    fn end_of_stream_state_resets_playing() {
        let (mut shell, _dir) = loaded_shell(10_000);
        shell.handle_engine_event(EngineEvent::StateChanged(PlaybackState::Stopped));
        assert!(!shell.session().playing);
    }

    #[test]
    fn status_line_restores_last_message() {
        let (mut shell, _dir) = loaded_shell(10_000);
        shell.handle_engine_event(EngineEvent::ErrorOccurred("boom".to_string()));

        shell.apply(Action::SetStatusVisible(false), Instant::now());
        assert_eq!(shell.status_text(), None);
        assert!(!shell.status_enabled());

        shell.set_status_visible(true);
        assert_eq!(shell.status_text(), Some("Playing: clip.mp4"));
    }
}
