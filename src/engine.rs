use std::path::Path;

/// Engine playback state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Notifications delivered by the engine, drained on the UI thread.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    PositionChanged(u64),
    DurationChanged(u64),
    StateChanged(PlaybackState),
    ErrorOccurred(String),
}

/// Operations the player shell needs from a multimedia engine.
///
/// Times are in milliseconds. Failures are never returned from these calls;
/// they arrive later as [`EngineEvent::ErrorOccurred`].
pub trait MediaEngine {
    fn set_source(&mut self, path: &Path);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn playback_state(&self) -> PlaybackState;
    fn set_position_ms(&mut self, position: u64);
    /// Linear volume, 0.0 to 1.0.
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    fn set_playback_rate(&mut self, rate: f32);
    /// Take all notifications queued since the last call.
    fn poll_events(&mut self) -> Vec<EngineEvent>;
}
