use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Audio master clock for A/V sync.
///
/// Advances by the number of samples the output device has pulled, so a sink
/// speed change moves the clock at the same rate as the audio.
#[derive(Clone)]
pub struct AudioClock {
    position_us: Arc<AtomicU64>,
    paused: Arc<AtomicBool>,
    /// Set on seek; the audio source drops buffered samples when it sees it.
    clear_buffer: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
}

impl AudioClock {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            position_us: Arc::new(AtomicU64::new(0)),
            paused: Arc::new(AtomicBool::new(true)),
            clear_buffer: Arc::new(AtomicBool::new(false)),
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
        }
    }

    /// Playback position in seconds
    pub fn position(&self) -> f64 {
        self.position_us.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }

    /// Jump to `seconds` and request an audio buffer flush.
    pub fn set_position(&self, seconds: f64) {
        let us = (seconds.max(0.0) * 1_000_000.0) as u64;
        self.position_us.store(us, Ordering::Relaxed);
        self.clear_buffer.store(true, Ordering::Relaxed);
    }

    /// Returns true once per `set_position`.
    pub fn should_clear_buffer(&self) -> bool {
        self.clear_buffer.swap(false, Ordering::Relaxed)
    }

    /// Interleaved samples consumed by the device. Ignored while paused.
    pub fn advance_samples(&self, samples: u64) {
        if !self.paused.load(Ordering::Relaxed) {
            let us_per_sample = 1_000_000.0 / (self.sample_rate as f64 * self.channels as f64);
            let delta_us = (samples as f64 * us_per_sample) as u64;
            self.position_us.fetch_add(delta_us, Ordering::Relaxed);
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(clock: &AudioClock) -> u64 {
        (clock.position() * 1000.0).round() as u64
    }

    #[test]
    fn paused_clock_does_not_advance() {
        let clock = AudioClock::new(48_000, 2);
        clock.advance_samples(96_000);
        assert_eq!(ms(&clock), 0);
    }

    #[test]
    fn one_second_of_stereo_samples() {
        let clock = AudioClock::new(48_000, 2);
        clock.resume();
        clock.advance_samples(96_000);
        assert_eq!(ms(&clock), 1000);
    }

    #[test]
    fn seek_requests_single_flush() {
        let clock = AudioClock::new(44_100, 2);
        clock.set_position(12.5);
        assert_eq!(ms(&clock), 12_500);
        assert!(clock.should_clear_buffer());
        assert!(!clock.should_clear_buffer());
    }

    #[test]
    fn clones_share_position() {
        let clock = AudioClock::new(44_100, 1);
        let other = clock.clone();
        other.set_position(3.0);
        assert_eq!(ms(&clock), 3000);
    }
}
