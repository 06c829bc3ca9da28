use rodio::Source;
use std::sync::Arc;
use std::time::Duration;

use super::circular_buffer::SampleRing;
use super::clock::AudioClock;

/// Samples consumed between clock updates.
const CLOCK_BATCH: u64 = 256;

/// Endless rodio source fed by the decoder through a [`SampleRing`].
/// Underruns play silence; every consumed sample advances the clock.
pub struct AudioSource {
    ring: Arc<SampleRing>,
    clock: AudioClock,
    pending: u64,
}

impl AudioSource {
    pub fn new(ring: Arc<SampleRing>, clock: AudioClock) -> Self {
        Self {
            ring,
            clock,
            pending: 0,
        }
    }
}

impl Iterator for AudioSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.clock.should_clear_buffer() {
            self.ring.clear();
            self.pending = 0;
            return Some(0.0);
        }

        let Some(sample) = self.ring.try_pop() else {
            return Some(0.0);
        };
        self.pending += 1;
        if self.pending == CLOCK_BATCH {
            self.clock.advance_samples(CLOCK_BATCH);
            self.pending = 0;
        }
        Some(sample)
    }
}

impl Source for AudioSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.clock.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.clock.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
