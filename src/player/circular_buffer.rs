use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Interleaved f32 samples shared between the decoder thread (writer) and the
/// audio output thread (reader). When full, the oldest samples are dropped so
/// the decoder never blocks on the device.
pub struct SampleRing {
    inner: Mutex<VecDeque<f32>>,
    capacity: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Arc<Self> {
        let capacity = capacity.max(1);
        Arc::new(Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        })
    }

    /// Ring holding `seconds` of audio at the given format.
    pub fn for_duration(sample_rate: u32, channels: u16, seconds: usize) -> Arc<Self> {
        Self::new(sample_rate as usize * channels as usize * seconds)
    }

    pub fn push_slice(&self, samples: &[f32]) {
        let mut buf = self.inner.lock();
        // Only the newest `capacity` samples can survive.
        let skip = samples.len().saturating_sub(self.capacity);
        let incoming = &samples[skip..];
        let overflow = (buf.len() + incoming.len()).saturating_sub(self.capacity);
        buf.drain(..overflow.min(buf.len()));
        buf.extend(incoming.iter().copied());
    }

    pub fn try_pop(&self) -> Option<f32> {
        self.inner.lock().pop_front()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_push_order() {
        let ring = SampleRing::new(8);
        ring.push_slice(&[0.1, 0.2, 0.3]);
        assert_eq!(ring.try_pop(), Some(0.1));
        assert_eq!(ring.try_pop(), Some(0.2));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn overflow_drops_oldest() {
        let ring = SampleRing::new(4);
        ring.push_slice(&[1.0, 2.0, 3.0]);
        ring.push_slice(&[4.0, 5.0]);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.try_pop(), Some(2.0));
    }

    #[test]
    fn oversized_push_keeps_tail() {
        let ring = SampleRing::new(2);
        ring.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(ring.try_pop(), Some(4.0));
        assert_eq!(ring.try_pop(), Some(5.0));
        assert_eq!(ring.try_pop(), None);
    }

    #[test]
    fn capacity_from_format() {
        let ring = SampleRing::for_duration(10, 2, 1);
        ring.push_slice(&[0.0; 30]);
        assert_eq!(ring.len(), 20);
    }

    #[test]
    fn clear_empties() {
        let ring = SampleRing::new(4);
        ring.push_slice(&[1.0, 2.0]);
        ring.clear();
        assert_eq!(ring.try_pop(), None);
    }
}
