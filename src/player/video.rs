use crossbeam_channel::Receiver;
use std::collections::VecDeque;

use super::decoder::DecodedVideoFrame;

/// Frames this far behind the clock are dropped (seconds)
const LATE_TOLERANCE: f64 = 0.02;
/// Frames up to this far ahead of the clock are shown early (seconds)
const EARLY_TOLERANCE: f64 = 0.02;
/// After a seek, frames this far before the target are discarded (seconds)
const SEEK_TOLERANCE: f64 = 0.5;

/// Buffers decoded frames and picks the one to present for the audio clock.
pub struct VideoFrameQueue {
    receiver: Receiver<DecodedVideoFrame>,
    buffer: VecDeque<DecodedVideoFrame>,
    current: Option<DecodedVideoFrame>,
    max_buffered: usize,
}

impl VideoFrameQueue {
    pub fn new(receiver: Receiver<DecodedVideoFrame>, max_buffered: usize) -> Self {
        Self {
            receiver,
            buffer: VecDeque::with_capacity(max_buffered),
            current: None,
            max_buffered,
        }
    }

    fn receive_frames(&mut self) {
        while self.buffer.len() < self.max_buffered {
            match self.receiver.try_recv() {
                Ok(frame) => self.buffer.push_back(frame),
                Err(_) => break,
            }
        }
    }

    fn drop_before(&mut self, pts: f64) {
        while self.buffer.front().is_some_and(|f| f.pts < pts) {
            self.buffer.pop_front();
        }
    }

    /// Frame to show at `clock_time`, or `None` if no new frame is due.
    pub fn next_due_frame(&mut self, clock_time: f64) -> Option<&DecodedVideoFrame> {
        self.receive_frames();
        self.drop_before(clock_time - LATE_TOLERANCE);

        if self
            .buffer
            .front()
            .is_some_and(|f| f.pts <= clock_time + EARLY_TOLERANCE)
        {
            self.current = self.buffer.pop_front();
            return self.current.as_ref();
        }
        None
    }

    /// First frame at or near `seek_target`, once the decoder has produced one.
    pub fn first_frame_after_seek(&mut self, seek_target: f64) -> Option<&DecodedVideoFrame> {
        self.receive_frames();
        self.drop_before(seek_target - SEEK_TOLERANCE);

        let frame = self.buffer.pop_front()?;
        self.current = Some(frame);
        self.current.as_ref()
    }

    /// Forget everything buffered, including frames still in the channel.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.current = None;
        while self.receiver.try_recv().is_ok() {}
    }

    /// No frames anywhere: the decoder has reached end of stream.
    pub fn is_drained(&self) -> bool {
        self.buffer.is_empty() && self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, Sender};

    fn frame(pts: f64) -> DecodedVideoFrame {
        DecodedVideoFrame {
            rgba: vec![0; 4],
            width: 1,
            height: 1,
            pts,
        }
    }

    fn queue() -> (Sender<DecodedVideoFrame>, VideoFrameQueue) {
        let (tx, rx) = bounded(16);
        (tx, VideoFrameQueue::new(rx, 8))
    }

    #[test]
    fn holds_frames_until_due() {
        let (tx, mut queue) = queue();
        tx.send(frame(1.0)).expect("send");

        assert!(queue.next_due_frame(0.5).is_none());
        let shown = queue.next_due_frame(0.99).map(|f| f.pts);
        assert_eq!(shown, Some(1.0));
    }

    #[test]
    fn drops_late_frames() {
        let (tx, mut queue) = queue();
        for pts in [0.0, 0.04, 0.08, 0.12] {
            tx.send(frame(pts)).expect("send");
        }
        let shown = queue.next_due_frame(0.10).map(|f| f.pts);
        assert_eq!(shown, Some(0.08));
    }

    #[test]
    fn seek_skips_frames_well_before_target() {
        let (tx, mut queue) = queue();
        for pts in [1.0, 4.8, 5.0] {
            tx.send(frame(pts)).expect("send");
        }
        let shown = queue.first_frame_after_seek(5.0).map(|f| f.pts);
        assert_eq!(shown, Some(4.8));
    }

    #[test]
    fn clear_drains_channel() {
        let (tx, mut queue) = queue();
        tx.send(frame(0.0)).expect("send");
        tx.send(frame(0.1)).expect("send");
        queue.clear();
        assert!(queue.is_drained());
        assert!(queue.first_frame_after_seek(0.0).is_none());
    }
}
