//! FFmpeg-backed media engine: a decoder thread, a rodio sink driven by an
//! audio master clock, and an egui texture for the current video frame.

mod audio;
mod circular_buffer;
mod clock;
mod decoder;
mod video;

use anyhow::{Context as _, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{EngineEvent, MediaEngine, PlaybackState};
use audio::AudioSource;
use circular_buffer::SampleRing;
use clock::AudioClock;
use decoder::{probe_media, start_decoder_thread, DecodedVideoFrame, DecoderChannels, DecoderCommand};
use video::VideoFrameQueue;

/// Decoded frames buffered ahead of presentation.
const FRAME_QUEUE_LEN: usize = 30;
/// Seconds of decoded audio buffered ahead of the device.
const AUDIO_BUFFER_SECONDS: usize = 2;
/// End of stream is declared this close to the duration (seconds).
const END_SLACK: f64 = 0.1;

/// True once `position` has reached the end of a source of known length.
fn reached_end(position: f64, duration: f64) -> bool {
    duration > 0.0 && position >= duration - END_SLACK
}

/// Play on a finished source starts it again from the beginning.
fn restarts_from_beginning(state: PlaybackState, position: f64, duration: f64) -> bool {
    state == PlaybackState::Stopped && reached_end(position, duration)
}

/// Command for a pause request. A pending seek keeps the decoder running
/// until its first frame lands; `update` parks it after that.
fn pause_command(seeking: bool) -> Option<DecoderCommand> {
    (!seeking).then_some(DecoderCommand::Pause)
}

/// The decoder thread has returned, on error or otherwise.
fn decoder_exited(handle: Option<&JoinHandle<()>>) -> bool {
    handle.is_some_and(JoinHandle::is_finished)
}

/// How the video surface is scaled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    FitToWindow,
    NativeSize,
}

/// One opened source: decoder thread, audio sink and frame queue.
struct Playback {
    state: PlaybackState,
    seeking: bool,
    seek_target: f64,

    width: u32,
    height: u32,
    duration: f64,

    decoder_handle: Option<JoinHandle<()>>,
    command_sender: Sender<DecoderCommand>,
    stop_flag: Arc<AtomicBool>,

    _output_stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Sink,
    clock: AudioClock,

    frame_queue: VideoFrameQueue,
    texture: TextureHandle,
}

impl Playback {
    fn open(path: &Path, ctx: &Context, events: Sender<EngineEvent>) -> Result<Self> {
        let info = probe_media(path)?;
        let clock = AudioClock::new(info.sample_rate, info.channels);

        let (output_stream, stream_handle) =
            OutputStream::try_default().context("No audio output device")?;
        let sink = Sink::try_new(&stream_handle).context("Failed to create audio sink")?;

        let audio_ring =
            SampleRing::for_duration(info.sample_rate, info.channels, AUDIO_BUFFER_SECONDS);
        sink.append(AudioSource::new(audio_ring.clone(), clock.clone()));
        sink.pause();

        let (video_sender, video_receiver) = bounded(FRAME_QUEUE_LEN);
        let frame_queue = VideoFrameQueue::new(video_receiver, FRAME_QUEUE_LEN);

        let (command_sender, command_receiver) = bounded(16);

        let stop_flag = Arc::new(AtomicBool::new(false));
        let decoder_handle = start_decoder_thread(
            path,
            DecoderChannels {
                video: video_sender,
                audio: audio_ring,
                commands: command_receiver,
            },
            events,
            clock.clone(),
            stop_flag.clone(),
        )?;

        let texture = ctx.load_texture(
            "video_frame",
            ColorImage::new(
                [info.width as usize, info.height as usize],
                egui::Color32::BLACK,
            ),
            TextureOptions::LINEAR,
        );

        let mut playback = Self {
            state: PlaybackState::Stopped,
            seeking: false,
            seek_target: 0.0,
            width: info.width,
            height: info.height,
            duration: info.duration,
            decoder_handle: Some(decoder_handle),
            command_sender,
            stop_flag,
            _output_stream: output_stream,
            _stream_handle: stream_handle,
            sink,
            clock,
            frame_queue,
            texture,
        };

        // Decode the first frame so the surface is not black while stopped.
        playback.seek(0.0);

        Ok(playback)
    }

    fn play(&mut self) {
        if self.state != PlaybackState::Playing {
            if !self.seeking
                && restarts_from_beginning(self.state, self.clock.position(), self.duration)
            {
                debug!("Restarting finished source");
                self.seek(0.0);
            }
            self.state = PlaybackState::Playing;
            if !self.seeking {
                self.sink.play();
            }
            let _ = self.command_sender.send(DecoderCommand::Resume);
        }
    }

    fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            self.sink.pause();
            if let Some(command) = pause_command(self.seeking) {
                let _ = self.command_sender.send(command);
            }
        }
    }

    fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.sink.pause();
        self.seek(0.0);
    }

    /// Seek to `position` seconds. Audio stays paused until the first frame
    /// at the new position arrives. The decoder runs even when paused so that
    /// frame can be shown; `update` parks it again afterwards.
    fn seek(&mut self, position: f64) {
        let position = position.clamp(0.0, self.duration.max(0.0));
        self.seeking = true;
        self.seek_target = position;
        self.sink.pause();
        self.frame_queue.clear();
        self.clock.set_position(position);
        let _ = self.command_sender.send(DecoderCommand::Seek(position));
        let _ = self.command_sender.send(DecoderCommand::Resume);
    }

    fn upload(texture: &mut TextureHandle, frame: &DecodedVideoFrame) {
        let image = ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.rgba,
        );
        texture.set(image, TextureOptions::LINEAR);
    }

    fn update(&mut self, ctx: &Context) {
        if decoder_exited(self.decoder_handle.as_ref())
            && (self.seeking || self.state == PlaybackState::Playing)
        {
            warn!("Decoder thread exited, stopping playback");
            self.seeking = false;
            self.state = PlaybackState::Stopped;
            self.sink.pause();
            return;
        }

        if self.seeking {
            if let Some(frame) = self.frame_queue.first_frame_after_seek(self.seek_target) {
                Self::upload(&mut self.texture, frame);
                self.clock.set_position(frame.pts);
                self.seeking = false;
                match self.state {
                    PlaybackState::Playing => self.sink.play(),
                    // Only one frame was wanted.
                    _ => {
                        let _ = self.command_sender.send(DecoderCommand::Pause);
                    }
                }
            }
            ctx.request_repaint();
            return;
        }

        if self.state != PlaybackState::Playing {
            return;
        }

        let clock_time = self.clock.position();
        if let Some(frame) = self.frame_queue.next_due_frame(clock_time) {
            Self::upload(&mut self.texture, frame);
        }

        if self.frame_queue.is_drained() && reached_end(clock_time, self.duration) {
            debug!("End of stream");
            self.state = PlaybackState::Stopped;
            self.sink.pause();
            let _ = self.command_sender.send(DecoderCommand::Pause);
        }

        ctx.request_repaint();
    }

    fn position(&self) -> f64 {
        if self.seeking {
            self.seek_target
        } else {
            let position = self.clock.position();
            if self.duration > 0.0 {
                position.min(self.duration)
            } else {
                position
            }
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        let _ = self.command_sender.send(DecoderCommand::Stop);

        if let Some(handle) = self.decoder_handle.take() {
            let _ = handle.join();
        }
    }
}

fn to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

/// [`MediaEngine`] on FFmpeg and rodio. Volume, mute and rate carry over
/// from one source to the next.
pub struct FfmpegEngine {
    ctx: Context,
    playback: Option<Playback>,
    event_sender: Sender<EngineEvent>,
    event_receiver: Receiver<EngineEvent>,
    volume: f32,
    muted: bool,
    rate: f32,
    display_mode: DisplayMode,
    last_position_ms: Option<u64>,
    last_state: PlaybackState,
}

impl FfmpegEngine {
    pub fn new(ctx: Context) -> Self {
        let (event_sender, event_receiver) = unbounded();
        Self {
            ctx,
            playback: None,
            event_sender,
            event_receiver,
            volume: 1.0,
            muted: false,
            rate: 1.0,
            display_mode: DisplayMode::FitToWindow,
            last_position_ms: None,
            last_state: PlaybackState::Stopped,
        }
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.event_sender.send(event);
    }

    fn apply_audio_settings(&self) {
        if let Some(playback) = &self.playback {
            let volume = if self.muted { 0.0 } else { self.volume };
            playback.sink.set_volume(volume);
            playback.sink.set_speed(self.rate);
        }
    }

    /// Advance presentation; call once per UI frame.
    pub fn update(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        playback.update(&self.ctx);

        let position = to_ms(playback.position());
        let state = playback.state;

        if self.last_position_ms != Some(position) {
            self.last_position_ms = Some(position);
            self.emit(EngineEvent::PositionChanged(position));
        }
        if state != self.last_state {
            self.last_state = state;
            self.emit(EngineEvent::StateChanged(state));
        }
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.playback.as_ref().map(|p| &p.texture)
    }

    pub fn video_size(&self) -> Option<(u32, u32)> {
        self.playback.as_ref().map(|p| (p.width, p.height))
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn toggle_display_mode(&mut self) {
        self.display_mode = match self.display_mode {
            DisplayMode::FitToWindow => DisplayMode::NativeSize,
            DisplayMode::NativeSize => DisplayMode::FitToWindow,
        };
    }

    fn sync_state(&mut self) {
        let state = self.playback_state();
        if state != self.last_state {
            self.last_state = state;
            self.emit(EngineEvent::StateChanged(state));
        }
    }
}

impl MediaEngine for FfmpegEngine {
    fn set_source(&mut self, path: &Path) {
        // Join the old decoder before starting a new one.
        self.playback = None;
        self.last_position_ms = None;
        self.sync_state();

        match Playback::open(path, &self.ctx, self.event_sender.clone()) {
            Ok(playback) => {
                info!(
                    path = %path.display(),
                    width = playback.width,
                    height = playback.height,
                    duration = playback.duration,
                    "Source loaded"
                );
                let duration = to_ms(playback.duration);
                self.playback = Some(playback);
                self.apply_audio_settings();
                self.emit(EngineEvent::DurationChanged(duration));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load source");
                self.emit(EngineEvent::ErrorOccurred(format!("{e:#}")));
            }
        }
    }

    fn play(&mut self) {
        if let Some(playback) = self.playback.as_mut() {
            playback.play();
        }
        self.sync_state();
    }

    fn pause(&mut self) {
        if let Some(playback) = self.playback.as_mut() {
            playback.pause();
        }
        self.sync_state();
    }

    fn stop(&mut self) {
        if let Some(playback) = self.playback.as_mut() {
            playback.stop();
        }
        self.sync_state();
    }

    fn playback_state(&self) -> PlaybackState {
        self.playback
            .as_ref()
            .map_or(PlaybackState::Stopped, |p| p.state)
    }

    fn set_position_ms(&mut self, position: u64) {
        if let Some(playback) = self.playback.as_mut() {
            playback.seek(position as f64 / 1000.0);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_audio_settings();
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_audio_settings();
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
        self.apply_audio_settings();
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.event_receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn end_needs_known_duration() {
        assert!(!reached_end(0.0, 0.0));
        assert!(!reached_end(59.0, 60.0));
        assert!(reached_end(59.95, 60.0));
        assert!(reached_end(61.0, 60.0));
    }

    #[test]
    fn play_after_end_restarts() {
        assert!(restarts_from_beginning(PlaybackState::Stopped, 60.0, 60.0));
        assert!(!restarts_from_beginning(PlaybackState::Stopped, 12.0, 60.0));
        assert!(!restarts_from_beginning(PlaybackState::Paused, 60.0, 60.0));
        assert!(!restarts_from_beginning(PlaybackState::Stopped, 0.0, 0.0));
    }

    #[test]
    fn pause_during_seek_leaves_decoder_running() {
        assert!(pause_command(true).is_none());
        assert!(matches!(pause_command(false), Some(DecoderCommand::Pause)));
    }

    #[test]
    fn finished_thread_is_detected() {
        assert!(!decoder_exited(None));

        let (tx, rx) = bounded::<()>(0);
        let handle = std::thread::spawn(move || {
            let _ = rx.recv();
        });
        assert!(!decoder_exited(Some(&handle)));

        drop(tx);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !decoder_exited(Some(&handle)) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(decoder_exited(Some(&handle)));
    }
}
