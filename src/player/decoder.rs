use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use ffmpeg_next::format::Pixel;
use ffmpeg_next::frame::{Audio as AudioFrame, Video as VideoFrame};
use ffmpeg_next::media::Type;
use ffmpeg_next::software::resampling::Context as ResamplerContext;
use ffmpeg_next::software::scaling::{Context as ScalerContext, Flags};
use ffmpeg_next::util::channel_layout::ChannelLayout;
use ffmpeg_next::util::format::sample::Sample;
use ffmpeg_next::{codec, Packet, Rational};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::circular_buffer::SampleRing;
use super::clock::AudioClock;
use crate::engine::EngineEvent;

/// Output format used when the file has no audio stream.
const SILENT_SAMPLE_RATE: u32 = 44_100;
const SILENT_CHANNELS: u16 = 2;

const IDLE_POLL: Duration = Duration::from_millis(10);
const FULL_QUEUE_RETRY: Duration = Duration::from_millis(1);

/// A decoded RGBA video frame ready for upload
pub struct DecodedVideoFrame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Presentation time in seconds
    pub pts: f64,
}

/// Commands sent to the decoder thread
pub enum DecoderCommand {
    Seek(f64),
    Pause,
    Resume,
    Stop,
}

/// Stream properties read before decoding starts
pub struct MediaInfo {
    pub width: u32,
    pub height: u32,
    /// Seconds
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Open `path` and read its stream properties without decoding.
pub fn probe_media(path: &Path) -> Result<MediaInfo> {
    let input = ffmpeg_next::format::input(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let video_stream = input
        .streams()
        .best(Type::Video)
        .ok_or_else(|| anyhow!("No video stream found"))?;

    let video_decoder = codec::Context::from_parameters(video_stream.parameters())?
        .decoder()
        .video()
        .context("Unsupported video codec")?;

    let (sample_rate, channels) = match input.streams().best(Type::Audio) {
        Some(audio) => {
            let audio_decoder = codec::Context::from_parameters(audio.parameters())?
                .decoder()
                .audio()
                .context("Unsupported audio codec")?;
            // Output is always resampled to stereo.
            (audio_decoder.rate(), SILENT_CHANNELS)
        }
        None => (SILENT_SAMPLE_RATE, SILENT_CHANNELS),
    };

    let duration = if input.duration() > 0 {
        input.duration() as f64 / ffmpeg_next::ffi::AV_TIME_BASE as f64
    } else {
        0.0
    };

    Ok(MediaInfo {
        width: video_decoder.width(),
        height: video_decoder.height(),
        duration,
        sample_rate,
        channels,
    })
}

/// Everything the decoder thread owns
pub struct DecoderChannels {
    pub video: Sender<DecodedVideoFrame>,
    pub audio: Arc<SampleRing>,
    pub commands: Receiver<DecoderCommand>,
}

/// Spawn the decoder thread. Errors inside the thread are reported as
/// [`EngineEvent::ErrorOccurred`].
pub fn start_decoder_thread(
    path: &Path,
    channels: DecoderChannels,
    events: Sender<EngineEvent>,
    clock: AudioClock,
    stop_flag: Arc<AtomicBool>,
) -> Result<JoinHandle<()>> {
    let path = path.to_path_buf();

    let handle = thread::Builder::new()
        .name("decoder".to_string())
        .spawn(move || {
            if let Err(e) = decode_loop(&path, channels, clock, stop_flag) {
                error!(path = %path.display(), error = %e, "Decoder failed");
                let _ = events.send(EngineEvent::ErrorOccurred(format!("{e:#}")));
            }
        })
        .context("Failed to spawn decoder thread")?;

    Ok(handle)
}

/// What the loop should do after draining commands
enum Flow {
    Continue,
    /// A seek arrived while a frame was being delivered
    Interrupted,
    Exit,
}

struct LoopState {
    paused: bool,
    pending_seek: Option<f64>,
}

impl LoopState {
    /// Apply every queued command.
    fn drain_commands(&mut self, commands: &Receiver<DecoderCommand>, clock: &AudioClock) -> Flow {
        let mut flow = Flow::Continue;
        loop {
            match commands.try_recv() {
                Ok(DecoderCommand::Stop) | Err(TryRecvError::Disconnected) => return Flow::Exit,
                Ok(DecoderCommand::Pause) => {
                    self.paused = true;
                    clock.pause();
                }
                Ok(DecoderCommand::Resume) => {
                    self.paused = false;
                    clock.resume();
                }
                Ok(DecoderCommand::Seek(target)) => {
                    self.pending_seek = Some(target);
                    flow = Flow::Interrupted;
                }
                Err(TryRecvError::Empty) => return flow,
            }
        }
    }
}

fn decode_loop(
    path: &Path,
    channels: DecoderChannels,
    clock: AudioClock,
    stop_flag: Arc<AtomicBool>,
) -> Result<()> {
    let DecoderChannels {
        video: video_sender,
        audio: audio_ring,
        commands,
    } = channels;

    let mut input = ffmpeg_next::format::input(path)?;

    let video_stream = input
        .streams()
        .best(Type::Video)
        .ok_or_else(|| anyhow!("No video stream"))?;
    let video_stream_index = video_stream.index();
    let video_time_base = video_stream.time_base();
    let video_params = video_stream.parameters();

    let (audio_stream_index, audio_params) = match input.streams().best(Type::Audio) {
        Some(stream) => (Some(stream.index()), Some(stream.parameters())),
        None => (None, None),
    };

    let mut video_decoder = codec::Context::from_parameters(video_params)?
        .decoder()
        .video()?;

    let mut audio_decoder = match audio_params {
        Some(params) => Some(codec::Context::from_parameters(params)?.decoder().audio()?),
        None => None,
    };

    let mut scaler = ScalerContext::get(
        video_decoder.format(),
        video_decoder.width(),
        video_decoder.height(),
        Pixel::RGBA,
        video_decoder.width(),
        video_decoder.height(),
        Flags::BILINEAR,
    )?;

    let mut resampler = match audio_decoder {
        Some(ref decoder) => Some(ResamplerContext::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            Sample::F32(ffmpeg_next::util::format::sample::Type::Packed),
            ChannelLayout::STEREO,
            clock.sample_rate(),
        )?),
        None => None,
    };

    let mut video_frame = VideoFrame::empty();
    let mut audio_frame = AudioFrame::empty();
    let mut rgba_frame = VideoFrame::empty();

    let mut state = LoopState {
        paused: true,
        pending_seek: None,
    };
    let mut at_eof = false;

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            return Ok(());
        }

        if let Flow::Exit = state.drain_commands(&commands, &clock) {
            return Ok(());
        }

        if let Some(target) = state.pending_seek.take() {
            let target_ts = (target * ffmpeg_next::ffi::AV_TIME_BASE as f64) as i64;
            match input.seek(target_ts, ..target_ts) {
                Ok(()) => {
                    video_decoder.flush();
                    if let Some(ref mut dec) = audio_decoder {
                        dec.flush();
                    }
                    clock.set_position(target);
                    at_eof = false;
                    debug!(seek_to = target, "Decoder seeked");
                }
                Err(e) => warn!(seek_to = target, error = %e, "Seek failed"),
            }
        }

        if state.paused || at_eof {
            thread::sleep(IDLE_POLL);
            continue;
        }

        let mut packet = Packet::empty();
        match packet.read(&mut input) {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Eof) => {
                debug!("Decoder reached end of file");
                at_eof = true;
                continue;
            }
            Err(e) => {
                debug!(error = %e, "Skipping unreadable packet");
                continue;
            }
        }

        let stream_index = packet.stream();

        if stream_index == video_stream_index {
            video_decoder.send_packet(&packet)?;

            'frames: while video_decoder.receive_frame(&mut video_frame).is_ok() {
                scaler.run(&video_frame, &mut rgba_frame)?;
                let mut frame = to_rgba_frame(&video_frame, &rgba_frame, video_time_base);

                // Block-free delivery; seek and stop stay responsive while the
                // presentation queue is full.
                loop {
                    match state.drain_commands(&commands, &clock) {
                        Flow::Exit => return Ok(()),
                        Flow::Interrupted => break 'frames,
                        Flow::Continue => {}
                    }
                    match video_sender.try_send(frame) {
                        Ok(()) => break,
                        Err(TrySendError::Full(f)) => {
                            frame = f;
                            thread::sleep(FULL_QUEUE_RETRY);
                        }
                        Err(TrySendError::Disconnected(_)) => return Ok(()),
                    }
                }
            }
        } else if Some(stream_index) == audio_stream_index {
            if let (Some(decoder), Some(resampler)) = (audio_decoder.as_mut(), resampler.as_mut())
            {
                decoder.send_packet(&packet)?;
                while decoder.receive_frame(&mut audio_frame).is_ok() {
                    let mut resampled = AudioFrame::empty();
                    if resampler.run(&audio_frame, &mut resampled).is_ok() {
                        audio_ring.push_slice(packed_f32_samples(&resampled));
                    }
                }
            }
        }
    }
}

fn to_rgba_frame(
    source: &VideoFrame,
    rgba: &VideoFrame,
    time_base: Rational,
) -> DecodedVideoFrame {
    let pts = source.pts().unwrap_or(0);
    DecodedVideoFrame {
        rgba: tightly_packed(rgba),
        width: rgba.width(),
        height: rgba.height(),
        pts: pts as f64 * f64::from(time_base),
    }
}

/// Copy plane 0 without the scaler's row padding.
fn tightly_packed(rgba: &VideoFrame) -> Vec<u8> {
    let row = rgba.width() as usize * 4;
    let stride = rgba.stride(0);
    let data = rgba.data(0);
    if stride == row {
        return data[..row * rgba.height() as usize].to_vec();
    }
    data.chunks(stride)
        .take(rgba.height() as usize)
        .flat_map(|line| &line[..row])
        .copied()
        .collect()
}

fn packed_f32_samples(frame: &AudioFrame) -> &[f32] {
    let data = frame.data(0);
    // Packed stereo f32: two samples per frame sample.
    let len = (frame.samples() * 2).min(data.len() / 4);
    // SAFETY: the resampler outputs packed f32, and FFmpeg buffers are
    // aligned well beyond 4 bytes.
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, len) }
}
