use std::{
    io::Cursor,
    sync::{
        Arc, Mutex, Weak,
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

use async_trait::async_trait;
use cpal::{
    Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use reqwest::Client;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::DecoderOptions,
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

use super::{AudioBackend, AudioSource, PlaybackError};

/// One decoded preview, already in the device's sample rate and channel
/// layout. `position` indexes interleaved samples.
#[derive(Debug, Default)]
struct Voice {
    samples: Vec<f32>,
    position: AtomicUsize,
    playing: AtomicBool,
    looping: AtomicBool,
}

impl Voice {
    fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            ..Default::default()
        }
    }

    /// Adds this voice's next `out.len()` samples onto `out`.
    fn mix_into(&self, out: &mut [f32]) {
        if !self.playing.load(Ordering::Acquire) || self.samples.is_empty() {
            return;
        }

        let mut pos = self.position.load(Ordering::Acquire);
        for sample in out.iter_mut() {
            if pos >= self.samples.len() {
                if self.looping.load(Ordering::Relaxed) {
                    pos = 0;
                } else {
                    self.playing.store(false, Ordering::Release);
                    break;
                }
            }
            *sample += self.samples[pos];
            pos += 1;
        }
        self.position.store(pos, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct Mixer {
    voices: Mutex<Vec<Weak<Voice>>>,
}

impl Mixer {
    fn add(&self, voice: &Arc<Voice>) {
        if let Ok(mut voices) = self.voices.lock() {
            voices.push(Arc::downgrade(voice));
        }
    }

    fn render(&self, out: &mut [f32]) {
        out.fill(0.0);
        // Never block the audio thread; a contended lock is one silent buffer.
        let Ok(mut voices) = self.voices.try_lock() else {
            return;
        };
        voices.retain(|weak| match weak.upgrade() {
            Some(voice) => {
                voice.mix_into(out);
                true
            }
            None => false,
        });
        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
}

/// The running output stream. The stream itself lives on a dedicated thread
/// and is torn down when this handle is dropped.
struct OutputHandle {
    mixer: Arc<Mixer>,
    sample_rate: u32,
    channels: u16,
    _shutdown: mpsc::Sender<()>,
}

fn open_stream(mixer: Arc<Mixer>) -> Result<(Stream, u32, u16), PlaybackError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(PlaybackError::NoDevice)?;

    let supported = device
        .default_output_config()
        .map_err(|e| PlaybackError::Output(e.to_string()))?;
    let sample_rate = supported.sample_rate();
    let config: StreamConfig = supported.config();
    let channels = config.channels;

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| mixer.render(data),
            |err| tracing::warn!(error = %err, "audio stream error"),
            None,
        )
        .map_err(|e| PlaybackError::Output(e.to_string()))?;
    stream
        .play()
        .map_err(|e| PlaybackError::Output(e.to_string()))?;

    Ok((stream, sample_rate, channels))
}

fn start_output() -> Result<OutputHandle, PlaybackError> {
    let mixer = Arc::new(Mixer::default());
    let (ready_tx, ready_rx) = mpsc::channel();
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let thread_mixer = Arc::clone(&mixer);
    thread::Builder::new()
        .name("preview-output".to_string())
        .spawn(move || match open_stream(thread_mixer) {
            Ok((stream, rate, channels)) => {
                let _ = ready_tx.send(Ok((rate, channels)));
                // Blocks until every handle is gone.
                let _ = shutdown_rx.recv();
                drop(stream);
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e));
            }
        })
        .map_err(|e| PlaybackError::Output(e.to_string()))?;

    let (sample_rate, channels) = ready_rx
        .recv()
        .map_err(|e| PlaybackError::Output(e.to_string()))??;

    tracing::debug!(sample_rate, channels, "audio output started");
    Ok(OutputHandle {
        mixer,
        sample_rate,
        channels,
        _shutdown: shutdown_tx,
    })
}

/// Downloads previews and plays them through the default output device.
pub struct CpalBackend {
    http: Client,
    output: Option<Arc<OutputHandle>>,
}

impl CpalBackend {
    /// Opens the default output device.
    ///
    /// Never fails: without a usable device the backend still constructs and
    /// every `load` returns [`PlaybackError::NoDevice`], so browsing keeps
    /// working silently.
    pub fn open() -> Self {
        let output = match start_output() {
            Ok(handle) => Some(Arc::new(handle)),
            Err(e) => {
                tracing::warn!(error = %e, "previews disabled");
                None
            }
        };
        Self {
            http: Client::new(),
            output,
        }
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }
}

#[async_trait]
impl AudioBackend for CpalBackend {
    type Source = CpalSource;

    async fn load(&self, uri: &str) -> Result<CpalSource, PlaybackError> {
        let output = self.output.clone().ok_or(PlaybackError::NoDevice)?;

        let bytes = self
            .http
            .get(uri)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let rate = output.sample_rate;
        let channels = output.channels as usize;
        let samples = tokio::task::spawn_blocking(move || {
            let decoded = decode(bytes.to_vec())?;
            let remixed = remix(&decoded.samples, decoded.channels, channels);
            resample(&remixed, channels, decoded.sample_rate, rate)
        })
        .await
        .map_err(|e| PlaybackError::Decode(e.to_string()))??;

        let voice = Arc::new(Voice::new(samples));
        output.mixer.add(&voice);

        Ok(CpalSource { voice, output })
    }
}

pub struct CpalSource {
    voice: Arc<Voice>,
    output: Arc<OutputHandle>,
}

impl CpalSource {
    fn samples_per_second(&self) -> u64 {
        self.output.sample_rate as u64 * self.output.channels.max(1) as u64
    }
}

impl AudioSource for CpalSource {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.voice.samples.is_empty() {
            return Err(PlaybackError::Decode("preview has no audio".to_string()));
        }
        self.voice.playing.store(true, Ordering::Release);
        Ok(())
    }

    fn pause(&mut self) {
        self.voice.playing.store(false, Ordering::Release);
    }

    fn set_looping(&mut self, looping: bool) {
        self.voice.looping.store(looping, Ordering::Relaxed);
    }

    fn set_position(&mut self, position: Duration) {
        let index = (position.as_millis() as u64 * self.samples_per_second() / 1000) as usize;
        let channels = self.output.channels.max(1) as usize;
        // Stay on a frame boundary.
        let index = index - index % channels;
        self.voice
            .position
            .store(index.min(self.voice.samples.len()), Ordering::Release);
    }

    fn position(&self) -> Duration {
        let pos = self.voice.position.load(Ordering::Acquire) as u64;
        Duration::from_millis(pos * 1000 / self.samples_per_second().max(1))
    }

    fn is_playing(&self) -> bool {
        self.voice.playing.load(Ordering::Acquire)
    }
}

impl Drop for CpalSource {
    fn drop(&mut self) {
        self.voice.playing.store(false, Ordering::Release);
    }
}

struct Decoded {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: usize,
}

fn decode(bytes: Vec<u8>) -> Result<Decoded, PlaybackError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    // Preview clips are MP3.
    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::Decode(format!("failed to probe stream: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| PlaybackError::Decode("no audio track".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PlaybackError::Decode(format!("failed to create decoder: {}", e)))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt frames are skipped.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count();

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buffer.samples());
    }

    Ok(Decoded {
        samples,
        sample_rate,
        channels: channels.max(1),
    })
}

/// Converts interleaved samples between channel layouts. Downmixing to mono
/// averages, everything else maps channel to channel and pads with silence.
fn remix(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity(samples.len() / from * to);
    for frame in samples.chunks_exact(from) {
        if to == 1 {
            out.push(frame.iter().sum::<f32>() / from as f32);
            continue;
        }
        for c in 0..to {
            let sample = if from == 1 {
                frame[0]
            } else if c < from {
                frame[c]
            } else {
                0.0
            };
            out.push(sample);
        }
    }
    out
}

/// Resamples a whole interleaved clip in one pass. The clip is one rubato
/// chunk, so the output carries the filter's short leading delay.
fn resample(
    samples: &[f32],
    channels: usize,
    from: u32,
    to: u32,
) -> Result<Vec<f32>, PlaybackError> {
    if from == to || from == 0 || to == 0 || channels == 0 {
        return Ok(samples.to_vec());
    }

    let frames = samples.len() / channels;
    if frames == 0 {
        return Ok(Vec::new());
    }

    let params = SincInterpolationParameters {
        sinc_len: 64,
        f_cutoff: 0.9,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window: WindowFunction::Blackman,
    };
    let ratio = to as f64 / from as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, frames, channels)
        .map_err(|e| PlaybackError::Decode(format!("failed to create resampler: {}", e)))?;

    let mut deinterleaved = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, sample) in deinterleaved.iter_mut().zip(frame) {
            channel.push(*sample);
        }
    }

    let resampled = resampler
        .process(&deinterleaved, None)
        .map_err(|e| PlaybackError::Decode(format!("resampling failed: {}", e)))?;

    let output_frames = resampled.first().map(Vec::len).unwrap_or(0);
    let mut interleaved = Vec::with_capacity(output_frames * channels);
    for frame in 0..output_frames {
        for channel in &resampled {
            interleaved.push(channel[frame]);
        }
    }
    Ok(interleaved)
}
