//! # Tone Output Module
//!
//! A minimal audio collaborator for the trainer. Notes are rendered as
//! decaying sine tones on the default output device using CPAL. The
//! `AudioSink` calls run on the main thread and hand timed note events to the
//! audio callback over a crossbeam channel, so they never block.

use anyhow::{Context, Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use log::{error, info};

use ear_core::notes::pitch_to_frequency;
use ear_core::playback::{AudioSink, DEFAULT_SUSTAIN, NoteEvent, PlaybackMode, interval_schedule};

/// Peak amplitude of a single voice.
const VOICE_GAIN: f32 = 0.2;

/// Voices the callback can hold without reallocating.
const MAX_VOICES: usize = 16;

/// Where note events end up.
pub enum Output {
    /// A live CPAL stream
    Tone(ToneSink),
    /// Logs each note instead of playing it
    Silent { sustain: f32 },
}

impl Output {
    /// Opens the default output device, falling back to silent output.
    pub fn open(silent: bool) -> Self {
        if silent {
            return Output::Silent { sustain: DEFAULT_SUSTAIN };
        }
        match ToneSink::open() {
            Ok(sink) => Output::Tone(sink),
            Err(e) => {
                error!("[AUDIO] {:#}; continuing without sound", e);
                Output::Silent { sustain: DEFAULT_SUSTAIN }
            }
        }
    }

    pub fn sustain(&self) -> f32 {
        match self {
            Output::Tone(sink) => sink.sustain,
            Output::Silent { sustain } => *sustain,
        }
    }

    /// Plays a pre-laid-out phrase such as a scale demonstration.
    pub fn play_events(&mut self, events: &[NoteEvent]) {
        match self {
            Output::Tone(sink) => events.iter().for_each(|e| sink.send(*e)),
            Output::Silent { .. } => {
                for e in events {
                    info!("[AUDIO] {:>5.2}s  {}", e.onset, ear_core::pitch_to_display_name(e.pitch));
                }
            }
        }
    }
}

impl AudioSink for Output {
    fn play_note(&mut self, pitch: i32) {
        let sustain = self.sustain();
        self.play_events(&[NoteEvent { pitch, onset: 0.0, duration: sustain }]);
    }

    fn play_interval(&mut self, first: i32, second: i32, mode: PlaybackMode) {
        let events = interval_schedule(first, second, mode, self.sustain());
        self.play_events(&events);
    }

    fn set_sustain_duration(&mut self, seconds: f32) {
        match self {
            Output::Tone(sink) => sink.sustain = seconds,
            Output::Silent { sustain } => *sustain = seconds,
        }
    }
}

/// Sends note events to a running output stream.
pub struct ToneSink {
    sender: Sender<NoteEvent>,
    sustain: f32,
    // Dropping the stream stops playback
    _stream: cpal::Stream,
}

impl ToneSink {
    /// Starts a stream on the default output device.
    ///
    /// The stream runs for the life of the sink and renders silence when no
    /// notes are sounding.
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;

        info!("[AUDIO] Using output device: {}", device.name()?);

        let supported = device
            .default_output_config()
            .context("querying default output config")?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(anyhow!("Output device does not use f32 samples"));
        }
        let config: cpal::StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut voices = VoiceBank::new(receiver, sample_rate);

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                voices.accept_pending();
                for frame in data.chunks_mut(channels) {
                    let sample = voices.next_sample();
                    frame.iter_mut().for_each(|s| *s = sample);
                }
            },
            |err| error!("[AUDIO] Output stream error: {}", err),
            None,
        )?;

        stream.play()?;
        info!("[AUDIO] Output stream running at {} Hz", sample_rate);

        Ok(Self {
            sender,
            sustain: DEFAULT_SUSTAIN,
            _stream: stream,
        })
    }

    fn send(&self, event: NoteEvent) {
        // Only fails if the stream is gone, in which case there is nothing to play on
        let _ = self.sender.try_send(event);
    }
}

/// A sounding (or scheduled) sine tone.
#[derive(Debug, Clone)]
struct Voice {
    phase_step: f32,
    phase: f32,
    start: u64,
    length: u64,
}

/// Mixes voices inside the audio callback.
struct VoiceBank {
    receiver: Receiver<NoteEvent>,
    sample_rate: f32,
    clock: u64,
    voices: Vec<Voice>,
}

impl VoiceBank {
    fn new(receiver: Receiver<NoteEvent>, sample_rate: f32) -> Self {
        Self {
            receiver,
            sample_rate,
            clock: 0,
            voices: Vec::with_capacity(MAX_VOICES),
        }
    }

    /// Moves newly sent events onto the timeline, relative to now.
    ///
    /// Events arriving while every voice slot is taken are dropped.
    fn accept_pending(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            if self.voices.len() >= MAX_VOICES {
                continue;
            }
            self.voices.push(Voice {
                phase_step: pitch_to_frequency(event.pitch) / self.sample_rate,
                phase: 0.0,
                start: self.clock + (event.onset * self.sample_rate) as u64,
                length: (event.duration * self.sample_rate) as u64,
            });
        }
    }

    fn next_sample(&mut self) -> f32 {
        let now = self.clock;
        let mut mix = 0.0_f32;
        for voice in self.voices.iter_mut().filter(|v| now >= v.start) {
            let elapsed = (now - voice.start) as f32 / voice.length.max(1) as f32;
            // Exponential decay reaching about -40 dB at the end of the sustain
            let envelope = (-4.6 * elapsed).exp();
            mix += (voice.phase * std::f32::consts::TAU).sin() * envelope * VOICE_GAIN;
            voice.phase = (voice.phase + voice.phase_step).fract();
        }
        self.voices.retain(|v| now < v.start + v.length);
        self.clock += 1;
        mix.clamp(-1.0, 1.0)
    }
}
