//! Per-step recorder and player.
//!
//! A sampler records into its input buffer. When the step becomes active for
//! playback the input is copied, or rate converted when the pitch is not
//! zero, into the output buffer which is what actually gets played.

use dasp::interpolate::linear::Linear;
use dasp::signal::interpolate::Converter;
use dasp::{signal, Signal};
use log::*;

use crate::buffers::SampleBuffer;
use crate::units::*;

pub struct Sampler {
    input: SampleBuffer,
    output: SampleBuffer,

    // Pitch the output buffer was last produced with, `None` when the output
    // no longer matches the input.
    last_pitch: Option<f32>,
}

impl Sampler {
    pub fn new(capacity: SamplePosition) -> Self {
        Sampler {
            input: SampleBuffer::new(capacity),
            output: SampleBuffer::new(capacity),
            last_pitch: None,
        }
    }

    pub fn input(self: &Self) -> &SampleBuffer {
        &self.input
    }

    pub fn output(self: &Self) -> &SampleBuffer {
        &self.output
    }

    /// True when nothing has been recorded into this step.
    pub fn is_empty(self: &Self) -> bool {
        self.input.is_empty()
    }

    pub fn erase(self: &mut Self) {
        self.input.clear();
        self.output.clear();
        self.last_pitch = None;
    }

    /// Start a fresh recording. Recording always runs forwards.
    pub fn prepare_recording(self: &mut Self) {
        self.erase();
        self.input.reset_cursor(false);
    }

    pub fn prepare_playback(self: &mut Self, reverse: bool, pitch: f32) {
        let pitch = if pitch.is_finite() { pitch.max(MIN_PITCH).min(MAX_PITCH) } else { 0.0 };

        if self.last_pitch != Some(pitch) {
            if pitch == 0.0 {
                self.output.copy_from(&self.input);
            } else {
                self.convert(pitch);
            }
            self.last_pitch = Some(pitch);
        }

        self.output.reset_cursor(reverse);
    }

    fn convert(self: &mut Self, pitch: f32) {
        let ratio = pitch_to_ratio(pitch);
        let input_rate = self.input.sample_rate();
        let input_length = self.input.len();

        if input_length < 2 || !(input_rate > 0.0) {
            // Too short to interpolate, play it as it is.
            self.output.copy_from(&self.input);
            return;
        }

        let new_rate = input_rate * ratio;
        let target_length = (input_length as f64 * ratio).round() as SamplePosition;
        trace!("convert {} samples at {}Hz -> {} samples at {}Hz (pitch {})",
               input_length, input_rate, target_length, new_rate, pitch);

        let mut source = signal::from_iter(self.input.as_slice().iter().cloned());
        let left = source.next();
        let right = source.next();
        let interpolator = Linear::new(left, right);
        let mut converter = Converter::from_hz_to_hz(source, interpolator, input_rate, new_rate);

        self.output.fill_with(target_length, new_rate, || converter.next());
    }

    /// Append one sample to the recording. The latest sample rate wins.
    pub fn record(self: &mut Self, sample: Sample, sample_rate: f64) {
        self.input.push(sanitize(sample), sample_rate);
        self.last_pitch = None;
    }

    pub fn play(self: &mut Self, reverse: bool) -> Sample {
        sanitize(self.output.play(reverse))
    }

    /// Progress through the output buffer, for display only.
    pub fn playhead_percent(self: &Self) -> f32 {
        self.output.playhead()
    }
}
