/// This is the sample format used inside the audio engine.
pub type Sample = f32;

pub type SamplePosition = usize;

/// Number of steps in the sequence. Fixed.
pub const STEP_COUNT: usize = 8;

/// Per-buffer capacity: 2^21 samples, roughly 47 seconds of mono audio at 44.1kHz.
pub const DEFAULT_BUFFER_CAPACITY: SamplePosition = 1 << 21;

/// Pitch control range, mapped onto a 1/4x .. 4x playback speed.
pub const MIN_PITCH: f32 = -1.0;
pub const MAX_PITCH: f32 = 1.0;

pub const MIN_RATIO: f64 = 0.25;
pub const MAX_RATIO: f64 = 4.0;

/// Replace anything non-finite with silence.
pub fn sanitize(sample: Sample) -> Sample {
    if sample.is_finite() { sample } else { 0.0 }
}

/// Linear gain in 0..1 expressed in decibels, with silence shown as -inf.
pub fn gain_to_db(gain: f32) -> f32 {
    if gain <= 0.0 {
        return f32::NEG_INFINITY;
    }
    20.0 * gain.log10()
}

/// Length ratio between converted and recorded audio: `4^(-pitch)`.
///
/// A pitch of +1 plays four times as fast (a quarter of the samples), -1
/// plays at a quarter speed.
pub fn pitch_to_ratio(pitch: f32) -> f64 {
    let pitch = if pitch.is_finite() { pitch.max(MIN_PITCH).min(MAX_PITCH) } else { 0.0 };
    let ratio = 4.0_f64.powf(-(pitch as f64));
    if !ratio.is_finite() {
        return 1.0;
    }
    ratio.max(MIN_RATIO).min(MAX_RATIO)
}
