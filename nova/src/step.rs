//! Per-step settings and status.

use crate::units::gain_to_db;

/// Knob and toggle settings for one step.
#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
#[derive(PartialEq)]
pub struct StepConfig {
    pub gain: f32,
    pub mute: bool,
    pub skip: bool,
    pub reverse: bool,
}

/// Control voltages patched into one step, in volts. Zero when unpatched.
#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
#[derive(Default)]
#[derive(PartialEq)]
pub struct StepCv {
    pub gain: f32,
    pub mute: f32,
    pub skip: f32,
    pub reverse: f32,
}

const CV_SCALE: f32 = 0.1;
const TOGGLE_THRESHOLD: f32 = 0.5;

fn toggle_with_cv(toggle: bool, cv: f32) -> bool {
    let value = if toggle { 1.0 } else { 0.0 } + finite_or_zero(cv) * CV_SCALE;
    value >= TOGGLE_THRESHOLD
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

impl StepConfig {
    /// Combine the panel settings with whatever CV is patched in.
    pub fn effective(self: &Self, cv: &StepCv) -> StepConfig {
        let gain = finite_or_zero(self.gain) + finite_or_zero(cv.gain) * CV_SCALE;
        StepConfig {
            gain: gain.max(0.0).min(1.0),
            mute: toggle_with_cv(self.mute, cv.mute),
            skip: toggle_with_cv(self.skip, cv.skip),
            reverse: toggle_with_cv(self.reverse, cv.reverse),
        }
    }

    pub fn gain_db(self: &Self) -> f32 {
        gain_to_db(self.gain)
    }
}

impl Default for StepConfig {
    fn default() -> Self {
        StepConfig { gain: 1.0, mute: false, skip: false, reverse: false }
    }
}

/// What the light above a step shows.
#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
#[derive(PartialEq)]
pub enum StepStatus {
    Muted,
    Empty,
    Playing { progress: f32 },
}

impl StepStatus {
    /// Light colour as red, green, blue brightness in 0..1.
    ///
    /// Muted steps are red, empty steps dark, and steps with audio fade from
    /// green to blue as the playhead moves through them.
    pub fn rgb(self: &Self) -> (f32, f32, f32) {
        match *self {
            StepStatus::Muted => (1.0, 0.0, 0.0),
            StepStatus::Empty => (0.0, 0.0, 0.0),
            StepStatus::Playing { progress } => {
                let progress = finite_or_zero(progress).max(0.0).min(1.0);
                (0.0, 1.0 - progress, progress)
            },
        }
    }
}

impl Default for StepStatus {
    fn default() -> Self {
        StepStatus::Empty
    }
}
