//! Attack/release ramp used to hide the jump between two steps.
//!
//! On every step change the ramp drops to zero and rises back to one over the
//! attack time, then falls over the release time. Times are exponential in
//! the knob value: `MIN_TIME * 2^(knob * 20)`.

pub const MIN_TIME: f32 = 1e-3;

/// Release knob position at which the ramp has no audible effect.
pub const DEFAULT_RELEASE: f32 = 1.0;

const SETTLE_THRESHOLD: f32 = 1e-3;

fn knob_to_time(knob: f32) -> f32 {
    let knob = if knob.is_finite() { knob.max(0.0).min(1.0) } else { 0.0 };
    MIN_TIME * 2.0_f32.powf(knob * 20.0)
}

#[derive(Clone)]
#[derive(Debug)]
pub struct EnvelopeRamp {
    level: f32,
    gate: bool,
}

impl EnvelopeRamp {
    pub fn new() -> Self {
        EnvelopeRamp { level: 1.0, gate: false }
    }

    pub fn level(self: &Self) -> f32 {
        self.level
    }

    /// Restart from silence.
    pub fn trigger(self: &mut Self) {
        self.level = 0.0;
        self.gate = true;
    }

    /// Whether the knobs leave the ramp with anything to do.
    pub fn is_engaged(attack: f32, release: f32) -> bool {
        attack > 0.0 || release != DEFAULT_RELEASE
    }

    pub fn process(self: &mut Self, attack: f32, release: f32, sample_time: f32) -> f32 {
        let target = if self.gate { 1.0 } else { 0.0 };
        let delta = target - self.level;

        if delta > 0.0 {
            let rise = knob_to_time(attack);
            self.level += 10.0 / rise * sample_time;
            if target - self.level <= SETTLE_THRESHOLD {
                self.level = target;
                self.gate = false;
            }
        } else if delta < 0.0 {
            let fall = knob_to_time(release);
            self.level -= 10.0 / fall * sample_time;
            if self.level - target <= SETTLE_THRESHOLD {
                self.level = target;
            }
        } else {
            self.gate = false;
        }

        if !self.level.is_finite() {
            self.level = 0.0;
        }
        self.level = self.level.max(0.0).min(1.0);
        return self.level;
    }
}

impl Default for EnvelopeRamp {
    fn default() -> Self {
        EnvelopeRamp::new()
    }
}
