//! The per-frame processing loop.
//!
//! `Nova::process` is called once per audio frame. It looks for edges on the
//! control inputs, moves the sequencer, and records or plays one sample on
//! the active step. It never allocates: all sample storage is created in
//! `Nova::new`.

use log::*;

use crate::envelope::{EnvelopeRamp, DEFAULT_RELEASE};
use crate::sampler::Sampler;
use crate::sequencer::Sequencer;
use crate::step::{StepConfig, StepCv, StepStatus};
use crate::trigger::{SchmittTrigger, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD};
use crate::units::*;

const PITCH_CV_SCALE: f32 = 0.2;

// A clock-driven scan for a playable step gives up after this many advances.
const MAX_SKIP_ADVANCES: usize = 2 * STEP_COUNT;

pub struct Config {
    pub buffer_capacity: SamplePosition,
    pub trigger_low: f32,
    pub trigger_high: f32,
    /// Seed for random direction mode. Random each run when `None`.
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_capacity_seconds(seconds: f32, sample_rate: u32) -> Self {
        let capacity = (seconds.max(0.0) * sample_rate as f32).ceil() as SamplePosition;
        Config {
            buffer_capacity: capacity,
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            trigger_low: DEFAULT_LOW_THRESHOLD,
            trigger_high: DEFAULT_HIGH_THRESHOLD,
            seed: None,
        }
    }
}

/// Host timing for the current frame.
#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
pub struct ProcessArgs {
    pub sample_rate: f32,
    pub sample_time: f32,
}

impl ProcessArgs {
    pub fn new(sample_rate: u32) -> Self {
        ProcessArgs {
            sample_rate: sample_rate as f32,
            sample_time: 1.0 / sample_rate as f32,
        }
    }
}

/// Panel settings, read once per frame.
#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
pub struct Params {
    pub steps: [StepConfig; STEP_COUNT],
    pub attack: f32,
    pub release: f32,
    pub pitch: f32,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            steps: [StepConfig::default(); STEP_COUNT],
            attack: 0.0,
            release: DEFAULT_RELEASE,
            pitch: 0.0,
        }
    }
}

/// Input voltages for one frame. Gate inputs swing between 0 and 10.
#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
#[derive(Default)]
pub struct FrameInputs {
    pub audio: Sample,
    pub clock: f32,
    pub start_stop: f32,
    pub reset: f32,
    pub direction: f32,
    pub record: f32,
    pub triggers: [f32; STEP_COUNT],
    pub step_cv: [StepCv; STEP_COUNT],
    pub pitch_cv: f32,
}

#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
#[derive(Default)]
pub struct FrameOutputs {
    pub steps: [Sample; STEP_COUNT],
    pub main: Sample,
    pub status: [StepStatus; STEP_COUNT],
    pub record_armed: bool,
    pub active_step: usize,
}

struct Triggers {
    clock: SchmittTrigger,
    start_stop: SchmittTrigger,
    reset: SchmittTrigger,
    direction: SchmittTrigger,
    record: SchmittTrigger,
    steps: [SchmittTrigger; STEP_COUNT],
}

impl Triggers {
    fn new(config: &Config) -> Self {
        let trigger = SchmittTrigger::new(config.trigger_low, config.trigger_high);
        Triggers {
            clock: trigger,
            start_stop: trigger,
            reset: trigger,
            direction: trigger,
            record: trigger,
            steps: [trigger; STEP_COUNT],
        }
    }
}

pub struct Nova {
    sequencer: Sequencer,
    samplers: Vec<Sampler>,
    envelope: EnvelopeRamp,
    triggers: Triggers,

    record_armed: bool,
    // The active step was prepared for recording rather than playback.
    recording: bool,
}

impl Nova {
    pub fn new(config: Config) -> Nova {
        info!("Creating {} steps of {} samples", STEP_COUNT, config.buffer_capacity);
        let sequencer = match config.seed {
            Some(seed) => Sequencer::with_seed(seed),
            None => Sequencer::new(),
        };
        Nova {
            sequencer,
            samplers: (0..STEP_COUNT).map(|_| Sampler::new(config.buffer_capacity)).collect(),
            envelope: EnvelopeRamp::new(),
            triggers: Triggers::new(&config),
            record_armed: false,
            recording: false,
        }
    }

    pub fn sequencer(self: &Self) -> &Sequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(self: &mut Self) -> &mut Sequencer {
        &mut self.sequencer
    }

    pub fn sampler(self: &Self, step: usize) -> Option<&Sampler> {
        self.samplers.get(step)
    }

    pub fn is_record_armed(self: &Self) -> bool {
        self.record_armed
    }

    pub fn is_recording(self: &Self) -> bool {
        self.recording
    }

    pub fn active_step(self: &Self) -> usize {
        self.sequencer.index()
    }

    pub fn erase_all(self: &mut Self) {
        debug!("Erasing all steps");
        for sampler in self.samplers.iter_mut() {
            sampler.erase();
        }
    }

    fn activate(self: &mut Self, step: usize, config: &StepConfig, pitch: f32) {
        let sampler = &mut self.samplers[step];
        if self.record_armed {
            debug!("Step {}: recording", step + 1);
            sampler.prepare_recording();
            self.recording = true;
        } else {
            trace!("Step {}: playing (reverse {}, pitch {})", step + 1, config.reverse, pitch);
            sampler.prepare_playback(config.reverse, pitch);
            self.recording = false;
        }
        self.envelope.trigger();
    }

    // Advance on a clock edge, stepping over skipped steps.
    fn advance_skipping(self: &mut Self, steps: &[StepConfig; STEP_COUNT]) -> usize {
        let landed = self.sequencer.advance_index();
        if !steps[landed].skip {
            return landed;
        }
        if steps.iter().all(|step| step.skip) {
            trace!("Every step is skipped, staying on step {}", landed + 1);
            return landed;
        }

        for _ in 0..MAX_SKIP_ADVANCES {
            let index = self.sequencer.advance_index();
            if !steps[index].skip {
                return index;
            }
        }

        // Only random mode can miss every playable step this many times.
        let index = (1..STEP_COUNT)
            .map(|offset| (landed + offset) % STEP_COUNT)
            .find(|&index| !steps[index].skip)
            .unwrap_or(landed);
        self.sequencer.set_index(index);
        return index;
    }

    pub fn process(self: &mut Self, args: &ProcessArgs, params: &Params, inputs: &FrameInputs) -> FrameOutputs {
        let mut steps = params.steps;
        for (step, cv) in steps.iter_mut().zip(inputs.step_cv.iter()) {
            *step = step.effective(cv);
        }
        let pitch = params.pitch + sanitize(inputs.pitch_cv) * PITCH_CV_SCALE;
        let pitch = if pitch.is_finite() { pitch.max(MIN_PITCH).min(MAX_PITCH) } else { 0.0 };

        if self.triggers.start_stop.process(inputs.start_stop) {
            self.sequencer.start_stop();
            debug!("Running: {}", self.sequencer.is_running());
        }

        if self.triggers.direction.process(inputs.direction) {
            self.sequencer.direction_change();
            debug!("Direction: {}", self.sequencer.direction());
        }

        if self.triggers.record.process(inputs.record) {
            self.record_armed = !self.record_armed;
            debug!("Record armed: {}", self.record_armed);
            if !self.record_armed && self.recording {
                let index = self.sequencer.index();
                self.activate(index, &steps[index], pitch);
            }
        }

        if self.triggers.reset.process(inputs.reset) {
            self.sequencer.reset();
            if self.record_armed {
                self.erase_all();
            }
            self.activate(0, &steps[0], pitch);
        }

        if self.triggers.clock.process(inputs.clock) && self.sequencer.is_running() {
            let index = self.advance_skipping(&steps);
            self.activate(index, &steps[index], pitch);
        }

        for step in 0..STEP_COUNT {
            if self.triggers.steps[step].process(inputs.triggers[step]) {
                self.sequencer.set_index(step);
                self.activate(step, &steps[step], pitch);
            }
        }

        let index = self.sequencer.index();
        let active = &steps[index];
        let mut outputs = FrameOutputs {
            record_armed: self.record_armed,
            active_step: index,
            ..FrameOutputs::default()
        };

        let envelope = self.envelope.process(params.attack, params.release, args.sample_time);

        if self.record_armed && self.sequencer.is_running() {
            let input = sanitize(inputs.audio);
            if self.recording {
                self.samplers[index].record(input, args.sample_rate as f64);
            }
            outputs.steps[index] = input;
            outputs.main = input;
        } else if self.sequencer.is_running() {
            let mut sample = self.samplers[index].play(active.reverse) * active.gain;
            if active.mute {
                sample = 0.0;
            }
            if EnvelopeRamp::is_engaged(params.attack, params.release) {
                sample *= envelope;
            }
            let sample = sanitize(sample);
            outputs.steps[index] = sample;
            if !active.mute {
                outputs.main = sample;
            }
        }

        for (step, status) in outputs.status.iter_mut().enumerate() {
            *status = if steps[step].mute {
                StepStatus::Muted
            } else if self.samplers[step].is_empty() {
                StepStatus::Empty
            } else {
                StepStatus::Playing { progress: self.samplers[step].playhead_percent() }
            };
        }

        return outputs;
    }
}
