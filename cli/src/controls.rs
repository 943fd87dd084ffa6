//! Turns script commands into the per-frame inputs the engine expects.
//!
//! Gate commands hold their input high for a short pulse. Parameter commands
//! change the panel settings, which stay put until changed again.

use log::*;

use nova::{FrameInputs, Params, Sample, STEP_COUNT};

use crate::script::Command;

pub const GATE_HIGH: f32 = 10.0;

#[derive(Default)]
struct Gates {
    clock: usize,
    start_stop: usize,
    reset: usize,
    direction: usize,
    record: usize,
    triggers: [usize; STEP_COUNT],
}

fn gate_value(remaining: &mut usize) -> f32 {
    if *remaining > 0 {
        *remaining -= 1;
        GATE_HIGH
    } else {
        0.0
    }
}

pub struct Controls {
    pub params: Params,
    gate_length: usize,
    gates: Gates,

    // Internal clock, in frames per beat.
    clock_period: Option<usize>,
    clock_phase: usize,
}

impl Controls {
    pub fn new(sample_rate: u32, gate_seconds: f32, bpm: Option<f32>) -> Self {
        let gate_length = std::cmp::max(1, (gate_seconds * sample_rate as f32).round() as usize);
        let clock_period = bpm
            .filter(|bpm| *bpm > 0.0)
            .map(|bpm| std::cmp::max(gate_length * 2, ((60.0 / bpm) * sample_rate as f32).round() as usize));
        if let Some(period) = clock_period {
            info!("Internal clock: one pulse every {} frames", period);
        }

        Controls {
            params: Params::default(),
            gate_length,
            gates: Gates::default(),
            clock_period,
            clock_phase: 0,
        }
    }

    pub fn apply(self: &mut Self, command: &Command) {
        debug!("{:?}", command);
        let gate_length = self.gate_length;
        match *command {
            Command::Clock => self.gates.clock = gate_length,
            Command::StartStop => self.gates.start_stop = gate_length,
            Command::Reset => self.gates.reset = gate_length,
            Command::Direction => self.gates.direction = gate_length,
            Command::Record => self.gates.record = gate_length,
            Command::Trigger(step) => self.gates.triggers[step] = gate_length,
            Command::Gain(step, gain) => self.params.steps[step].gain = gain,
            Command::Mute(step, on) => self.params.steps[step].mute = on,
            Command::Skip(step, on) => self.params.steps[step].skip = on,
            Command::Reverse(step, on) => self.params.steps[step].reverse = on,
            Command::Attack(value) => self.params.attack = value,
            Command::Release(value) => self.params.release = value,
            Command::Pitch(value) => self.params.pitch = value,
        }
    }

    /// Inputs for the next frame.
    pub fn next_inputs(self: &mut Self, audio: Sample) -> FrameInputs {
        if let Some(period) = self.clock_period {
            if self.clock_phase == 0 {
                self.gates.clock = self.gate_length;
            }
            self.clock_phase = (self.clock_phase + 1) % period;
        }

        let mut inputs = FrameInputs {
            audio,
            clock: gate_value(&mut self.gates.clock),
            start_stop: gate_value(&mut self.gates.start_stop),
            reset: gate_value(&mut self.gates.reset),
            direction: gate_value(&mut self.gates.direction),
            record: gate_value(&mut self.gates.record),
            ..FrameInputs::default()
        };
        for (input, remaining) in inputs.triggers.iter_mut().zip(self.gates.triggers.iter_mut()) {
            *input = gate_value(remaining);
        }
        return inputs;
    }
}
