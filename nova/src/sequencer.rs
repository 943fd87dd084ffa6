//! The step sequencer state machine.
//!
//! The sequencer only tracks which step is current. It holds no audio and
//! has no notion of time: it moves when the engine sees a clock edge.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::units::STEP_COUNT;

const LAST_STEP: usize = STEP_COUNT - 1;

#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
#[derive(Eq)]
#[derive(PartialEq)]
pub enum Direction {
    Forward,
    Reverse,
    Bounce,
    Random,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward, Direction::Reverse, Direction::Bounce, Direction::Random,
    ];

    /// The mode selected by the next press of the direction button.
    pub fn next(self: Self) -> Direction {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Bounce,
            Direction::Bounce => Direction::Random,
            Direction::Random => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
            Direction::Bounce => "bounce",
            Direction::Random => "random",
        };
        write!(f, "{}", name)
    }
}

fn advance_forward(index: usize) -> usize {
    (index + 1) % STEP_COUNT
}

fn advance_reverse(index: usize) -> usize {
    (index + STEP_COUNT - 1) % STEP_COUNT
}

// Ping-pong. Each end is played twice, so a full cycle is 2 * STEP_COUNT.
fn advance_bounce(index: usize, upwards: &mut bool) -> usize {
    if *upwards && index >= LAST_STEP {
        *upwards = false;
        LAST_STEP
    } else if *upwards {
        index + 1
    } else if index == 0 {
        *upwards = true;
        0
    } else {
        index - 1
    }
}

fn advance_random(rng: &mut SmallRng) -> usize {
    rng.gen_range(0..STEP_COUNT)
}

impl Direction {
    /// The step after `index` in this mode.
    pub fn advance(self: Self, index: usize, bounce_upwards: &mut bool, rng: &mut SmallRng) -> usize {
        match self {
            Direction::Forward => advance_forward(index),
            Direction::Reverse => advance_reverse(index),
            Direction::Bounce => advance_bounce(index, bounce_upwards),
            Direction::Random => advance_random(rng),
        }
    }
}

pub struct Sequencer {
    running: bool,
    direction: Direction,
    bounce_upwards: bool,
    index: usize,
    rng: SmallRng,
}

impl Sequencer {
    pub fn new() -> Self {
        Sequencer::with_rng(SmallRng::from_entropy())
    }

    /// A sequencer whose random mode replays the same sequence every time.
    pub fn with_seed(seed: u64) -> Self {
        Sequencer::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Sequencer {
            running: false,
            direction: Direction::Forward,
            bounce_upwards: false,
            index: 0,
            rng,
        }
    }

    pub fn index(self: &Self) -> usize {
        self.index
    }

    pub fn is_running(self: &Self) -> bool {
        self.running
    }

    pub fn direction(self: &Self) -> Direction {
        self.direction
    }

    pub fn set_direction(self: &mut Self, direction: Direction) {
        self.direction = direction;
    }

    pub fn is_bouncing_upwards(self: &Self) -> bool {
        self.bounce_upwards
    }

    pub fn set_bounce_upwards(self: &mut Self, upwards: bool) {
        self.bounce_upwards = upwards;
    }

    pub fn start_stop(self: &mut Self) {
        self.running = !self.running;
    }

    pub fn direction_change(self: &mut Self) {
        self.direction = self.direction.next();
    }

    pub fn reset(self: &mut Self) {
        self.index = 0;
    }

    /// Jump straight to `step`. Out of range steps are ignored.
    pub fn set_index(self: &mut Self, step: usize) {
        if step < STEP_COUNT {
            self.index = step;
        }
    }

    pub fn advance_index(self: &mut Self) -> usize {
        self.index = self.direction.advance(self.index, &mut self.bounce_upwards, &mut self.rng);
        return self.index;
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Sequencer::new()
    }
}
