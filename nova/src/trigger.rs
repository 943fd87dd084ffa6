/// Hysteresis comparator for gate and trigger inputs.
///
/// The input has to rise above `high` to count as an edge, and drop back
/// below `low` before another edge can be seen, so a noisy gate only fires
/// once.
#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
pub struct SchmittTrigger {
    low: f32,
    high: f32,
    state: bool,
}

pub const DEFAULT_LOW_THRESHOLD: f32 = 0.1;
pub const DEFAULT_HIGH_THRESHOLD: f32 = 1.0;

impl SchmittTrigger {
    pub fn new(low: f32, high: f32) -> Self {
        SchmittTrigger { low, high, state: false }
    }

    /// Returns true only on a low to high transition.
    pub fn process(self: &mut Self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        if self.state {
            if value <= self.low {
                self.state = false;
            }
            false
        } else if value >= self.high {
            self.state = true;
            true
        } else {
            false
        }
    }

    pub fn is_high(self: &Self) -> bool {
        self.state
    }
}

impl Default for SchmittTrigger {
    fn default() -> Self {
        SchmittTrigger::new(DEFAULT_LOW_THRESHOLD, DEFAULT_HIGH_THRESHOLD)
    }
}
