pub mod buffers;
pub mod engine;
pub mod envelope;
pub mod sampler;
pub mod sequencer;
pub mod step;
pub mod trigger;
pub mod units;

pub use engine::{Config, FrameInputs, FrameOutputs, Nova, Params, ProcessArgs};
pub use sequencer::{Direction, Sequencer};
pub use step::{StepConfig, StepCv, StepStatus};
pub use units::*;
