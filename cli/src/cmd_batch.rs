use std::fs::File;
use std::io::BufWriter;

use dasp::{Sample};
use log::*;

use nova::{Nova, ProcessArgs, STEP_COUNT};

use crate::app_config::AppConfig;
use crate::app_error::AppError;
use crate::controls::Controls;
use crate::script::read_script;
use crate::wav::{output_spec, read_wav_mono};

type Writer = hound::WavWriter<BufWriter<File>>;

fn stem_path(prefix: &str, step: usize) -> String {
    format!("{}-{}.wav", prefix, step + 1)
}

/// Render `audio_in_path` through the sampler, driven by a control script.
///
/// The input file plays into the audio input as if it were live. Output is
/// as long as the input unless `duration` is given.
pub fn run_batch(config: &AppConfig, audio_in_path: &str, audio_out: &str, script_path: &str,
                 stems_prefix: Option<&str>, duration: Option<f32>) -> Result<(), AppError> {
    let script = read_script(script_path)?;
    for entry in &script {
        debug!("{}", entry);
    }

    let (input, sample_rate) = read_wav_mono(audio_in_path)?;
    let total_frames = match duration {
        Some(seconds) => (seconds.max(0.0) * sample_rate as f32).round() as usize,
        None => input.len(),
    };
    info!("Rendering {} frames at {}Hz", total_frames, sample_rate);

    let mut writer = hound::WavWriter::create(audio_out, output_spec(sample_rate))?;
    let mut stem_writers: Vec<Writer> = Vec::new();
    if let Some(prefix) = stems_prefix {
        for step in 0..STEP_COUNT {
            stem_writers.push(hound::WavWriter::create(stem_path(prefix, step), output_spec(sample_rate))?);
        }
    }

    let mut nova = Nova::new(config.nova_config(sample_rate));
    let mut controls = Controls::new(sample_rate, config.gate_seconds, config.bpm);
    let args = ProcessArgs::new(sample_rate);

    let mut events = script.iter().peekable();
    for frame in 0..total_frames {
        while let Some(entry) = events.peek() {
            let position = (entry.time * sample_rate as f64).round() as usize;
            if position > frame {
                break;
            }
            controls.apply(&entry.command);
            events.next();
        }

        let audio = input.get(frame).cloned().unwrap_or(0.0);
        let inputs = controls.next_inputs(audio);
        let outputs = nova.process(&args, &controls.params, &inputs);

        writer.write_sample(outputs.main.to_sample::<i16>())?;
        for (stem, sample) in stem_writers.iter_mut().zip(outputs.steps.iter()) {
            stem.write_sample(sample.to_sample::<i16>())?;
        }
    }

    writer.finalize()?;
    for stem in stem_writers {
        stem.finalize()?;
    }
    info!("Wrote {}", audio_out);
    return Ok(());
}
