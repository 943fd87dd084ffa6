use dasp::{Sample};
use hound;
use log::*;

use crate::app_error::*;

/// Read a mono WAV file into memory, converting to the engine's sample format.
pub fn read_wav_mono(audio_in_path: &str) -> Result<(Vec<nova::Sample>, u32), AppError> {
    let reader = hound::WavReader::open(audio_in_path)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(AppError {
            message: format!("Input WAV file must be mono (got {} channels)", spec.channels)
        });
    }

    info!("Read input {}: {:?}", audio_in_path, spec);
    let samples: Vec<nova::Sample> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let samples = reader
                .into_samples()
                .filter_map(Result::ok);
            samples.map(|s: i32| int_to_sample(s, bits)).collect()
        },
        hound::SampleFormat::Float => {
            let samples = reader
                .into_samples()
                .filter_map(Result::ok);
            samples.map(|s: f32| s.to_sample::<nova::Sample>()).collect()
        },
    };

    return Ok((samples, spec.sample_rate));
}

// hound hands out integer samples right-aligned in an i32.
fn int_to_sample(s: i32, bits: u16) -> nova::Sample {
    match bits {
        8 => (s as i8).to_sample::<nova::Sample>(),
        16 => (s as i16).to_sample::<nova::Sample>(),
        1..=31 => (s << (32 - bits as u32)).to_sample::<nova::Sample>(),
        _ => s.to_sample::<nova::Sample>(),
    }
}

pub fn output_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int
    }
}
