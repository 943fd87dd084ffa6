use cpal::traits::{DeviceTrait, HostTrait};

use crate::app_error::*;

/// One line per supported config range, e.g. `2ch F32 44100-48000Hz`.
/// Ranges that can run at `sample_rate` are starred.
pub fn describe_range(channels: u16, min_rate: u32, max_rate: u32,
                      sample_format: cpal::SampleFormat, sample_rate: u32) -> String {
    let rates = if min_rate == max_rate {
        format!("{}Hz", min_rate)
    } else {
        format!("{}-{}Hz", min_rate, max_rate)
    };
    let usable = if min_rate <= sample_rate && sample_rate <= max_rate { " *" } else { "" };
    format!("{}ch {:?} {}{}", channels, sample_format, rates, usable)
}

fn print_device(device: &cpal::Device, default_name: &Option<String>,
                ranges: Vec<cpal::SupportedStreamConfigRange>, sample_rate: u32) -> Result<(), AppError> {
    let name = device.name()?;
    let marker = if default_name.as_ref() == Some(&name) { " (default)" } else { "" };
    println!(" • {}{}", name, marker);
    if ranges.is_empty() {
        println!("     no supported configs");
    }
    for range in ranges {
        println!("     {}", describe_range(range.channels(), range.min_sample_rate().0,
                                         range.max_sample_rate().0, range.sample_format(), sample_rate));
    }
    return Ok(());
}

/// Print every audio device with the configs it supports. Configs that
/// can run the sampler at `sample_rate` are starred.
pub fn run_list_ports(sample_rate: u32) -> Result<(), AppError> {
    let host = cpal::default_host();
    println!("Audio host {}, * = runs at {}Hz", host.id().name(), sample_rate);

    let default_input = host.default_input_device().and_then(|d| d.name().ok());
    println!("Inputs:");
    for device in host.input_devices()? {
        let ranges = device.supported_input_configs()?.collect();
        print_device(&device, &default_input, ranges, sample_rate)?;
    }

    let default_output = host.default_output_device().and_then(|d| d.name().ok());
    println!("Outputs:");
    for device in host.output_devices()? {
        let ranges = device.supported_output_configs()?.collect();
        print_device(&device, &default_output, ranges, sample_rate)?;
    }
    return Ok(());
}
