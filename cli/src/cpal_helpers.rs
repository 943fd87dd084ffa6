// Helpers to integrate the Nova engine with the CPAL audio library.

use cpal::traits::{DeviceTrait, HostTrait};
use log::*;

use crate::app_error::AppError;

pub fn find_output_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device, AppError> {
    let device = match name {
        Some(name) => host.output_devices()?
            .find(|d| name == d.name().unwrap_or("".to_string())),
        None => host.default_output_device(),
    };
    device.ok_or(AppError { message: format!("No output device found matching {:?}", name) })
}

pub fn find_input_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device, AppError> {
    let device = match name {
        Some(name) => host.input_devices()?
            .find(|d| name == d.name().unwrap_or("".to_string())),
        None => host.default_input_device(),
    };
    device.ok_or(AppError { message: format!("No input device found matching {:?}", name) })
}

/// Pick an output config at `sample_rate`, or the device default if no
/// supported config covers that rate.
pub fn get_output_config(device: &cpal::Device, sample_rate: u32) -> Result<cpal::SupportedStreamConfig, AppError> {
    let rate = cpal::SampleRate(sample_rate);
    let supported_config = device.supported_output_configs()?
        .find(|c| c.min_sample_rate() <= rate && rate <= c.max_sample_rate())
        .map(|c| c.with_sample_rate(rate));
    let config = match supported_config {
        Some(config) => config,
        None => {
            warn!("{}Hz not supported by output device, using its default", sample_rate);
            device.default_output_config()?
        },
    };
    info!("audio output config: {:?}", config);
    return Ok(config);
}

pub fn get_input_config(device: &cpal::Device, sample_rate: u32) -> Result<cpal::SupportedStreamConfig, AppError> {
    let rate = cpal::SampleRate(sample_rate);
    let supported_config = device.supported_input_configs()?
        .find(|c| c.min_sample_rate() <= rate && rate <= c.max_sample_rate())
        .map(|c| c.with_sample_rate(rate));
    let config = match supported_config {
        Some(config) => config,
        None => {
            warn!("{}Hz not supported by input device, using its default", sample_rate);
            device.default_input_config()?
        },
    };
    info!("audio input config: {:?}", config);
    return Ok(config);
}
