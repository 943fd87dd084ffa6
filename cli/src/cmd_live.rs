use std::collections::VecDeque;
use std::io;
use std::io::BufRead;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, StreamTrait};
use log::*;

use nova::{Nova, ProcessArgs, Sample};

use crate::app_config::AppConfig;
use crate::app_error::AppError;
use crate::controls::Controls;
use crate::cpal_helpers;
use crate::script;

// Input frames waiting for the output callback. Older frames are dropped
// when the output falls behind.
type InputQueue = Arc<Mutex<VecDeque<Sample>>>;

const INPUT_QUEUE_FRAMES: usize = 8192;

fn open_in_stream<T: cpal::Sample>(device: &cpal::Device,
                                   config: &cpal::StreamConfig,
                                   queue_rc: InputQueue) -> Result<cpal::Stream, AppError> {
    let channels = config.channels as usize;
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mut queue = match queue_rc.lock() {
                Ok(queue) => queue,
                Err(_) => return,
            };
            // Only the first channel is recorded.
            for frame in data.chunks(channels) {
                if queue.len() >= INPUT_QUEUE_FRAMES {
                    queue.pop_front();
                }
                queue.push_back(frame[0].to_f32());
            }
        },
        move |err| { warn!("{}", err) }
    )?;
    return Ok(stream);
}

fn open_out_stream<T: cpal::Sample>(device: &cpal::Device,
                                    config: &cpal::StreamConfig,
                                    nova_rc: Arc<Mutex<Nova>>,
                                    controls_rc: Arc<Mutex<Controls>>,
                                    queue_rc: InputQueue) -> Result<cpal::Stream, AppError> {
    let channels = config.channels as usize;
    let args = ProcessArgs::new(config.sample_rate.0);
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let (mut nova, mut controls, mut queue) =
                match (nova_rc.lock(), controls_rc.lock(), queue_rc.lock()) {
                    (Ok(nova), Ok(controls), Ok(queue)) => (nova, controls, queue),
                    _ => return,
                };

            for frame in data.chunks_mut(channels) {
                let audio = queue.pop_front().unwrap_or(0.0);
                let inputs = controls.next_inputs(audio);
                let outputs = nova.process(&args, &controls.params, &inputs);
                let value: T = cpal::Sample::from(&outputs.main);
                for sample in frame.iter_mut() {
                    *sample = value;
                }
            }
        },
        move |err| { warn!("{}", err) }
    )?;
    return Ok(stream);
}

fn build_in_stream(device: &cpal::Device, supported: cpal::SupportedStreamConfig,
                   queue_rc: InputQueue) -> Result<cpal::Stream, AppError> {
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    match sample_format {
        cpal::SampleFormat::F32 => open_in_stream::<f32>(device, &config, queue_rc),
        cpal::SampleFormat::I16 => open_in_stream::<i16>(device, &config, queue_rc),
        cpal::SampleFormat::U16 => open_in_stream::<u16>(device, &config, queue_rc),
    }
}

fn build_out_stream(device: &cpal::Device, supported: cpal::SupportedStreamConfig,
                    nova_rc: Arc<Mutex<Nova>>, controls_rc: Arc<Mutex<Controls>>,
                    queue_rc: InputQueue) -> Result<cpal::Stream, AppError> {
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    match sample_format {
        cpal::SampleFormat::F32 => open_out_stream::<f32>(device, &config, nova_rc, controls_rc, queue_rc),
        cpal::SampleFormat::I16 => open_out_stream::<i16>(device, &config, nova_rc, controls_rc, queue_rc),
        cpal::SampleFormat::U16 => open_out_stream::<u16>(device, &config, nova_rc, controls_rc, queue_rc),
    }
}

/// Run the sampler against live audio devices. Commands are read from
/// stdin, one per line, until `quit` or end of input.
pub fn run_live(app_config: &AppConfig, input_device_name: Option<&str>,
                output_device_name: Option<&str>) -> Result<(), AppError> {
    let audio_host = cpal::default_host();

    let audio_out_device = cpal_helpers::find_output_device(&audio_host, output_device_name)?;
    let audio_in_device = cpal_helpers::find_input_device(&audio_host, input_device_name)?;

    let output_config = cpal_helpers::get_output_config(&audio_out_device, app_config.sample_rate)?;
    let sample_rate = output_config.sample_rate().0;
    let input_config = cpal_helpers::get_input_config(&audio_in_device, sample_rate)?;
    if input_config.sample_rate().0 != sample_rate {
        warn!("Input runs at {}Hz, output at {}Hz; recordings will play back at the wrong speed",
              input_config.sample_rate().0, sample_rate);
    }

    let nova_rc = Arc::new(Mutex::new(Nova::new(app_config.nova_config(sample_rate))));
    let controls_rc = Arc::new(Mutex::new(Controls::new(sample_rate, app_config.gate_seconds, app_config.bpm)));
    let queue_rc: InputQueue = Arc::new(Mutex::new(VecDeque::with_capacity(INPUT_QUEUE_FRAMES)));

    let audio_in_stream = build_in_stream(&audio_in_device, input_config, queue_rc.clone())?;
    let audio_out_stream = build_out_stream(&audio_out_device, output_config,
                                            nova_rc.clone(), controls_rc.clone(), queue_rc.clone())?;
    audio_in_stream.play()?;
    audio_out_stream.play()?;

    println!("Ready. Type commands (e.g. 'start', 'record', 'mute 3 on'), or 'quit'.");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_ascii_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts[0] == "quit" {
            break;
        }

        match script::parse_command(&parts) {
            Ok(command) => {
                if let Ok(mut controls) = controls_rc.lock() {
                    controls.apply(&command);
                }
            },
            Err(error) => println!("{}", error),
        }

        if let Ok(nova) = nova_rc.lock() {
            info!("step {} running {} armed {}", nova.active_step() + 1,
                  nova.sequencer().is_running(), nova.is_record_armed());
        }
    }

    return Ok(())
}
