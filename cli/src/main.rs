mod app_config;
mod app_error;
mod cmd_batch;
mod cmd_list_ports;
mod cmd_live;
mod controls;
mod cpal_helpers;
mod script;
mod tests;
mod wav;

use clap::{Arg, App, ArgMatches};
use log::*;

use app_config::AppConfig;
use app_error::AppError;
use cmd_batch::run_batch;
use cmd_list_ports::run_list_ports;
use cmd_live::run_live;

const SAMPLE_RATE: u32 = 44100;
const DEFAULT_BUFFER_SECONDS: f32 = 10.0;

fn parse_option<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, AppError> {
    match matches.value_of(name) {
        Some(text) => match text.parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(AppError { message: format!("Invalid value for --{}: {}", name, text) }),
        },
        None => Ok(None),
    }
}

fn app_config(matches: &ArgMatches) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::new(SAMPLE_RATE, DEFAULT_BUFFER_SECONDS);
    config.bpm = parse_option(matches, "bpm")?;
    config.seed = parse_option(matches, "seed")?;
    if let Some(seconds) = parse_option(matches, "buffer-seconds")? {
        config.buffer_seconds = seconds;
    }
    if let Some(seconds) = parse_option(matches, "gate-seconds")? {
        config.gate_seconds = seconds;
    }
    info!("BPM: {:?}, buffer: {}s per step, gate: {}s", config.bpm, config.buffer_seconds, config.gate_seconds);
    return Ok(config);
}

fn common_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(Arg::with_name("bpm")
            .long("bpm")
            .help("Generate a clock pulse on every beat")
            .takes_value(true)
            .value_name("BPM"))
       .arg(Arg::with_name("buffer-seconds")
            .long("buffer-seconds")
            .help("Maximum recording time per step, in seconds")
            .takes_value(true)
            .value_name("SECONDS"))
       .arg(Arg::with_name("gate-seconds")
            .long("gate-seconds")
            .help("Length of gate pulses sent by commands")
            .takes_value(true)
            .value_name("SECONDS"))
       .arg(Arg::with_name("seed")
            .long("seed")
            .help("Seed for random direction mode")
            .takes_value(true)
            .value_name("N"))
}

fn run() -> Result<(), AppError> {
    let app_m = App::new("Nova step sampler")
        .version("1.0")
        .subcommand(common_args(App::new("live"))
            .arg(Arg::with_name("input-device")
                 .long("input-device")
                 .short("i")
                 .help("Record audio from device")
                 .takes_value(true)
                 .value_name("NAME"))
            .arg(Arg::with_name("output-device")
                 .long("output-device")
                 .short("o")
                 .help("Play audio to device")
                 .takes_value(true)
                 .value_name("NAME")))
        .subcommand(common_args(App::new("batch"))
            .arg(Arg::with_name("INPUT")
                 .required(true)
                 .index(1))
            .arg(Arg::with_name("OUTPUT")
                 .required(true)
                 .index(2))
            .arg(Arg::with_name("script")
                 .long("script")
                 .short("s")
                 .help("Control script to play")
                 .required(true)
                 .takes_value(true)
                 .value_name("FILE"))
            .arg(Arg::with_name("duration")
                 .long("duration")
                 .short("d")
                 .help("Output length, in seconds (default: length of input)")
                 .takes_value(true)
                 .value_name("SECONDS"))
            .arg(Arg::with_name("stems")
                 .long("stems")
                 .help("Also write each step's output to PREFIX-1.wav .. PREFIX-8.wav")
                 .takes_value(true)
                 .value_name("PREFIX")))
        .subcommand(App::new("list-ports")
            .arg(Arg::with_name("sample-rate")
                 .long("sample-rate")
                 .help("Mark configs that can run at this rate (default: 44100)")
                 .takes_value(true)
                 .value_name("HZ")))
        .get_matches();

    match app_m.subcommand() {
        ("batch", Some(sub_m)) => {
            let config = app_config(sub_m)?;
            let duration: Option<f32> = parse_option(sub_m, "duration")?;
            let audio_in = sub_m.value_of("INPUT").unwrap_or_default();
            let audio_out = sub_m.value_of("OUTPUT").unwrap_or_default();
            let script = sub_m.value_of("script").unwrap_or_default();
            run_batch(&config, audio_in, audio_out, script, sub_m.value_of("stems"), duration)
        },
        ("live", Some(sub_m)) => {
            let config = app_config(sub_m)?;
            run_live(&config, sub_m.value_of("input-device"), sub_m.value_of("output-device"))
        },
        ("list-ports", Some(sub_m)) => {
            let sample_rate = parse_option(sub_m, "sample-rate")?.unwrap_or(SAMPLE_RATE);
            run_list_ports(sample_rate)
        },
        _ => Err(AppError { message: "No command given, see --help".to_string() }),
    }
}

fn main() {
    env_logger::init();

    if let Err(error) = run() {
        error!("{}", error);
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}
