//! Control scripts.
//!
//! A script has one event per line: a time in seconds followed by a command.
//! Live mode reads the same commands from stdin, without the time column.
//!
//!     # Record two steps, then play them back.
//!     0.0 start
//!     0.1 record
//!     0.2 clock
//!     0.7 gain 2 0.5

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::num;

use nova::STEP_COUNT;

#[derive(Clone)]
#[derive(Copy)]
#[derive(Debug)]
#[derive(PartialEq)]
pub enum Command {
    Clock,
    StartStop,
    Reset,
    Direction,
    Record,
    Trigger(usize),
    Gain(usize, f32),
    Mute(usize, bool),
    Skip(usize, bool),
    Reverse(usize, bool),
    Attack(f32),
    Release(f32),
    Pitch(f32),
}

#[derive(Debug)]
#[derive(PartialEq)]
pub struct Entry {
    pub time: f64,
    pub command: Command,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s: {:?}", self.time, self.command)
    }
}

pub type Script = Vec<Entry>;

#[derive(Debug)]
pub struct ParseError {
    message: String
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl From<num::ParseFloatError> for ParseError {
    fn from(error: num::ParseFloatError) -> Self {
        ParseError { message: error.to_string() }
    }
}

impl From<num::ParseIntError> for ParseError {
    fn from(error: num::ParseIntError) -> Self {
        ParseError { message: error.to_string() }
    }
}

fn argument<'a>(parts: &[&'a str], index: usize) -> Result<&'a str, ParseError> {
    match parts.get(index) {
        Some(part) => Ok(part),
        None => Err(ParseError { message: format!("'{}' needs more arguments", parts[0]) }),
    }
}

// Steps are numbered 1-8 in scripts, as on the panel.
fn parse_step(parts: &[&str], index: usize) -> Result<usize, ParseError> {
    let step = argument(parts, index)?.parse::<usize>()?;
    if step < 1 || step > STEP_COUNT {
        return Err(ParseError { message: format!("step {} out of range 1-{}", step, STEP_COUNT) });
    }
    return Ok(step - 1);
}

fn parse_toggle(parts: &[&str], index: usize) -> Result<bool, ParseError> {
    match argument(parts, index)? {
        "on" | "1" => Ok(true),
        "off" | "0" => Ok(false),
        other => Err(ParseError { message: format!("expected 'on' or 'off', got '{}'", other) }),
    }
}

fn parse_value(parts: &[&str], index: usize, min: f32, max: f32) -> Result<f32, ParseError> {
    let value = argument(parts, index)?.parse::<f32>()?;
    if !(value >= min && value <= max) {
        return Err(ParseError { message: format!("{} out of range {}..{}", value, min, max) });
    }
    return Ok(value);
}

/// Parse a command without a time, e.g. `mute 3 on`.
pub fn parse_command(parts: &[&str]) -> Result<Command, ParseError> {
    if parts.is_empty() {
        return Err(ParseError { message: "empty command".to_string() });
    }

    match parts[0] {
        "clock" => Ok(Command::Clock),
        "start" | "stop" => Ok(Command::StartStop),
        "reset" => Ok(Command::Reset),
        "direction" => Ok(Command::Direction),
        "record" => Ok(Command::Record),
        "trigger" => Ok(Command::Trigger(parse_step(parts, 1)?)),
        "gain" => Ok(Command::Gain(parse_step(parts, 1)?, parse_value(parts, 2, 0.0, 1.0)?)),
        "mute" => Ok(Command::Mute(parse_step(parts, 1)?, parse_toggle(parts, 2)?)),
        "skip" => Ok(Command::Skip(parse_step(parts, 1)?, parse_toggle(parts, 2)?)),
        "reverse" => Ok(Command::Reverse(parse_step(parts, 1)?, parse_toggle(parts, 2)?)),
        "attack" => Ok(Command::Attack(parse_value(parts, 1, 0.0, 1.0)?)),
        "release" => Ok(Command::Release(parse_value(parts, 1, 0.0, 1.0)?)),
        "pitch" => Ok(Command::Pitch(parse_value(parts, 1, -1.0, 1.0)?)),
        _ => Err(ParseError { message: format!("unknown command '{}'", parts[0]) }),
    }
}

/// Parse one script line. Blank lines and `#` comments give `None`.
pub fn parse_line(line: &str) -> Result<Option<Entry>, ParseError> {
    let line = match line.find('#') {
        Some(position) => &line[..position],
        None => line,
    };
    let parts: Vec<&str> = line.split_ascii_whitespace().collect();
    if parts.is_empty() {
        return Ok(None);
    }

    let time = parts[0].parse::<f64>()?;
    if !(time >= 0.0) {
        return Err(ParseError { message: format!("negative time {}", time) });
    }
    let command = parse_command(&parts[1..])?;
    return Ok(Some(Entry { time, command }));
}

/// Parse a whole script. Entries come back sorted by time.
pub fn parse_script(text: &str) -> Result<Script, ParseError> {
    let mut script = Script::new();
    for (number, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(entry)) => script.push(entry),
            Ok(None) => {},
            Err(error) => return Err(ParseError {
                message: format!("line {}: {}", number + 1, error.message)
            }),
        }
    }
    script.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));
    return Ok(script);
}

pub fn read_script(file_name: &str) -> Result<Script, crate::app_error::AppError> {
    let mut text = String::new();
    let mut file = File::open(file_name)?;
    file.read_to_string(&mut text)?;
    return Ok(parse_script(&text)?);
}
