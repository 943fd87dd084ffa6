use std::fmt;
use std::io;

use crate::script::ParseError;

#[derive(Debug)]
pub struct AppError {
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}

impl From<ParseError> for AppError {
    fn from(error: ParseError) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}

impl From<cpal::DevicesError> for AppError {
    fn from(error: cpal::DevicesError) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}

impl From<cpal::DeviceNameError> for AppError {
    fn from(error: cpal::DeviceNameError) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}

impl From<cpal::SupportedStreamConfigsError> for AppError {
    fn from(error: cpal::SupportedStreamConfigsError) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}

impl From<cpal::DefaultStreamConfigError> for AppError {
    fn from(error: cpal::DefaultStreamConfigError) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}

impl From<cpal::BuildStreamError> for AppError {
    fn from(error: cpal::BuildStreamError) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}

impl From<cpal::PlayStreamError> for AppError {
    fn from(error: cpal::PlayStreamError) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}

impl From<hound::Error> for AppError {
    fn from(error: hound::Error) -> Self {
        AppError {
            message: error.to_string(),
        }
    }
}
