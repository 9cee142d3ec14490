//! Error types shared across the library.

use thiserror::Error;

/// Failures from audio sources (device, stream, decode)
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("No audio {0} device found")]
    NoDevice(&'static str),

    #[error("Failed to query device config: {0}")]
    DeviceConfig(String),

    #[error("Failed to build audio stream: {0}")]
    Stream(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode audio file: {0}")]
    Decode(String),

    #[error("Failed to write audio file: {0}")]
    Write(String),

    #[error("Invalid FFT config: {0}")]
    Config(String),
}

/// Rejected parameter writes from the UI layer
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("Unknown parameter '{0}'")]
    Unknown(String),

    #[error("Parameter '{key}' expects a {expected} value")]
    WrongKind { key: String, expected: &'static str },

    #[error("Parameter '{0}' received a non-finite number")]
    NotFinite(String),

    #[error("Parameter '{key}' has malformed color '{value}'")]
    BadColor { key: String, value: String },
}

/// Preset file failures
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Preset I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preset JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rendering surface failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    Surface(String),

    #[error("Failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    Device(String),

    #[error("Failed to save frame {frame}: {reason}")]
    SaveFrame { frame: usize, reason: String },
}

/// Offline recording failures
#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
