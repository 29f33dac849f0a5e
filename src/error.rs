use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Extraction Error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to read image file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("The coordinator is no longer accepting events.")]
    ChannelClosed,
}

// Color Extraction Error Type
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Extraction task failed: {0}")]
    Join(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 6 hex digits, got {0}")]
    Length(usize),
    #[error("not a hex color: {0:?}")]
    NotHex(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Unknown log level: {0}")]
    LogLevel(String),
}
