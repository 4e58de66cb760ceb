use thiserror::Error;

#[derive(Error, Debug)]
pub enum SparqlineError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Input error: {message}")]
    Input { message: String },
    #[error("Render error: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, SparqlineError>;

// Helper conversions
impl From<config::ConfigError> for SparqlineError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for SparqlineError {
    fn from(e: serde_json::Error) -> Self { Self::Input { message: e.to_string() } }
}
impl From<std::io::Error> for SparqlineError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
