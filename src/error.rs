use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnakeError {
    #[error("Terminal error: {source}")]
    TerminalError {
        #[from]
        source: crossterm::ErrorKind,
    },
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
    #[error("Malformed highscore record: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("The terminal is too small: {needed:?} needed, {actual:?} available")]
    TerminalTooSmall {
        needed: (u16, u16),
        actual: (u16, u16),
    },
}

impl SnakeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnakeError::IoError { source } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
