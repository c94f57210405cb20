use std::io;
use thiserror::Error;

/// Errors raised while configuring or starting the generator.
///
/// Once the loop is running nothing fails: control changes are plain state
/// transitions and sink write failures are logged, not returned.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("empty interval range: min {min_ms}ms is greater than max {max_ms}ms")]
    EmptyRange { min_ms: u64, max_ms: u64 },

    #[error("interval must be positive")]
    ZeroInterval,

    #[error("failed to spawn generator thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("generator thread panicked")]
    Panicked,

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_console() -> Result<(), GeneratorError> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))?;
        Ok(())
    }

    #[test]
    fn test_console_io_error_propagates() {
        let err = read_console().unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe
        ));
        assert_eq!(err.to_string(), "console I/O failed: stdin closed");
    }
}
