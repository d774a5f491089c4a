use thiserror::Error;
use tvscan_core::{ConstructionError, ErrorKind, ScreenerError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Screener(#[from] ScreenerError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Construction(_) => 2,
            Self::Screener(error) => match error.kind() {
                ErrorKind::Construction => 2,
                ErrorKind::Transport | ErrorKind::Cancelled => 3,
                ErrorKind::Serialization | ErrorKind::Decode => 4,
            },
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use tvscan_core::{DecodeError, TransportError};

    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let construction = CliError::from(ConstructionError::EmptyColumnName);
        assert_eq!(construction.exit_code(), 2);

        let transport = CliError::from(ScreenerError::from(TransportError::Network {
            url: String::from("https://scanner.test/america/scan"),
            message: String::from("connection refused"),
            retryable: true,
        }));
        assert_eq!(transport.exit_code(), 3);

        let decode = CliError::from(ScreenerError::from(DecodeError::MissingField("data")));
        assert_eq!(decode.exit_code(), 4);

        let io = CliError::from(std::io::Error::other("closed pipe"));
        assert_eq!(io.exit_code(), 10);
    }
}
