use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LsError>;

#[derive(Debug, Error)]
pub enum LsError {
    /// A switch character that is not one of `lRart`.
    #[error("invalid option -- '{0}'")]
    InvalidOption(char),

    /// Any other rejection of the command line.
    #[error("{0}")]
    Usage(String),

    /// A path that could not be stat'd, or a directory that could not be read.
    #[error("cannot access '{}': {}", .path.display(), reason(.source))]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LsError {
    pub fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LsError::Access {
            path: path.into(),
            source,
        }
    }
}

/// The OS description of an I/O error, without the `(os error N)` suffix.
pub fn reason(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(code) => Errno::from_raw(code).desc().to_string(),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_error_uses_strerror_text() {
        let err = LsError::access(
            "missingdir",
            io::Error::from_raw_os_error(Errno::ENOENT as i32),
        );
        assert_eq!(
            err.to_string(),
            "cannot access 'missingdir': No such file or directory"
        );
    }

    #[test]
    fn invalid_option_names_the_character() {
        let err = LsError::InvalidOption('x');
        assert_eq!(err.to_string(), "invalid option -- 'x'");
    }

    #[test]
    fn non_os_errors_fall_back_to_display() {
        let err = io::Error::new(io::ErrorKind::Other, "vanished");
        assert_eq!(reason(&err), "vanished");
    }
}
