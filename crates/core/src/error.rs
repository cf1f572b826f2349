use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XrefError {
    #[error("not found: {0:?}")]
    NotFound(PathBuf),
    #[error("not a directory: {0:?}")]
    NotADirectory(PathBuf),
    #[error("io error at {path:?}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("format error: {0}")]
    Format(String),
}

pub type Result<T> = std::result::Result<T, XrefError>;

impl XrefError {
    /// Attaches a path to an I/O failure, folding `ErrorKind::NotFound` into
    /// [`XrefError::NotFound`].
    pub fn io_at(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::IoAt { path, source }
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::IoAt { .. } | Self::NotFound(_) | Self::NotADirectory(_)
        )
    }
}

impl From<anyhow::Error> for XrefError {
    fn from(value: anyhow::Error) -> Self {
        match value.downcast::<io::Error>() {
            Ok(io) => Self::Io(io),
            Err(other) => Self::Format(format!("{other:#}")),
        }
    }
}

impl From<walkdir::Error> for XrefError {
    fn from(value: walkdir::Error) -> Self {
        let path = value.path().map(|p| p.to_path_buf());
        let io: io::Error = value.into();
        match path {
            Some(path) => Self::io_at(path, io),
            None => Self::Io(io),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_at_maps_missing_paths_to_not_found() {
        let err = XrefError::io_at(
            "/nowhere",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, XrefError::NotFound(ref p) if p == &PathBuf::from("/nowhere")));

        let err = XrefError::io_at(
            "/locked",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, XrefError::IoAt { .. }));
        assert!(err.is_io());
    }

    #[test]
    fn anyhow_errors_keep_io_kind() {
        let source = anyhow::Error::new(io::Error::new(io::ErrorKind::WriteZero, "short"));
        assert!(matches!(XrefError::from(source), XrefError::Io(_)));

        let source = anyhow::anyhow!("line 3: invalid id 'x'");
        match XrefError::from(source) {
            XrefError::Format(msg) => assert!(msg.contains("line 3")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
