//! Where configuration text comes from.

use std::ffi::OsString;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{AppError, ErrorKind};
use crate::result::AppResult;

/// Environment variable naming the configuration file when no explicit
/// source is given.
pub const CONFIG_FILE_ENV: &str = "TROIKA_CONFIG_FILE";

/// A configuration source: a filesystem path or an already-open stream.
pub enum ConfigSource {
    /// A file on disk, opened (and closed) by the loader.
    Path(PathBuf),
    /// An already-open readable stream.
    Stream {
        /// The stream to read the whole document from.
        reader: Box<dyn Read>,
        /// Name used in diagnostics.
        description: Option<String>,
    },
}

impl ConfigSource {
    /// A file source.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// An anonymous stream source.
    pub fn stream(reader: impl Read + 'static) -> Self {
        Self::Stream {
            reader: Box::new(reader),
            description: None,
        }
    }

    /// A stream source with a name for diagnostics.
    pub fn named_stream(description: impl Into<String>, reader: impl Read + 'static) -> Self {
        Self::Stream {
            reader: Box::new(reader),
            description: Some(description.into()),
        }
    }

    /// Human-readable description of this source, used in log output.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Stream {
                description: Some(description),
                ..
            } => description.clone(),
            Self::Stream {
                description: None, ..
            } => "<stream>".to_string(),
        }
    }

    /// Picks the source to load from.
    ///
    /// An explicit source always wins. Otherwise `env_value` (the value of
    /// [`CONFIG_FILE_ENV`]) is used as a path when it is set and non-empty.
    pub fn resolve(explicit: Option<Self>, env_value: Option<OsString>) -> AppResult<Self> {
        if let Some(source) = explicit {
            return Ok(source);
        }

        match env_value {
            Some(path) if !path.is_empty() => Ok(Self::Path(PathBuf::from(path))),
            _ => Err(AppError::invocation(format!(
                "No configuration file found (pass one explicitly or set {CONFIG_FILE_ENV})"
            ))),
        }
    }

    /// Reads the entire source into a string.
    ///
    /// Files are opened here and closed on every return path.
    pub(crate) fn read_to_string(self) -> AppResult<String> {
        let description = self.describe();
        let mut text = String::new();
        let read = match self {
            Self::Path(path) => open(&path)?.read_to_string(&mut text),
            Self::Stream { mut reader, .. } => reader.read_to_string(&mut text),
        };
        read.map_err(|e| read_error(&description, e))?;
        Ok(text)
    }
}

fn open(path: &Path) -> AppResult<std::fs::File> {
    std::fs::File::open(path).map_err(|e| {
        AppError::with_source(
            ErrorKind::Io,
            format!("Failed to open configuration file '{}': {e}", path.display()),
            e,
        )
    })
}

/// Invalid UTF-8 is a content problem, everything else is I/O.
fn read_error(description: &str, err: std::io::Error) -> AppError {
    let kind = if err.kind() == std::io::ErrorKind::InvalidData {
        ErrorKind::Configuration
    } else {
        ErrorKind::Io
    };
    AppError::with_source(
        kind,
        format!("Failed to read configuration from {description}: {err}"),
        err,
    )
}

impl fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Stream { description, .. } => f
                .debug_struct("Stream")
                .field("description", description)
                .field("reader", &"<reader>")
                .finish(),
        }
    }
}
