/// Error types for asset loading, registry access and configuration
use std::path::PathBuf;

use thiserror::Error;

/// A mesh asset could not be turned into a model.
///
/// Nothing is registered when this is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error(
        "{}: triangle references vertex {index} but only {position_count} positions exist",
        .path.display()
    )]
    IndexOutOfBounds {
        path: PathBuf,
        index: u32,
        position_count: usize,
    },
    #[error("{}: unsupported mesh format (expected .obj or .stl)", .path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("{}: mesh contains no triangles", .path.display())]
    Empty { path: PathBuf },
    #[error("division factor must be a positive finite number, got {0}")]
    InvalidDivisionFactor(f32),
}

/// A parser rejected its input; `line` is 1-based (0 for binary data).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("model index {index} out of range (registry holds {count} models)")]
    IndexOutOfRange { index: usize, count: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
