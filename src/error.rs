//! Crate error type.
//!
//! Navigation itself never fails: stale responses, unknown bounds and empty
//! windows are all normal outcomes handled inside the engines. Errors here
//! cover the application shell around them - configuration, terminal I/O and
//! driver channels.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuideError>;

#[derive(Debug, Error)]
pub enum GuideError {
    #[error("configuration parse failure in {path}: {details}")]
    ConfigParse { path: PathBuf, details: String },

    #[error("IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal failure: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("channel closed in {component}")]
    ChannelClosed { component: &'static str },
}
