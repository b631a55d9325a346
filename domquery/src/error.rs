//! Error types for domquery

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Markup could not be parsed into a document
    #[error("XML source could not be loaded: {0}")]
    Load(String),

    /// A matched node lacks the structure a mutation needs
    #[error("Structural error: {0}")]
    Structural(String),

    /// Query compilation or evaluation failed, or the tree refused a change
    #[error(transparent)]
    Engine(#[from] xml_engine_traits::Error),

    /// Raised by a walk/each callback to stop iteration
    #[error("Callback error: {0}")]
    Callback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn callback<S: Into<String>>(msg: S) -> Self {
        Error::Callback(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
