use std::{io, path::PathBuf};

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url '{0}'")]
    InvalidBaseUrl(String),
    #[error("could not reach the server: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with an error status and `{"error": message}`.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("session file {}: {source}", path.display())]
    Session {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
