use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("watch error: {0}")]
    Watch(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
