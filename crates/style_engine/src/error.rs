//! Error types for style resolution

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    #[error("Invalid colour: {0}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, StyleError>;
