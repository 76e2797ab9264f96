use thiserror::Error;

use crate::color::ColorParseError;

/// Errors produced while turning an external message into an [`Intent`](crate::event::Intent)
#[derive(Debug, Error)]
pub enum IntentError {
    #[error("Unknown message {0:?}")]
    UnknownMessage(String),

    #[error("Message {name} expects {expected}")]
    InvalidPayload {
        name: &'static str,
        expected: &'static str,
    },

    #[error("Size must be a positive number, got {0}")]
    InvalidSize(f64),

    #[error("Invalid color: {0}")]
    InvalidColor(#[from] ColorParseError),

    #[error("Invalid tool type: {0}")]
    InvalidToolType(String),
}

/// Errors that can occur while placing a picture on the canvas
#[derive(Debug, Error)]
pub enum PictureError {
    #[error("Picture payload is empty")]
    Empty,

    #[error("Failed to decode picture: {0}")]
    Decode(#[from] image::ImageError),
}
