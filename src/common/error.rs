use std::fmt::{Debug, Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // QR builder
    EmptyData,
    DataTooLong,
    InvalidVersion,
    InvalidECLevel,
    InvalidMaskingPattern,

    // Renderer
    InvalidBoxSize,
    ImageTooLarge,
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            Self::EmptyData => "empty data",
            Self::DataTooLong => "data too long for the symbol capacity",
            Self::InvalidVersion => "invalid version",
            Self::InvalidECLevel => "invalid error correction level",
            Self::InvalidMaskingPattern => "invalid masking pattern",
            Self::InvalidBoxSize => "box size must be at least 1 pixel",
            Self::ImageTooLarge => "image too large to render",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
